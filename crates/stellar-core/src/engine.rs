//! Simulation engine - main entry point for running the simulation

use std::rc::Rc;

use hecs::{Entity, World};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use stellar_logic::asteroids::AsteroidKind;
use stellar_logic::balance::BalanceConfig;
use stellar_logic::constants::FRAME_MS;
use stellar_logic::income::{
    drone_ore_per_second, offline_credit, truck_ore_per_second, IncomeBreakdown, IncomeCarry,
};
use stellar_logic::logistics::{TruckKind, TruckUpgrade};
use stellar_logic::sectors::Sector;
use stellar_logic::upgrades::{next_fire_rate_ms, UpgradeKind};
use tracing::{debug, info, warn};

use crate::clock::{Scheduler, SystemClock, TimerKind, TimerScope, WallClock};
use crate::command::{Command, CommandOutcome, IgnoreReason};
use crate::components::{Position, Viewport};
use crate::config::EngineConfig;
use crate::economy::EconomyState;
use crate::persistence::{SaveQueue, Snapshot};
use crate::sector::{commit_transition, plan_transition};
use crate::systems::*;
use crate::view::ViewModel;

const OUTER_SCOPE: TimerScope = TimerScope::Sector(Sector::Outer);

/// Result of crediting time spent offline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OfflineReport {
    pub elapsed_seconds: f64,
    pub ore_per_second: f64,
    pub credited: f64,
}

/// Main simulation engine
pub struct SimulationEngine {
    /// Entity world: asteroids, drone units, trucks, lasers, particles
    pub world: World,
    state: EconomyState,
    config: EngineConfig,
    scheduler: Scheduler,
    rng: StdRng,
    clock: Rc<dyn WallClock>,
    viewport: Viewport,
    next_serial: u64,
    income_carry: IncomeCarry,
    saves: SaveQueue,
    running: bool,
    /// Simulated milliseconds since start
    sim_time_ms: f64,
}

impl SimulationEngine {
    /// Create an engine on the system clock
    pub fn new(config: EngineConfig) -> Self {
        Self::with_clock(config, Rc::new(SystemClock))
    }

    pub fn with_clock(config: EngineConfig, clock: Rc<dyn WallClock>) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let viewport = Viewport::new(config.viewport_width, config.viewport_height);
        let state = EconomyState::fresh_with(clock.now(), &config.balance);
        Self {
            world: World::new(),
            state,
            config,
            scheduler: Scheduler::new(),
            rng,
            clock,
            viewport,
            next_serial: 0,
            income_carry: IncomeCarry::new(),
            saves: SaveQueue::default(),
            running: false,
            sim_time_ms: 0.0,
        }
    }

    fn balance(&self) -> &BalanceConfig {
        &self.config.balance
    }

    // ── Lifecycle ──────────────────────────────────────────────────────

    /// Arm the session timers and the current sector's loops.
    pub fn start(&mut self) {
        if self.running {
            return;
        }
        self.running = true;
        self.scheduler.arm(
            TimerKind::Autosave,
            TimerScope::Session,
            self.config.autosave_interval_ms,
        );
        self.scheduler.arm(
            TimerKind::IncomeAccrual,
            TimerScope::Session,
            self.config.income_interval_ms,
        );
        self.start_sector_loops(self.state.current_sector);
        info!(sector = ?self.state.current_sector, "simulation started");
    }

    /// Cancel every timer. Entities and the ledger are kept.
    pub fn stop(&mut self) {
        self.scheduler.cancel_all();
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Advance timers by `delta_ms`, then run one frame tick on the clamped delta.
    pub fn update(&mut self, delta_ms: f64) {
        if !self.running || !delta_ms.is_finite() || delta_ms <= 0.0 {
            return;
        }
        self.sim_time_ms += delta_ms;

        self.scheduler.advance(delta_ms);
        for fired in self.scheduler.pop_due() {
            self.fire(fired.kind);
        }

        let dt = delta_ms.min(self.config.max_frame_delta_ms);
        self.frame_tick(dt);
    }

    fn fire(&mut self, kind: TimerKind) {
        match kind {
            TimerKind::Spawn => {
                if self.state.current_sector.has_asteroid_field() {
                    self.spawn_asteroid();
                    let delay = next_spawn_delay(
                        &mut self.rng,
                        self.config.balance.profile(Sector::Outer),
                        self.state.spawn_rate_level,
                    );
                    self.scheduler.arm(TimerKind::Spawn, OUTER_SCOPE, delay);
                }
            }
            TimerKind::DroneVolley => {
                if self.state.current_sector.has_asteroid_field() {
                    self.drone_volley();
                    self.scheduler.arm(
                        TimerKind::DroneVolley,
                        OUTER_SCOPE,
                        self.state.drone_fire_rate_ms as f64,
                    );
                }
            }
            TimerKind::Autosave => {
                self.request_save();
                self.scheduler.arm(
                    TimerKind::Autosave,
                    TimerScope::Session,
                    self.config.autosave_interval_ms,
                );
            }
            TimerKind::IncomeAccrual => {
                let per_tick =
                    self.income().total_per_second() * self.config.income_interval_ms / 1000.0;
                let whole = self.income_carry.accrue(per_tick);
                self.state.credit(whole as f64);
                self.scheduler.arm(
                    TimerKind::IncomeAccrual,
                    TimerScope::Session,
                    self.config.income_interval_ms,
                );
            }
        }
    }

    fn frame_tick(&mut self, dt_ms: f64) {
        let frames = dt_ms / FRAME_MS;

        if self.state.current_sector.has_truck_fleet() {
            let levels = self.state.fleet_levels();
            let deliveries = advance_trucks(
                &mut self.world,
                dt_ms,
                self.viewport.width,
                &levels,
                &self.config.balance,
            );
            for delivery in deliveries {
                debug!(kind = ?delivery.kind, ore = delivery.ore, "truck unloaded");
                self.state.credit(delivery.ore as f64);
            }
        }

        advance_asteroids(&mut self.world, frames);
        cull_asteroids(&mut self.world, self.viewport.height);
        decay_effects(&mut self.world, frames);
    }

    fn start_sector_loops(&mut self, sector: Sector) {
        if !self.running || !sector.has_asteroid_field() {
            return;
        }
        let delay = next_spawn_delay(
            &mut self.rng,
            self.config.balance.profile(sector),
            self.state.spawn_rate_level,
        );
        self.scheduler.arm(TimerKind::Spawn, OUTER_SCOPE, delay);
        self.scheduler.arm(
            TimerKind::DroneVolley,
            OUTER_SCOPE,
            self.state.drone_fire_rate_ms as f64,
        );
    }

    // ── Field ──────────────────────────────────────────────────────────

    /// Spawn one asteroid from the active sector's table.
    pub fn spawn_asteroid(&mut self) -> Option<Entity> {
        let profile = self.config.balance.profile(self.state.current_sector);
        let spawn = roll_asteroid(&mut self.rng, profile, self.viewport.width)?;
        Some(self.insert_asteroid(spawn))
    }

    /// Place a specific asteroid, for scripted scenarios and tests.
    pub fn spawn_asteroid_at(&mut self, kind: AsteroidKind, size: f64, x: f64, y: f64) -> Entity {
        let multiplier = self
            .config
            .balance
            .profile(self.state.current_sector)
            .asteroid_speed_multiplier;
        self.insert_asteroid(AsteroidSpawn {
            kind,
            size,
            x,
            y,
            speed: stellar_logic::constants::asteroids::SPEED_MIN * multiplier,
        })
    }

    fn insert_asteroid(&mut self, spawn: AsteroidSpawn) -> Entity {
        let serial = self.next_serial;
        self.next_serial += 1;
        insert_asteroid(&mut self.world, &mut self.rng, serial, spawn)
    }

    fn drone_volley(&mut self) {
        let Some(outcome) = fire_volley(
            &mut self.world,
            self.state.drone_count,
            self.state.drone_damage,
        ) else {
            return;
        };
        if let Some(reward) = outcome.reward {
            destroy_asteroid(&mut self.world, &mut self.rng, outcome.target);
            self.state.credit(reward as f64);
            debug!(reward, damage = outcome.damage, "drones destroyed asteroid");
        }
    }

    fn clear_transients(&mut self) {
        clear_asteroids(&mut self.world);
        clear_effects(&mut self.world);
    }

    // ── Commands ───────────────────────────────────────────────────────

    /// Apply a player command. Ignored commands leave every piece of state untouched.
    pub fn apply(&mut self, command: Command) -> CommandOutcome {
        let result = match command {
            Command::Click { x, y } => self.click(x, y),
            Command::UpgradeClick => self.upgrade_click(),
            Command::BuyDrone => self.buy_drone(),
            Command::UpgradeDroneDamage => self.upgrade_drone_damage(),
            Command::UpgradeDroneFireRate => self.upgrade_drone_fire_rate(),
            Command::UpgradeSpawnRate => self.purchase_level(UpgradeKind::SpawnRate),
            Command::BuyTruck { kind } => self.buy_truck(kind),
            Command::UpgradeTruck { upgrade } => self.upgrade_truck(upgrade),
            Command::GoSector { sector } => self.go_sector(sector),
            Command::ResetSave => {
                self.reset_save();
                Ok(())
            }
        };
        if let Err(reason) = result {
            debug!(?command, ?reason, "command ignored");
        }
        result.into()
    }

    fn click(&mut self, x: f64, y: f64) -> Result<(), IgnoreReason> {
        if !self.state.current_sector.has_asteroid_field() {
            return Err(IgnoreReason::WrongSector);
        }
        let outcome = resolve_click(
            &mut self.world,
            &mut self.rng,
            Position::new(x, y),
            self.state.click_power,
        )
        .ok_or(IgnoreReason::NoTarget)?;
        self.state.credit(outcome.ore() as f64);
        if outcome.reward.is_some() {
            debug!(ore = outcome.ore(), "click destroyed asteroid");
        }
        Ok(())
    }

    /// Debit the next level of `kind` and bump it. Effects are up to the caller.
    fn purchase_level(&mut self, kind: UpgradeKind) -> Result<(), IgnoreReason> {
        let level = self.state.level(kind);
        let cost = self
            .balance()
            .track(kind)
            .next_cost(level)
            .ok_or(IgnoreReason::Capped)?;
        if !self.state.try_spend(cost) {
            return Err(IgnoreReason::Unaffordable);
        }
        self.state.bump_level(kind);
        info!(upgrade = kind.label(), level = level + 1, cost, "upgrade purchased");
        self.request_save();
        Ok(())
    }

    fn upgrade_click(&mut self) -> Result<(), IgnoreReason> {
        if !self.state.current_sector.has_asteroid_field() {
            return Err(IgnoreReason::WrongSector);
        }
        self.purchase_level(UpgradeKind::Click)?;
        self.state.click_power += 1;
        Ok(())
    }

    fn upgrade_drone_damage(&mut self) -> Result<(), IgnoreReason> {
        self.purchase_level(UpgradeKind::DroneDamage)?;
        self.state.drone_damage += 1;
        Ok(())
    }

    fn upgrade_drone_fire_rate(&mut self) -> Result<(), IgnoreReason> {
        let next = next_fire_rate_ms(
            self.state.drone_fire_rate_ms,
            self.balance().fire_rate_step_ms,
            self.balance().fire_rate_floor_ms,
        )
        .ok_or(IgnoreReason::Capped)?;
        self.purchase_level(UpgradeKind::DroneFireRate)?;
        self.state.drone_fire_rate_ms = next;
        Ok(())
    }

    fn buy_drone(&mut self) -> Result<(), IgnoreReason> {
        let cost = self.balance().drone_curve.cost(self.state.drone_count);
        if !self.state.try_spend(cost) {
            return Err(IgnoreReason::Unaffordable);
        }
        self.state.drone_count += 1;
        rebuild_drone_units(
            &mut self.world,
            &mut self.rng,
            self.state.drone_count,
            self.viewport,
        );
        info!(owned = self.state.drone_count, cost, "drone purchased");
        self.request_save();
        Ok(())
    }

    fn buy_truck(&mut self, kind: TruckKind) -> Result<(), IgnoreReason> {
        let cost = self
            .balance()
            .truck_curve(kind)
            .cost(self.state.truck_count(kind));
        if !self.state.try_spend(cost) {
            return Err(IgnoreReason::Unaffordable);
        }
        let lane = truck_count(&self.world) as u32;
        self.state.add_truck(kind);
        spawn_truck(
            &mut self.world,
            kind,
            lane,
            self.config.balance.truck_spawn_stagger_ms,
        );
        info!(kind = kind.label(), owned = self.state.truck_count(kind), cost, "truck purchased");
        self.request_save();
        Ok(())
    }

    fn upgrade_truck(&mut self, upgrade: TruckUpgrade) -> Result<(), IgnoreReason> {
        self.purchase_level(upgrade.upgrade_kind())
    }

    fn go_sector(&mut self, target: Sector) -> Result<(), IgnoreReason> {
        let transition = plan_transition(&self.state, target, self.balance().sector_unlock_cost)?;
        if !commit_transition(&mut self.state, &transition) {
            return Err(IgnoreReason::Unaffordable);
        }
        self.scheduler.cancel_scope(TimerScope::Sector(transition.from));
        self.clear_transients();
        self.start_sector_loops(transition.to);
        info!(
            from = ?transition.from,
            to = ?transition.to,
            unlocked = transition.unlock_cost.is_some(),
            "sector changed"
        );
        self.request_save();
        Ok(())
    }

    fn reset_save(&mut self) {
        self.reset_state();
        if self.running {
            self.scheduler.cancel_scope(TimerScope::Sector(Sector::Inner));
            self.scheduler.cancel_scope(OUTER_SCOPE);
            self.start_sector_loops(Sector::Outer);
        }
        info!("save reset");
    }

    /// Replace the ledger with a fresh one and drop every entity, then save.
    pub fn reset_state(&mut self) {
        self.state = EconomyState::fresh_with(self.clock.now(), &self.config.balance);
        self.world.clear();
        self.next_serial = 0;
        self.income_carry.reset();
        self.request_save();
    }

    // ── Persistence ────────────────────────────────────────────────────

    /// Adopt a loaded snapshot and rebuild drones and trucks from it.
    pub fn restore(&mut self, snapshot: &Snapshot) {
        let mut state = snapshot.to_state(self.clock.now());
        state.sanitize(&self.config.balance);
        self.state = state;
        self.world.clear();
        self.next_serial = 0;
        self.income_carry.reset();
        rebuild_drone_units(
            &mut self.world,
            &mut self.rng,
            self.state.drone_count,
            self.viewport,
        );
        rebuild_trucks(
            &mut self.world,
            self.state.truck_counts.iter(),
            self.config.balance.truck_spawn_stagger_ms,
        );
        if self.running {
            self.scheduler.cancel_scope(OUTER_SCOPE);
            self.scheduler.cancel_scope(TimerScope::Sector(Sector::Inner));
            self.start_sector_loops(self.state.current_sector);
        }
    }

    /// Credit income for the time since the last save, once.
    pub fn reconcile_offline(&mut self) -> OfflineReport {
        let now = self.clock.now();
        let elapsed_ms = (now - self.state.last_save).num_milliseconds().max(0);
        let elapsed_seconds = elapsed_ms as f64 / 1000.0;
        let ore_per_second = self.income().total_per_second();
        let credited = offline_credit(ore_per_second, elapsed_seconds);
        self.state.credit(credited);
        self.state.last_save = now;
        self.request_save();
        info!(elapsed_seconds, credited, "offline progress credited");
        OfflineReport {
            elapsed_seconds,
            ore_per_second,
            credited,
        }
    }

    /// Complete snapshot of the ledger as it stands.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::from(&self.state)
    }

    pub fn request_save(&mut self) {
        self.saves.request();
    }

    /// Hand out the next snapshot to write, if a save is wanted and none is in flight.
    pub fn take_save_request(&mut self) -> Option<Snapshot> {
        if !self.saves.begin() {
            return None;
        }
        self.state.last_save = self.clock.now();
        Some(self.snapshot())
    }

    /// Release the in-flight guard. A request made meanwhile becomes takeable.
    pub fn finish_save(&mut self, ok: bool) {
        if !ok {
            warn!("snapshot was not persisted");
        }
        self.saves.finish();
    }

    pub fn save_queue(&self) -> &SaveQueue {
        &self.saves
    }

    // ── Queries ────────────────────────────────────────────────────────

    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport = Viewport::new(width, height);
        rebuild_drone_units(
            &mut self.world,
            &mut self.rng,
            self.state.drone_count,
            self.viewport,
        );
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Current passive income, multiplier applied.
    pub fn income(&self) -> IncomeBreakdown {
        let balance = self.balance();
        let drones = drone_ore_per_second(
            self.state.drone_count,
            self.state.drone_damage,
            self.state.drone_fire_rate_ms,
        );
        let levels = self.state.fleet_levels();
        let trucks: f64 = self
            .state
            .truck_counts
            .iter()
            .map(|(kind, count)| {
                truck_ore_per_second(balance.truck_spec(*kind), &levels, self.viewport.width)
                    * *count as f64
            })
            .sum();
        IncomeBreakdown::new(drones, trucks, balance.income_multiplier)
    }

    pub fn view(&self) -> ViewModel {
        ViewModel::build(&self.world, &self.state, self.balance(), self.income())
    }

    pub fn state(&self) -> &EconomyState {
        &self.state
    }

    /// Direct ledger access for hosts that script scenarios.
    pub fn state_mut(&mut self) -> &mut EconomyState {
        &mut self.state
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn sector(&self) -> Sector {
        self.state.current_sector
    }

    pub fn ore(&self) -> f64 {
        self.state.ore
    }

    pub fn sim_time_ms(&self) -> f64 {
        self.sim_time_ms
    }

    pub fn asteroid_count(&self) -> usize {
        asteroid_count(&self.world)
    }

    pub fn drone_unit_count(&self) -> usize {
        drone_unit_count(&self.world)
    }

    pub fn truck_count(&self) -> usize {
        truck_count(&self.world)
    }

    pub fn laser_count(&self) -> usize {
        laser_count(&self.world)
    }

    pub fn particle_count(&self) -> usize {
        particle_count(&self.world)
    }
}

impl Default for SimulationEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
