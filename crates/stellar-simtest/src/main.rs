//! Stellar Extractor Headless Simulation Harness
//!
//! Validates balance logic and engine behaviour without any UI.
//! Runs entirely in-process: no rendering, no real clock, no disk.
//!
//! Usage:
//!   cargo run -p stellar-simtest
//!   cargo run -p stellar-simtest -- --verbose
//!   cargo run -p stellar-simtest -- --json
//!   RUST_LOG=stellar_core=debug cargo run -p stellar-simtest

use std::rc::Rc;

use chrono::{TimeZone, Utc};
use serde::Serialize;
use stellar_core::clock::ManualClock;
use stellar_core::command::{Command, CommandOutcome, IgnoreReason};
use stellar_core::components::{Asteroid, TruckState};
use stellar_core::config::EngineConfig;
use stellar_core::engine::SimulationEngine;
use stellar_core::persistence::{MemoryStore, Snapshot};
use stellar_core::session::{Session, StaticIdentity, UserId};
use stellar_logic::asteroids::AsteroidKind;
use stellar_logic::balance::BalanceConfig;
use stellar_logic::logistics::TruckKind;
use stellar_logic::sectors::Sector;
use stellar_logic::upgrades::UpgradeKind;
use tracing_subscriber::EnvFilter;

// ── Reference balance file (same TOML hosts ship) ───────────────────────
const BALANCE_TOML: &str = include_str!("../../../data/balance.toml");

// ── Opening script: what a new player typically does first ──────────────
const OPENING_SCRIPT: &str = r#"[
    {"type": "UpgradeClick"},
    {"type": "BuyDrone"},
    {"type": "UpgradeDroneDamage"},
    {"type": "UpgradeSpawnRate"},
    {"type": "GoSector", "sector": "Inner"},
    {"type": "BuyTruck", "kind": "Small"},
    {"type": "UpgradeClick"},
    {"type": "GoSector", "sector": "Outer"}
]"#;

const SEED: u64 = 2024;
const FRAME_MS: f64 = 1000.0 / 60.0;

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

#[derive(Serialize)]
struct Summary {
    passed: usize,
    failed: usize,
    total: usize,
    failures: Vec<String>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    tracing::info!(seed = SEED, "harness starting");

    let verbose = std::env::args().any(|a| a == "--verbose");
    let json = std::env::args().any(|a| a == "--json");
    println!("=== Stellar Extractor Simulation Harness ===\n");

    let mut results = Vec::new();

    // 1. Reference balance file
    results.extend(validate_balance_file(verbose));

    // 2. Upgrade and purchase curves
    results.extend(validate_cost_curves(verbose));

    // 3. Asteroid field and combat
    results.extend(validate_combat(verbose));

    // 4. Truck cycle
    results.extend(validate_truck_cycle(verbose));

    // 5. Sector transitions
    results.extend(validate_sectors(verbose));

    // 6. Offline catch-up through a session
    results.extend(validate_offline(verbose));

    // 7. Scripted opening + long idle run
    results.extend(validate_long_run(verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if json {
        let summary = Summary {
            passed,
            failed,
            total,
            failures: results
                .iter()
                .filter(|r| !r.passed)
                .map(|r| r.name.clone())
                .collect(),
        };
        match serde_json::to_string_pretty(&summary) {
            Ok(text) => println!("{text}"),
            Err(e) => eprintln!("failed to encode summary: {e}"),
        }
    }

    if failed > 0 {
        std::process::exit(1);
    }
}

fn seeded_engine() -> SimulationEngine {
    SimulationEngine::new(EngineConfig::default().with_seed(SEED))
}

// ── 1. Balance file ─────────────────────────────────────────────────────

fn validate_balance_file(_verbose: bool) -> Vec<TestResult> {
    println!("--- Balance File ---");
    let mut results = Vec::new();

    let config: EngineConfig = match toml::from_str(BALANCE_TOML) {
        Ok(c) => c,
        Err(e) => {
            results.push(TestResult {
                name: "balance_parse".into(),
                passed: false,
                detail: format!("TOML parse error: {}", e),
            });
            return results;
        }
    };

    results.push(TestResult {
        name: "balance_matches_defaults".into(),
        passed: config.balance == BalanceConfig::default(),
        detail: "data/balance.toml mirrors the compiled defaults".into(),
    });

    results.push(TestResult {
        name: "balance_viewport".into(),
        passed: config.viewport_width == 1200.0 && config.viewport_height == 680.0,
        detail: format!("{}x{}", config.viewport_width, config.viewport_height),
    });

    results
}

// ── 2. Cost curves ──────────────────────────────────────────────────────

fn validate_cost_curves(verbose: bool) -> Vec<TestResult> {
    println!("--- Cost Curves ---");
    let mut results = Vec::new();
    let balance = BalanceConfig::default();

    let click: Vec<u64> = (1..=3).map(|l| balance.click.cost_at(l)).collect();
    results.push(TestResult {
        name: "curve_click_first_levels".into(),
        passed: click == vec![10, 17, 28],
        detail: format!("{:?}", click),
    });

    let small = balance.truck_curve(TruckKind::Small);
    let trucks: Vec<u64> = (0..3).map(|n| small.cost(n)).collect();
    results.push(TestResult {
        name: "curve_small_truck".into(),
        passed: trucks == vec![0, 11000, 24200],
        detail: format!("{:?}", trucks),
    });

    let mut monotonic = true;
    for kind in UpgradeKind::all() {
        let track = balance.track(*kind);
        let top = track.max_level.unwrap_or(track.start_level + 30);
        let costs: Vec<u64> = (track.start_level..top).map(|l| track.cost_at(l)).collect();
        if verbose {
            println!("    {:<18} {:?}", kind.label(), &costs[..costs.len().min(6)]);
        }
        if costs.windows(2).any(|w| w[0] > w[1]) {
            monotonic = false;
        }
    }
    results.push(TestResult {
        name: "curve_monotonic".into(),
        passed: monotonic,
        detail: "every track's cost grows with level".into(),
    });

    results
}

// ── 3. Combat ───────────────────────────────────────────────────────────

fn validate_combat(_verbose: bool) -> Vec<TestResult> {
    println!("--- Combat ---");
    let mut results = Vec::new();

    // Click: damage credited immediately, reward on the kill.
    let mut engine = seeded_engine();
    engine.spawn_asteroid_at(AsteroidKind::Iron, 20.0, 200.0, 200.0);
    engine.apply(Command::Click { x: 200.0, y: 200.0 });
    results.push(TestResult {
        name: "combat_click_credits_damage".into(),
        passed: engine.ore() == 1.0,
        detail: format!("ore after one click = {}", engine.ore()),
    });

    engine.state_mut().click_power = 500;
    engine.apply(Command::Click { x: 200.0, y: 200.0 });
    results.push(TestResult {
        name: "combat_click_kill".into(),
        passed: engine.ore() == 1.0 + 500.0 + 10.0 && engine.asteroid_count() == 0,
        detail: format!(
            "ore = {}, asteroids = {}, particles = {}",
            engine.ore(),
            engine.asteroid_count(),
            engine.particle_count()
        ),
    });

    // Unaffordable purchase is a pure no-op.
    let mut engine = seeded_engine();
    engine.state_mut().ore = 40.0;
    let outcome = engine.apply(Command::BuyDrone);
    results.push(TestResult {
        name: "combat_unaffordable_drone".into(),
        passed: outcome == CommandOutcome::Ignored(IgnoreReason::Unaffordable)
            && engine.ore() == 40.0
            && engine.state().drone_count == 0,
        detail: format!("{:?}", outcome),
    });

    // Drones: lasers drawn, payout only on kills, hp bounded.
    let mut engine = seeded_engine();
    engine.state_mut().ore = 100.0;
    engine.apply(Command::BuyDrone);
    engine.start();
    let mut max_lasers = 0;
    let mut hp_ok = true;
    for _ in 0..(60 * 30) {
        engine.update(FRAME_MS);
        max_lasers = max_lasers.max(engine.laser_count());
        for (_, a) in engine.world.query::<&Asteroid>().iter() {
            if a.hp > a.max_hp || a.hp == 0 {
                hp_ok = false;
            }
        }
    }
    results.push(TestResult {
        name: "combat_drone_lasers".into(),
        passed: max_lasers >= 1,
        detail: format!("peak lasers = {}", max_lasers),
    });
    results.push(TestResult {
        name: "combat_hp_bounds".into(),
        passed: hp_ok,
        detail: "no live asteroid outside 0 < hp <= max_hp".into(),
    });

    results
}

// ── 4. Truck cycle ──────────────────────────────────────────────────────

fn validate_truck_cycle(verbose: bool) -> Vec<TestResult> {
    println!("--- Truck Cycle ---");
    let mut results = Vec::new();

    let mut engine = seeded_engine();
    engine.state_mut().unlocked_sectors.insert(Sector::Inner);
    engine.apply(Command::GoSector {
        sector: Sector::Inner,
    });
    engine.apply(Command::BuyTruck {
        kind: TruckKind::Small,
    });
    engine.start();

    let mut states = vec![TruckState::IdleLeft];
    let mut payouts = Vec::new();
    for tick in 0..2000 {
        let before = engine.state().ore;
        engine.update(50.0);
        let gained = engine.state().ore - before;
        if gained >= 40.0 {
            payouts.push(tick);
        }
        if let Some(truck) = engine.view().trucks.first() {
            if states.last() != Some(&truck.state) {
                states.push(truck.state);
            }
        }
        if payouts.len() == 2 {
            break;
        }
    }
    if verbose {
        println!("    states: {:?}", &states[..states.len().min(6)]);
        println!("    payout ticks: {:?}", payouts);
    }

    let expected = [
        TruckState::IdleLeft,
        TruckState::MovingOut,
        TruckState::OffscreenGather,
        TruckState::MovingIn,
        TruckState::Unloading,
        TruckState::IdleLeft,
    ];
    results.push(TestResult {
        name: "truck_state_order".into(),
        passed: states.len() >= 6 && states[..6] == expected,
        detail: format!("{} transitions observed", states.len()),
    });
    results.push(TestResult {
        name: "truck_pays_once_per_cycle".into(),
        passed: payouts.len() == 2 && payouts[1] - payouts[0] > 100,
        detail: format!("payout ticks {:?}", payouts),
    });

    results
}

// ── 5. Sectors ──────────────────────────────────────────────────────────

fn validate_sectors(_verbose: bool) -> Vec<TestResult> {
    println!("--- Sectors ---");
    let mut results = Vec::new();

    let mut engine = seeded_engine();
    engine.start();
    engine.state_mut().ore = 1100.0;
    engine.apply(Command::BuyDrone);
    engine.apply(Command::BuyDrone);
    for _ in 0..200 {
        engine.update(50.0);
    }
    let had_asteroids = engine.asteroid_count() > 0;

    // Step until a volley is on screen so the switch has beams to clear.
    engine.spawn_asteroid_at(AsteroidKind::Platinum, 45.0, 300.0, 400.0);
    let mut had_lasers = engine.laser_count() > 0;
    for _ in 0..40 {
        if had_lasers {
            break;
        }
        engine.update(50.0);
        had_lasers = engine.laser_count() > 0;
    }

    engine.state_mut().ore = 4999.0;
    let locked = engine.apply(Command::GoSector {
        sector: Sector::Inner,
    });
    engine.state_mut().ore = 5000.0;
    let unlocked = engine.apply(Command::GoSector {
        sector: Sector::Inner,
    });
    results.push(TestResult {
        name: "sector_unlock_cost".into(),
        passed: !locked.is_applied() && unlocked.is_applied() && engine.ore() < 5000.0,
        detail: format!("{:?} then {:?}, ore now {}", locked, unlocked, engine.ore()),
    });

    results.push(TestResult {
        name: "sector_clears_field".into(),
        passed: had_asteroids
            && had_lasers
            && engine.asteroid_count() == 0
            && engine.laser_count() == 0
            && engine.particle_count() == 0,
        detail: format!(
            "asteroids before switch: {}, lasers before switch: {}",
            had_asteroids, had_lasers
        ),
    });

    let blocked = engine.apply(Command::UpgradeClick);
    results.push(TestResult {
        name: "sector_inner_blocks_click_upgrade".into(),
        passed: blocked == CommandOutcome::Ignored(IgnoreReason::WrongSector),
        detail: format!("{:?}", blocked),
    });

    let ore = engine.ore();
    engine.apply(Command::GoSector {
        sector: Sector::Outer,
    });
    engine.apply(Command::GoSector {
        sector: Sector::Inner,
    });
    results.push(TestResult {
        name: "sector_return_is_free".into(),
        passed: engine.ore() == ore,
        detail: format!("ore {} -> {}", ore, engine.ore()),
    });

    results
}

// ── 6. Offline catch-up ─────────────────────────────────────────────────

fn validate_offline(_verbose: bool) -> Vec<TestResult> {
    println!("--- Offline Catch-up ---");
    let mut results = Vec::new();

    let t0 = 1_700_000_000_000;
    let clock = Rc::new(ManualClock::new(
        Utc.timestamp_millis_opt(t0).single().unwrap_or_default(),
    ));
    let user = UserId::new("harness");
    let snapshot = Snapshot {
        drone_count: 3,
        drone_damage: 4,
        last_save_ms: Some(t0 - 100_000),
        ..Snapshot::default()
    };
    let store = MemoryStore::new().with_snapshot(user.clone(), snapshot);
    let engine = SimulationEngine::with_clock(EngineConfig::default().with_seed(SEED), clock.clone());
    let mut session = Session::new(
        engine,
        Box::new(store),
        Box::new(StaticIdentity::signed_in(user)),
    );

    match session.start() {
        Ok(Some(report)) => {
            let rate = session.engine().income().total_per_second();
            let credited = report.offline.map(|o| o.credited).unwrap_or(0.0);
            results.push(TestResult {
                name: "offline_credit_rate_times_elapsed".into(),
                passed: (credited - rate * 100.0).abs() < 1e-6,
                detail: format!("rate {:.3}/s, credited {:.3}", rate, credited),
            });
        }
        Ok(None) => results.push(TestResult {
            name: "offline_session_start".into(),
            passed: false,
            detail: "session did not start".into(),
        }),
        Err(e) => results.push(TestResult {
            name: "offline_session_start".into(),
            passed: false,
            detail: format!("load failed: {}", e),
        }),
    }

    let anonymous = Session::new(
        seeded_engine(),
        Box::new(MemoryStore::new()),
        Box::new(StaticIdentity::anonymous()),
    )
    .start();
    results.push(TestResult {
        name: "offline_anonymous_noop".into(),
        passed: matches!(anonymous, Ok(None)),
        detail: "no identity, no work".into(),
    });

    results
}

// ── 7. Long run ─────────────────────────────────────────────────────────

fn validate_long_run(verbose: bool) -> Vec<TestResult> {
    println!("--- Long Run ---");
    let mut results = Vec::new();

    let script: Vec<Command> = match serde_json::from_str(OPENING_SCRIPT) {
        Ok(s) => s,
        Err(e) => {
            results.push(TestResult {
                name: "long_run_script_parse".into(),
                passed: false,
                detail: format!("JSON parse error: {}", e),
            });
            return results;
        }
    };

    let mut engine = seeded_engine();
    engine.start();
    engine.state_mut().ore = 20_000.0;
    let outcomes: Vec<CommandOutcome> = script.iter().map(|c| engine.apply(*c)).collect();
    if verbose {
        for (cmd, outcome) in script.iter().zip(&outcomes) {
            println!("    {:?} -> {:?}", cmd, outcome);
        }
    }
    results.push(TestResult {
        name: "long_run_opening_applies".into(),
        passed: outcomes.iter().filter(|o| o.is_applied()).count() == 7,
        detail: format!("{:?}", outcomes),
    });

    // Ten simulated minutes of uneven frames, clicking the lowest rock now and then.
    let mut min_ore = f64::MAX;
    let deltas = [16.0, 17.0, 33.0, 120.0, 8.0];
    for i in 0..36_000usize {
        engine.update(deltas[i % deltas.len()]);
        if i % 30 == 0 {
            let target = engine.view().asteroids.first().map(|a| (a.x, a.y));
            if let Some((x, y)) = target {
                engine.apply(Command::Click { x, y });
            }
        }
        min_ore = min_ore.min(engine.ore());
    }
    let view = engine.view();
    results.push(TestResult {
        name: "long_run_ore_non_negative".into(),
        passed: min_ore >= 0.0,
        detail: format!("min ore {:.1}, final ore {}", min_ore, view.ore),
    });
    results.push(TestResult {
        name: "long_run_view_serializes".into(),
        passed: serde_json::to_string(&view).is_ok(),
        detail: format!(
            "{} asteroids, {:.1} ore/min",
            view.asteroids.len(),
            view.income.total_per_minute
        ),
    });

    results
}
