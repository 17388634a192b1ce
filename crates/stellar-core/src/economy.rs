//! The economy ledger: ore plus every level, count and progression flag.
//!
//! All spending goes through [`EconomyState::try_spend`], so ore can never
//! go negative.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stellar_logic::balance::BalanceConfig;
use stellar_logic::constants::{click, drones};
use stellar_logic::logistics::{FleetLevels, TruckKind};
use stellar_logic::sectors::Sector;
use stellar_logic::upgrades::UpgradeKind;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EconomyState {
    pub ore: f64,
    pub current_sector: Sector,
    pub unlocked_sectors: BTreeSet<Sector>,
    pub click_power: u32,
    pub click_level: u32,
    pub drone_count: u32,
    pub drone_damage: u32,
    pub drone_damage_level: u32,
    pub drone_fire_rate_ms: u32,
    pub drone_fire_rate_level: u32,
    pub spawn_rate_level: u32,
    pub truck_counts: BTreeMap<TruckKind, u32>,
    pub truck_gather_level: u32,
    pub truck_unload_level: u32,
    pub truck_travel_level: u32,
    pub last_save: DateTime<Utc>,
}

impl Default for EconomyState {
    fn default() -> Self {
        Self::fresh(DateTime::<Utc>::default())
    }
}

impl EconomyState {
    /// A brand-new save stamped at `now`, using the compiled defaults.
    pub fn fresh(now: DateTime<Utc>) -> Self {
        Self::fresh_with(now, &BalanceConfig::default())
    }

    /// A brand-new save stamped at `now` with starting stats taken from `balance`.
    pub fn fresh_with(now: DateTime<Utc>, balance: &BalanceConfig) -> Self {
        Self {
            ore: 0.0,
            current_sector: Sector::Outer,
            unlocked_sectors: BTreeSet::from([Sector::Outer]),
            click_power: click::START_POWER,
            click_level: 1,
            drone_count: 0,
            drone_damage: drones::START_DAMAGE,
            drone_damage_level: 1,
            drone_fire_rate_ms: balance.start_fire_rate_ms.max(1),
            drone_fire_rate_level: 1,
            spawn_rate_level: 0,
            truck_counts: BTreeMap::new(),
            truck_gather_level: 0,
            truck_unload_level: 0,
            truck_travel_level: 0,
            last_save: now,
        }
    }

    /// Whole ore, as shown to players.
    pub fn floored_ore(&self) -> u64 {
        if self.ore.is_finite() && self.ore > 0.0 {
            self.ore.floor() as u64
        } else {
            0
        }
    }

    pub fn can_afford(&self, cost: u64) -> bool {
        self.ore >= cost as f64
    }

    /// Debit `cost` if affordable. Returns false and leaves ore untouched otherwise.
    pub fn try_spend(&mut self, cost: u64) -> bool {
        if !self.can_afford(cost) {
            return false;
        }
        self.ore = (self.ore - cost as f64).max(0.0);
        true
    }

    /// Add ore. Non-positive or non-finite amounts are ignored.
    pub fn credit(&mut self, amount: f64) {
        if amount.is_finite() && amount > 0.0 {
            self.ore += amount;
        }
    }

    pub fn level(&self, kind: UpgradeKind) -> u32 {
        match kind {
            UpgradeKind::Click => self.click_level,
            UpgradeKind::DroneDamage => self.drone_damage_level,
            UpgradeKind::DroneFireRate => self.drone_fire_rate_level,
            UpgradeKind::SpawnRate => self.spawn_rate_level,
            UpgradeKind::TruckGather => self.truck_gather_level,
            UpgradeKind::TruckUnload => self.truck_unload_level,
            UpgradeKind::TruckTravel => self.truck_travel_level,
        }
    }

    fn level_mut(&mut self, kind: UpgradeKind) -> &mut u32 {
        match kind {
            UpgradeKind::Click => &mut self.click_level,
            UpgradeKind::DroneDamage => &mut self.drone_damage_level,
            UpgradeKind::DroneFireRate => &mut self.drone_fire_rate_level,
            UpgradeKind::SpawnRate => &mut self.spawn_rate_level,
            UpgradeKind::TruckGather => &mut self.truck_gather_level,
            UpgradeKind::TruckUnload => &mut self.truck_unload_level,
            UpgradeKind::TruckTravel => &mut self.truck_travel_level,
        }
    }

    pub fn bump_level(&mut self, kind: UpgradeKind) {
        let level = self.level_mut(kind);
        *level = level.saturating_add(1);
    }

    pub fn truck_count(&self, kind: TruckKind) -> u32 {
        self.truck_counts.get(&kind).copied().unwrap_or(0)
    }

    pub fn total_trucks(&self) -> u32 {
        self.truck_counts.values().sum()
    }

    pub fn add_truck(&mut self, kind: TruckKind) {
        *self.truck_counts.entry(kind).or_insert(0) += 1;
    }

    pub fn fleet_levels(&self) -> FleetLevels {
        FleetLevels {
            gather: self.truck_gather_level,
            unload: self.truck_unload_level,
            travel: self.truck_travel_level,
        }
    }

    pub fn is_unlocked(&self, sector: Sector) -> bool {
        sector == Sector::Outer || self.unlocked_sectors.contains(&sector)
    }

    /// Repair values a hand-edited or partial save may carry.
    pub fn sanitize(&mut self, balance: &BalanceConfig) {
        if !self.ore.is_finite() || self.ore < 0.0 {
            self.ore = 0.0;
        }
        self.unlocked_sectors.insert(Sector::Outer);
        self.unlocked_sectors.insert(self.current_sector);
        self.click_power = self.click_power.max(1);
        self.click_level = self.click_level.max(1);
        self.drone_damage = self.drone_damage.max(1);
        self.drone_damage_level = self.drone_damage_level.max(1);
        self.drone_fire_rate_level = self.drone_fire_rate_level.max(1);
        if self.drone_fire_rate_ms == 0 {
            self.drone_fire_rate_ms = balance.start_fire_rate_ms.max(1);
        }
        self.truck_counts.retain(|_, count| *count > 0);
    }
}
