//! Tunable balance table.
//!
//! [`BalanceConfig::default`] reproduces the compiled constants. Every field
//! is `#[serde(default)]` at the container level, so a TOML file only needs
//! the keys it overrides. Nested tables (tracks, profiles, truck specs) are
//! replaced whole when present.

use serde::{Deserialize, Serialize};

use crate::constants::{self, drones, trucks};
use crate::logistics::{TruckKind, TruckSpec};
use crate::sectors::{Sector, SectorProfile};
use crate::upgrades::{drone_purchase_curve, PurchaseCurve, UpgradeKind, UpgradeTrack};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BalanceConfig {
    pub click: UpgradeTrack,
    pub drone_damage: UpgradeTrack,
    pub drone_fire_rate: UpgradeTrack,
    pub spawn_rate: UpgradeTrack,
    pub truck_gather: UpgradeTrack,
    pub truck_unload: UpgradeTrack,
    pub truck_travel: UpgradeTrack,

    pub drone_curve: PurchaseCurve,
    pub start_fire_rate_ms: u32,
    pub fire_rate_step_ms: u32,
    pub fire_rate_floor_ms: u32,

    pub sector_unlock_cost: u64,
    pub income_multiplier: f64,
    pub outer: SectorProfile,
    pub inner: SectorProfile,

    pub small_truck: TruckSpec,
    pub medium_truck: TruckSpec,
    pub large_truck: TruckSpec,
    pub truck_cost_factor: f64,
    pub truck_rearm_ms: f64,
    pub truck_spawn_stagger_ms: f64,
}

impl Default for BalanceConfig {
    fn default() -> Self {
        Self {
            click: UpgradeKind::Click.default_track(),
            drone_damage: UpgradeKind::DroneDamage.default_track(),
            drone_fire_rate: UpgradeKind::DroneFireRate.default_track(),
            spawn_rate: UpgradeKind::SpawnRate.default_track(),
            truck_gather: UpgradeKind::TruckGather.default_track(),
            truck_unload: UpgradeKind::TruckUnload.default_track(),
            truck_travel: UpgradeKind::TruckTravel.default_track(),
            drone_curve: drone_purchase_curve(),
            start_fire_rate_ms: drones::START_FIRE_RATE_MS,
            fire_rate_step_ms: drones::FIRE_RATE_STEP_MS,
            fire_rate_floor_ms: drones::FIRE_RATE_FLOOR_MS,
            sector_unlock_cost: constants::SECTOR_UNLOCK_COST,
            income_multiplier: constants::GLOBAL_INCOME_MULTIPLIER,
            outer: SectorProfile::default_for(Sector::Outer),
            inner: SectorProfile::default_for(Sector::Inner),
            small_truck: TruckKind::Small.spec(),
            medium_truck: TruckKind::Medium.spec(),
            large_truck: TruckKind::Large.spec(),
            truck_cost_factor: trucks::COST_FACTOR,
            truck_rearm_ms: trucks::REARM_MS,
            truck_spawn_stagger_ms: trucks::SPAWN_STAGGER_MS,
        }
    }
}

impl BalanceConfig {
    pub fn track(&self, kind: UpgradeKind) -> &UpgradeTrack {
        match kind {
            UpgradeKind::Click => &self.click,
            UpgradeKind::DroneDamage => &self.drone_damage,
            UpgradeKind::DroneFireRate => &self.drone_fire_rate,
            UpgradeKind::SpawnRate => &self.spawn_rate,
            UpgradeKind::TruckGather => &self.truck_gather,
            UpgradeKind::TruckUnload => &self.truck_unload,
            UpgradeKind::TruckTravel => &self.truck_travel,
        }
    }

    pub fn profile(&self, sector: Sector) -> &SectorProfile {
        match sector {
            Sector::Outer => &self.outer,
            Sector::Inner => &self.inner,
        }
    }

    pub fn truck_spec(&self, kind: TruckKind) -> &TruckSpec {
        match kind {
            TruckKind::Small => &self.small_truck,
            TruckKind::Medium => &self.medium_truck,
            TruckKind::Large => &self.large_truck,
        }
    }

    pub fn truck_curve(&self, kind: TruckKind) -> PurchaseCurve {
        kind.purchase_curve(self.truck_spec(kind), self.truck_cost_factor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_catalog() {
        let balance = BalanceConfig::default();
        assert_eq!(balance.track(UpgradeKind::Click).cost_at(2), 17);
        assert_eq!(balance.sector_unlock_cost, 5000);
        assert_eq!(balance.truck_curve(TruckKind::Small).cost(1), 11000);
        assert_eq!(balance.truck_spec(TruckKind::Large).capacity, 600);
        assert_eq!(balance.profile(Sector::Inner).name, "Inner Belt");
    }

    #[test]
    fn test_track_lookup_covers_every_kind() {
        let balance = BalanceConfig::default();
        for kind in UpgradeKind::all() {
            assert_eq!(*balance.track(*kind), kind.default_track());
        }
    }
}
