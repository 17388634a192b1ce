//! Upgrade tracks and purchase curves.
//!
//! Every purchasable stat is priced by an exponential curve. Leveled stats use
//! [`UpgradeTrack`] (`floor(base * growth^(level - start_level))` with an
//! optional cap); owned-unit purchases (drones, trucks) use [`PurchaseCurve`]
//! keyed by how many units are already owned.

use serde::{Deserialize, Serialize};

use crate::constants::{click, drones, spawning, trucks};

/// Every leveled stat the player can upgrade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum UpgradeKind {
    Click,
    DroneDamage,
    DroneFireRate,
    SpawnRate,
    TruckGather,
    TruckUnload,
    TruckTravel,
}

impl UpgradeKind {
    pub fn all() -> &'static [UpgradeKind] {
        &[
            Self::Click,
            Self::DroneDamage,
            Self::DroneFireRate,
            Self::SpawnRate,
            Self::TruckGather,
            Self::TruckUnload,
            Self::TruckTravel,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Click => "Click Power",
            Self::DroneDamage => "Drone Damage",
            Self::DroneFireRate => "Drone Speed",
            Self::SpawnRate => "Asteroid Density",
            Self::TruckGather => "Truck Gathering",
            Self::TruckUnload => "Truck Unloading",
            Self::TruckTravel => "Truck Engines",
        }
    }

    /// Compiled-default curve for this stat.
    pub fn default_track(&self) -> UpgradeTrack {
        match self {
            Self::Click => UpgradeTrack::capped(click::BASE_COST, click::GROWTH, 1, click::MAX_LEVEL),
            Self::DroneDamage => UpgradeTrack::capped(
                drones::DAMAGE_BASE_COST,
                drones::DAMAGE_GROWTH,
                1,
                drones::DAMAGE_MAX_LEVEL,
            ),
            Self::DroneFireRate => UpgradeTrack::capped(
                drones::FIRE_RATE_BASE_COST,
                drones::FIRE_RATE_GROWTH,
                1,
                drones::FIRE_RATE_MAX_LEVEL,
            ),
            Self::SpawnRate => {
                UpgradeTrack::uncapped(spawning::RATE_BASE_COST, spawning::RATE_GROWTH, 0)
            }
            Self::TruckGather => UpgradeTrack::capped(
                trucks::GATHER_BASE_COST,
                trucks::UPGRADE_GROWTH,
                0,
                trucks::UPGRADE_MAX_LEVEL,
            ),
            Self::TruckUnload => UpgradeTrack::capped(
                trucks::UNLOAD_BASE_COST,
                trucks::UPGRADE_GROWTH,
                0,
                trucks::UPGRADE_MAX_LEVEL,
            ),
            Self::TruckTravel => UpgradeTrack::capped(
                trucks::TRAVEL_BASE_COST,
                trucks::UPGRADE_GROWTH,
                0,
                trucks::UPGRADE_MAX_LEVEL,
            ),
        }
    }
}

/// Immutable cost curve for one leveled stat.
///
/// The mutable level lives with the economy ledger; the track only answers
/// "what does the next level cost" and "is this level capped".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UpgradeTrack {
    pub base_cost: f64,
    pub growth: f64,
    /// Level a fresh save starts at; the first purchase costs `base_cost`.
    pub start_level: u32,
    /// Highest reachable level, `None` for uncapped tracks.
    pub max_level: Option<u32>,
}

impl UpgradeTrack {
    pub const fn capped(base_cost: f64, growth: f64, start_level: u32, max_level: u32) -> Self {
        Self {
            base_cost,
            growth,
            start_level,
            max_level: Some(max_level),
        }
    }

    pub const fn uncapped(base_cost: f64, growth: f64, start_level: u32) -> Self {
        Self {
            base_cost,
            growth,
            start_level,
            max_level: None,
        }
    }

    /// Cost of buying the level after `level`.
    ///
    /// Pure function of the catalog entry and `level`; levels below
    /// `start_level` are priced like `start_level`.
    pub fn cost_at(&self, level: u32) -> u64 {
        let steps = level.saturating_sub(self.start_level);
        floor_cost(self.base_cost * self.growth.powi(steps as i32))
    }

    pub fn is_maxed(&self, level: u32) -> bool {
        self.max_level.is_some_and(|max| level >= max)
    }

    /// `None` once the track is capped.
    pub fn next_cost(&self, level: u32) -> Option<u64> {
        if self.is_maxed(level) {
            None
        } else {
            Some(self.cost_at(level))
        }
    }

    /// Purchases made so far, given the current level.
    pub fn purchases(&self, level: u32) -> u32 {
        level.saturating_sub(self.start_level)
    }
}

/// Cost curve keyed by the number of units already owned.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PurchaseCurve {
    pub base_cost: f64,
    pub factor: f64,
    /// The very first unit (owned = 0) is free.
    pub first_free: bool,
}

impl PurchaseCurve {
    pub const fn new(base_cost: f64, factor: f64) -> Self {
        Self {
            base_cost,
            factor,
            first_free: false,
        }
    }

    pub const fn with_first_free(mut self) -> Self {
        self.first_free = true;
        self
    }

    /// `floor(base * factor^owned)`, or 0 for the free first unit.
    pub fn cost(&self, owned: u32) -> u64 {
        if self.first_free && owned == 0 {
            return 0;
        }
        floor_cost(self.base_cost * self.factor.powi(owned as i32))
    }
}

/// Default drone purchase curve.
pub fn drone_purchase_curve() -> PurchaseCurve {
    PurchaseCurve::new(drones::BASE_COST, drones::COST_MULTIPLIER)
}

/// Next volley interval after a fire-rate upgrade.
///
/// Upgrades are offered while the interval is above `floor_ms`, and the last
/// step may land below it (250 ms goes to 100 ms with the default step).
/// `None` once at or below the floor, or when a step would reach zero.
pub fn next_fire_rate_ms(current_ms: u32, step_ms: u32, floor_ms: u32) -> Option<u32> {
    if current_ms <= floor_ms {
        return None;
    }
    match current_ms.saturating_sub(step_ms) {
        0 => None,
        next => Some(next),
    }
}

/// Saturating float → ore conversion (negative and NaN become 0).
fn floor_cost(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        value.floor() as u64
    } else if value.is_infinite() && value > 0.0 {
        u64::MAX
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_click_track_costs() {
        let track = UpgradeKind::Click.default_track();
        assert_eq!(track.cost_at(1), 10);
        assert_eq!(track.cost_at(2), 17);
        assert_eq!(track.cost_at(3), 28);
    }

    #[test]
    fn test_cost_is_idempotent() {
        let track = UpgradeKind::DroneDamage.default_track();
        assert_eq!(track.cost_at(7), track.cost_at(7));
        assert_eq!(track.cost_at(1), 250);
        assert_eq!(track.cost_at(3), 1000);
    }

    #[test]
    fn test_zero_based_tracks_start_at_base() {
        let gather = UpgradeKind::TruckGather.default_track();
        assert_eq!(gather.cost_at(0), 2000);
        assert_eq!(gather.cost_at(1), 3800);
        let spawn = UpgradeKind::SpawnRate.default_track();
        assert_eq!(spawn.cost_at(0), 300);
        assert_eq!(spawn.purchases(4), 4);
    }

    #[test]
    fn test_caps() {
        let click = UpgradeKind::Click.default_track();
        assert!(!click.is_maxed(19));
        assert!(click.is_maxed(20));
        assert_eq!(click.next_cost(20), None);
        assert!(click.next_cost(19).is_some());

        let spawn = UpgradeKind::SpawnRate.default_track();
        assert!(!spawn.is_maxed(10_000));
    }

    #[test]
    fn test_track_caps_match_catalog() {
        let caps: Vec<_> = UpgradeKind::all()
            .iter()
            .map(|k| k.default_track().max_level)
            .collect();
        assert_eq!(
            caps,
            vec![Some(20), Some(25), Some(10), None, Some(10), Some(10), Some(10)]
        );
    }

    #[test]
    fn test_small_truck_curve() {
        let curve = PurchaseCurve::new(5000.0, 2.2).with_first_free();
        assert_eq!(curve.cost(0), 0);
        assert_eq!(curve.cost(1), 11000);
        assert_eq!(curve.cost(2), 24200);
    }

    #[test]
    fn test_drone_curve() {
        let curve = drone_purchase_curve();
        assert_eq!(curve.cost(0), 100);
        assert_eq!(curve.cost(1), 1000);
        assert_eq!(curve.cost(2), 10_000);
    }

    #[test]
    fn test_fire_rate_steps_past_floor() {
        assert_eq!(next_fire_rate_ms(1000, 150, 200), Some(850));
        assert_eq!(next_fire_rate_ms(250, 150, 200), Some(100));
        assert_eq!(next_fire_rate_ms(200, 150, 200), None);
        assert_eq!(next_fire_rate_ms(100, 150, 200), None);
        assert_eq!(next_fire_rate_ms(300, 400, 200), None);

        let mut rate = 1000;
        let mut steps = Vec::new();
        while let Some(next) = next_fire_rate_ms(rate, 150, 200) {
            rate = next;
            steps.push(rate);
        }
        assert_eq!(steps, vec![850, 700, 550, 400, 250, 100]);
    }

    #[test]
    fn test_huge_level_saturates() {
        let track = UpgradeTrack::uncapped(1e300, 1e10, 0);
        assert_eq!(track.cost_at(1000), u64::MAX);
    }
}
