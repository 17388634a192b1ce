//! Truck catalog and cycle timing for the Inner Belt logistics loop.
//!
//! A truck cycle is: idle at the depot → drive out past the right edge →
//! gather offscreen → drive back → unload. Only gather/unload/travel levels
//! change the timings; the catalog entry fixes everything else.

use serde::{Deserialize, Serialize};

use crate::constants::{trucks, FRAME_MS};
use crate::upgrades::{PurchaseCurve, UpgradeKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TruckKind {
    Small,
    Medium,
    Large,
}

/// Immutable catalog entry for a truck kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TruckSpec {
    /// Base purchase cost (owned = 0, before the free-first rule).
    pub cost: f64,
    /// Ore per cycle at gather level 0.
    pub capacity: u32,
    pub gather_ms: f64,
    pub unload_ms: f64,
    /// Pixels per frame-equivalent at travel level 0.
    pub base_speed: f64,
}

impl TruckKind {
    pub fn all() -> &'static [TruckKind] {
        &[Self::Small, Self::Medium, Self::Large]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Small => "Small Hauler",
            Self::Medium => "Medium Hauler",
            Self::Large => "Heavy Hauler",
        }
    }

    pub fn spec(&self) -> TruckSpec {
        match self {
            Self::Small => TruckSpec {
                cost: 5000.0,
                capacity: 40,
                gather_ms: 5000.0,
                unload_ms: 2500.0,
                base_speed: 2.5,
            },
            Self::Medium => TruckSpec {
                cost: 30_000.0,
                capacity: 150,
                gather_ms: 7000.0,
                unload_ms: 3500.0,
                base_speed: 2.0,
            },
            Self::Large => TruckSpec {
                cost: 150_000.0,
                capacity: 600,
                gather_ms: 10_000.0,
                unload_ms: 5000.0,
                base_speed: 1.5,
            },
        }
    }

    /// Purchase curve for this kind; only the first small truck is free.
    pub fn purchase_curve(&self, spec: &TruckSpec, factor: f64) -> PurchaseCurve {
        let curve = PurchaseCurve::new(spec.cost, factor);
        match self {
            Self::Small => curve.with_first_free(),
            _ => curve,
        }
    }
}

/// Fleet-wide truck upgrades.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TruckUpgrade {
    Gather,
    Unload,
    Travel,
}

impl TruckUpgrade {
    pub fn all() -> &'static [TruckUpgrade] {
        &[Self::Gather, Self::Unload, Self::Travel]
    }

    pub fn upgrade_kind(&self) -> UpgradeKind {
        match self {
            Self::Gather => UpgradeKind::TruckGather,
            Self::Unload => UpgradeKind::TruckUnload,
            Self::Travel => UpgradeKind::TruckTravel,
        }
    }
}

/// Current fleet upgrade levels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FleetLevels {
    pub gather: u32,
    pub unload: u32,
    pub travel: u32,
}

/// Time spent offscreen gathering: `max(1500, gather_ms / (1 + gather * 0.25))`.
pub fn gather_duration_ms(spec: &TruckSpec, gather_level: u32) -> f64 {
    (spec.gather_ms / (1.0 + gather_level as f64 * trucks::GATHER_STEP)).max(trucks::GATHER_FLOOR_MS)
}

/// Time spent unloading at the depot: `max(500, unload_ms / (1 + unload * 0.35))`.
pub fn unload_duration_ms(spec: &TruckSpec, unload_level: u32) -> f64 {
    (spec.unload_ms / (1.0 + unload_level as f64 * trucks::UNLOAD_STEP)).max(trucks::UNLOAD_FLOOR_MS)
}

/// Pixels per frame-equivalent: `base_speed + travel * 1.2`.
pub fn travel_speed(spec: &TruckSpec, travel_level: u32) -> f64 {
    spec.base_speed + travel_level as f64 * trucks::TRAVEL_STEP
}

/// Ore credited per completed cycle: `floor(capacity * (1 + gather * 0.5))`.
pub fn yield_per_cycle(spec: &TruckSpec, gather_level: u32) -> u64 {
    (spec.capacity as f64 * (1.0 + gather_level as f64 * trucks::YIELD_STEP)).floor() as u64
}

/// Distance a truck drives one way before it counts as offscreen.
pub fn one_way_distance(field_width: f64) -> f64 {
    field_width.max(0.0) + trucks::FIELD_MARGIN
}

/// Seconds for one full cycle: round-trip travel + gather + unload.
pub fn cycle_seconds(spec: &TruckSpec, levels: &FleetLevels, field_width: f64) -> f64 {
    let px_per_second = travel_speed(spec, levels.travel) * (1000.0 / FRAME_MS);
    let travel = if px_per_second > 0.0 {
        2.0 * one_way_distance(field_width) / px_per_second
    } else {
        f64::INFINITY
    };
    travel
        + gather_duration_ms(spec, levels.gather) / 1000.0
        + unload_duration_ms(spec, levels.unload) / 1000.0
}
