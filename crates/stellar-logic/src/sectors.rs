//! Sector identities and their static profiles.

use serde::{Deserialize, Serialize};

use crate::asteroids::{AsteroidKind, WeightedKind};

/// The two mutually exclusive gameplay modes.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Sector {
    /// Mining: clicking and drones against falling asteroids.
    #[default]
    Outer,
    /// Logistics: truck fleet cycles.
    Inner,
}

impl Sector {
    pub fn all() -> &'static [Sector] {
        &[Self::Outer, Self::Inner]
    }

    /// 1-based number shown to players.
    pub fn number(&self) -> u8 {
        match self {
            Self::Outer => 1,
            Self::Inner => 2,
        }
    }

    /// Whether asteroids, clicking and drones run here.
    pub fn has_asteroid_field(&self) -> bool {
        matches!(self, Self::Outer)
    }

    /// Whether the truck fleet cycles here.
    pub fn has_truck_fleet(&self) -> bool {
        matches!(self, Self::Inner)
    }
}

/// Static, tunable description of a sector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorProfile {
    pub name: String,
    pub asteroid_speed_multiplier: f64,
    pub spawn_delay_min_ms: f64,
    pub spawn_delay_max_ms: f64,
    /// Empty for sectors without an asteroid field.
    pub asteroid_table: Vec<WeightedKind>,
}

impl SectorProfile {
    pub fn default_for(sector: Sector) -> Self {
        match sector {
            Sector::Outer => Self {
                name: "Outer Belt".to_string(),
                asteroid_speed_multiplier: 1.0,
                spawn_delay_min_ms: 700.0,
                spawn_delay_max_ms: 1500.0,
                // Every kind, platinum included: Outer is the only field.
                asteroid_table: AsteroidKind::all()
                    .iter()
                    .map(|k| WeightedKind::new(*k, k.stats().spawn_weight))
                    .collect(),
            },
            Sector::Inner => Self {
                name: "Inner Belt".to_string(),
                asteroid_speed_multiplier: 1.4,
                spawn_delay_min_ms: 900.0,
                spawn_delay_max_ms: 2000.0,
                asteroid_table: Vec::new(),
            },
        }
    }
}
