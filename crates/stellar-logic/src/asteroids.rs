//! Asteroid kinds, weighted kind selection, and spawn-time stat formulas.

use serde::{Deserialize, Serialize};

use crate::constants::{asteroids, spawning};

/// Ore composition of an asteroid. Drives toughness, payout and spawn odds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AsteroidKind {
    Iron,
    Titanium,
    Platinum,
}

/// Fixed per-kind multipliers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AsteroidKindStats {
    pub hp_multiplier: f64,
    pub reward_multiplier: f64,
    pub spawn_weight: f64,
}

impl AsteroidKind {
    pub fn all() -> &'static [AsteroidKind] {
        &[Self::Iron, Self::Titanium, Self::Platinum]
    }

    pub fn stats(&self) -> AsteroidKindStats {
        match self {
            Self::Iron => AsteroidKindStats {
                hp_multiplier: 2.0,
                reward_multiplier: 1.0,
                spawn_weight: 70.0,
            },
            Self::Titanium => AsteroidKindStats {
                hp_multiplier: 5.0,
                reward_multiplier: 2.5,
                spawn_weight: 25.0,
            },
            Self::Platinum => AsteroidKindStats {
                hp_multiplier: 10.0,
                reward_multiplier: 6.0,
                spawn_weight: 5.0,
            },
        }
    }

    /// Lowercase tag used by renderers to pick a palette.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Iron => "iron",
            Self::Titanium => "titanium",
            Self::Platinum => "platinum",
        }
    }
}

/// One row of a sector's spawn table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightedKind {
    pub kind: AsteroidKind,
    pub weight: f64,
}

impl WeightedKind {
    pub fn new(kind: AsteroidKind, weight: f64) -> Self {
        Self { kind, weight }
    }
}

/// Sum of the non-negative weights in `table`.
pub fn total_weight(table: &[WeightedKind]) -> f64 {
    table.iter().map(|w| w.weight.max(0.0)).sum()
}

/// Cumulative-weight roulette.
///
/// `roll` is expected in `[0, total_weight)`. The first row whose running sum
/// reaches the roll wins; anything past the end falls back to the first row.
/// Returns `None` only for an empty table.
pub fn pick_weighted(table: &[WeightedKind], roll: f64) -> Option<AsteroidKind> {
    let mut remaining = roll;
    for row in table {
        remaining -= row.weight.max(0.0);
        if remaining <= 0.0 {
            return Some(row.kind);
        }
    }
    table.first().map(|row| row.kind)
}

/// Hit points for a freshly spawned asteroid: `floor(floor(size * 1.5) * hp_multiplier)`.
pub fn asteroid_hp(size: f64, stats: &AsteroidKindStats) -> u32 {
    let base = (size * asteroids::HP_PER_SIZE).floor();
    (base * stats.hp_multiplier).floor().max(1.0) as u32
}

/// Ore paid out on destruction: `floor(size * 0.5 * reward_multiplier)`.
pub fn asteroid_reward(size: f64, stats: &AsteroidKindStats) -> u64 {
    (size * asteroids::REWARD_PER_SIZE * stats.reward_multiplier)
        .floor()
        .max(0.0) as u64
}

/// Effective `(min, max)` spawn delay in ms for a spawn-rate level.
///
/// Both bounds shrink by `1 + level * 0.25` and are floor-clamped to
/// 200 ms and 400 ms respectively.
pub fn spawn_delay_bounds(min_ms: f64, max_ms: f64, level: u32) -> (f64, f64) {
    let divisor = 1.0 + level as f64 * spawning::RATE_STEP;
    let min = (min_ms / divisor).max(spawning::MIN_DELAY_FLOOR_MS);
    let max = (max_ms / divisor).max(spawning::MAX_DELAY_FLOOR_MS);
    (min, max.max(min))
}
