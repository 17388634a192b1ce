//! Asteroid field components. Everything except `hp` and the motion state is
//! fixed at spawn.

use serde::{Deserialize, Serialize};
use stellar_logic::asteroids::AsteroidKind;

/// A mineable asteroid.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Asteroid {
    /// Spawn counter; lower is older. Used for tie-breaks and view ordering.
    pub serial: u64,
    pub kind: AsteroidKind,
    pub size: f64,
    pub hp: u32,
    pub max_hp: u32,
    /// Pixels per frame-equivalent, sector multiplier already applied.
    pub speed: f64,
    pub reward: u64,
}

impl Asteroid {
    /// Apply damage, saturating at 0. Returns true when this hit destroyed it.
    pub fn apply_damage(&mut self, damage: u32) -> bool {
        let was_alive = self.hp > 0;
        self.hp = self.hp.saturating_sub(damage);
        was_alive && self.hp == 0
    }

    pub fn is_destroyed(&self) -> bool {
        self.hp == 0
    }
}

/// Rotation state (radians, radians per frame-equivalent).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Spin {
    pub rotation: f64,
    pub speed: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct OutlineVertex {
    pub angle: f64,
    pub radius: f64,
}

/// Irregular polygon outline in polar coordinates around the centre.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Outline {
    pub vertices: Vec<OutlineVertex>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Crack {
    pub angle: f64,
    pub length: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Cracks {
    pub lines: Vec<Crack>,
}
