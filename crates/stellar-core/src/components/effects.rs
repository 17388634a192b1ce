//! Cosmetic effect components. They never influence the economy.

use serde::{Deserialize, Serialize};
use stellar_logic::asteroids::AsteroidKind;

use super::Position;

/// Beam drawn from a drone to its target; fades out.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Laser {
    pub from: Position,
    pub to: Position,
    pub alpha: f64,
}

impl Laser {
    pub fn new(from: Position, to: Position) -> Self {
        Self {
            from,
            to,
            alpha: 1.0,
        }
    }
}

/// Explosion debris. Pair with a [`Position`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Particle {
    pub vx: f64,
    pub vy: f64,
    pub life: f64,
    /// Kind of the asteroid that burst, for colouring.
    pub kind: AsteroidKind,
}
