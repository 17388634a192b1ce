//! Common components shared by several entity kinds.

use serde::{Deserialize, Serialize};

/// 2D position in simulation space (pixels, y grows downward).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_squared(&self, other: &Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    pub fn distance(&self, other: &Self) -> f64 {
        self.distance_squared(other).sqrt()
    }
}

/// Viewport geometry supplied by the host. Never smaller than 1x1.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: clamp_extent(width),
            height: clamp_extent(height),
        }
    }
}

fn clamp_extent(value: f64) -> f64 {
    if value.is_finite() {
        value.max(1.0)
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance() {
        let a = Position::new(0.0, 0.0);
        let b = Position::new(3.0, 4.0);
        assert_eq!(a.distance(&b), 5.0);
    }

    #[test]
    fn test_viewport_clamps_degenerate_sizes() {
        let v = Viewport::new(0.0, -20.0);
        assert_eq!((v.width, v.height), (1.0, 1.0));
        let v = Viewport::new(f64::NAN, 300.0);
        assert_eq!((v.width, v.height), (1.0, 300.0));
    }
}
