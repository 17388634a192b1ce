//! Balance constants: the compiled defaults behind [`crate::balance::BalanceConfig`].
//!
//! Everything tunable lives here so a designer can find it without reading
//! the engine. Rates quoted "per frame" are per frame-equivalent
//! ([`FRAME_MS`] of simulated time).

/// Duration of one frame-equivalent in milliseconds (60 Hz).
pub const FRAME_MS: f64 = 1000.0 / 60.0;

/// Upper bound on the delta fed to per-frame motion and the truck FSM.
pub const MAX_FRAME_DELTA_MS: f64 = 50.0;

// ── Economy ──────────────────────────────────────────────────────────────────

/// Ore needed (and debited) the first time the Inner Belt is entered.
pub const SECTOR_UNLOCK_COST: u64 = 5000;

/// Scales every passive income figure (drones + trucks).
pub const GLOBAL_INCOME_MULTIPLIER: f64 = 0.65;

pub mod click {
    pub const BASE_COST: f64 = 10.0;
    pub const GROWTH: f64 = 1.7;
    pub const MAX_LEVEL: u32 = 20;
    pub const START_POWER: u32 = 1;
}

pub mod drones {
    /// Drone purchase: `floor(BASE_COST * COST_MULTIPLIER^owned)`.
    pub const BASE_COST: f64 = 100.0;
    pub const COST_MULTIPLIER: f64 = 10.0;

    pub const DAMAGE_BASE_COST: f64 = 250.0;
    pub const DAMAGE_GROWTH: f64 = 2.0;
    pub const DAMAGE_MAX_LEVEL: u32 = 25;
    pub const START_DAMAGE: u32 = 1;

    pub const FIRE_RATE_BASE_COST: f64 = 500.0;
    pub const FIRE_RATE_GROWTH: f64 = 2.0;
    pub const FIRE_RATE_MAX_LEVEL: u32 = 10;
    pub const START_FIRE_RATE_MS: u32 = 1000;
    /// Milliseconds shaved off the volley interval per fire-rate upgrade.
    pub const FIRE_RATE_STEP_MS: u32 = 150;
    /// Fire-rate upgrades stop once the interval is at or below this.
    pub const FIRE_RATE_FLOOR_MS: u32 = 200;
}

pub mod spawning {
    pub const RATE_BASE_COST: f64 = 300.0;
    pub const RATE_GROWTH: f64 = 1.8;
    /// Divisor growth per spawn-rate level: `1 + level * RATE_STEP`.
    pub const RATE_STEP: f64 = 0.25;
    pub const MIN_DELAY_FLOOR_MS: f64 = 200.0;
    pub const MAX_DELAY_FLOOR_MS: f64 = 400.0;
}

pub mod asteroids {
    pub const SIZE_MIN: f64 = 20.0;
    pub const SIZE_MAX: f64 = 45.0;
    pub const HP_PER_SIZE: f64 = 1.5;
    pub const REWARD_PER_SIZE: f64 = 0.5;
    pub const SPEED_MIN: f64 = 0.8;
    pub const SPEED_MAX: f64 = 2.0;
    /// Rotation speed is drawn from `±ROTATION_SPEED_RANGE` radians per frame.
    pub const ROTATION_SPEED_RANGE: f64 = 0.005;
    /// Asteroids further than this below the field bottom are culled.
    pub const OFFSCREEN_MARGIN: f64 = 50.0;
    pub const OUTLINE_VERTICES_MIN: u32 = 7;
    pub const OUTLINE_VERTICES_MAX: u32 = 11;
    pub const CRACKS_MIN: u32 = 2;
    pub const CRACKS_MAX: u32 = 4;
}

pub mod effects {
    pub const EXPLOSION_PARTICLES: u32 = 12;
    pub const PARTICLE_SPEED: f64 = 2.0;
    pub const PARTICLE_DECAY: f64 = 0.03;
    pub const LASER_DECAY: f64 = 0.05;
}

pub mod trucks {
    /// Purchase cost growth per owned unit of the same kind.
    pub const COST_FACTOR: f64 = 2.2;

    pub const UPGRADE_MAX_LEVEL: u32 = 10;
    pub const GATHER_BASE_COST: f64 = 2000.0;
    pub const UNLOAD_BASE_COST: f64 = 1500.0;
    pub const TRAVEL_BASE_COST: f64 = 2500.0;
    pub const UPGRADE_GROWTH: f64 = 1.9;

    pub const GATHER_STEP: f64 = 0.25;
    pub const UNLOAD_STEP: f64 = 0.35;
    pub const YIELD_STEP: f64 = 0.5;
    /// Pixels per frame added per travel level.
    pub const TRAVEL_STEP: f64 = 1.2;

    pub const GATHER_FLOOR_MS: f64 = 1500.0;
    pub const UNLOAD_FLOOR_MS: f64 = 500.0;
    /// Pause in `IdleLeft` between cycles.
    pub const REARM_MS: f64 = 1000.0;
    /// Extra distance past the right edge before a truck counts as offscreen.
    pub const FIELD_MARGIN: f64 = 60.0;
    /// Departure stagger between consecutive trucks on spawn.
    pub const SPAWN_STAGGER_MS: f64 = 400.0;
}
