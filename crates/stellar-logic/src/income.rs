//! Passive income estimation: drone and truck throughput, offline catch-up
//! and the fractional carry used by the once-per-second online accrual.

use serde::{Deserialize, Serialize};

use crate::logistics::{cycle_seconds, yield_per_cycle, FleetLevels, TruckSpec};

/// Steady-state ore/second of the drone squadron (before the global multiplier).
pub fn drone_ore_per_second(drone_count: u32, drone_damage: u32, fire_rate_ms: u32) -> f64 {
    if drone_count == 0 || fire_rate_ms == 0 {
        return 0.0;
    }
    drone_count as f64 * drone_damage as f64 * 1000.0 / fire_rate_ms as f64
}

/// Steady-state ore/second of a single truck of the given spec.
pub fn truck_ore_per_second(spec: &TruckSpec, levels: &FleetLevels, field_width: f64) -> f64 {
    let cycle = cycle_seconds(spec, levels, field_width);
    if !cycle.is_finite() || cycle <= 0.0 {
        return 0.0;
    }
    yield_per_cycle(spec, levels.gather) as f64 / cycle
}

/// Income split by source, multiplier already applied to every figure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct IncomeBreakdown {
    pub drones_per_second: f64,
    pub trucks_per_second: f64,
}

impl IncomeBreakdown {
    /// Combine raw source rates and apply the global multiplier.
    pub fn new(raw_drones: f64, raw_trucks: f64, multiplier: f64) -> Self {
        Self {
            drones_per_second: raw_drones * multiplier,
            trucks_per_second: raw_trucks * multiplier,
        }
    }

    pub fn total_per_second(&self) -> f64 {
        self.drones_per_second + self.trucks_per_second
    }

    pub fn drones_per_minute(&self) -> f64 {
        self.drones_per_second * 60.0
    }

    pub fn trucks_per_minute(&self) -> f64 {
        self.trucks_per_second * 60.0
    }

    pub fn total_per_minute(&self) -> f64 {
        self.total_per_second() * 60.0
    }
}

/// Lump-sum credit for time spent offline. Negative or non-finite inputs credit nothing.
pub fn offline_credit(ore_per_second: f64, elapsed_seconds: f64) -> f64 {
    if !ore_per_second.is_finite() || !elapsed_seconds.is_finite() {
        return 0.0;
    }
    if ore_per_second <= 0.0 || elapsed_seconds <= 0.0 {
        return 0.0;
    }
    ore_per_second * elapsed_seconds
}

/// Carries the fractional part of passive income between accrual ticks so
/// repeated flooring never loses ore.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct IncomeCarry {
    fraction: f64,
}

impl IncomeCarry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one tick's worth of income and return the whole ore to credit now.
    pub fn accrue(&mut self, amount: f64) -> u64 {
        if amount.is_finite() && amount > 0.0 {
            self.fraction += amount;
        }
        let whole = self.fraction.floor();
        self.fraction -= whole;
        whole as u64
    }

    pub fn fraction(&self) -> f64 {
        self.fraction
    }

    pub fn reset(&mut self) {
        self.fraction = 0.0;
    }
}
