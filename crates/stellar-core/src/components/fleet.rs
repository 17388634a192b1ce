//! Drone and truck components.

use serde::{Deserialize, Serialize};
use stellar_logic::logistics::TruckKind;

/// Cosmetic drone sprite. Damage lives in the economy ledger, not here.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DroneUnit {
    pub index: u32,
    pub hover_phase: f64,
}

/// Phases of a truck cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TruckState {
    /// Parked at the depot (x = 0) until the timer runs out.
    IdleLeft,
    MovingOut,
    OffscreenGather,
    MovingIn,
    Unloading,
}

impl TruckState {
    pub fn label(&self) -> &'static str {
        match self {
            TruckState::IdleLeft => "idle",
            TruckState::MovingOut => "outbound",
            TruckState::OffscreenGather => "gathering",
            TruckState::MovingIn => "inbound",
            TruckState::Unloading => "unloading",
        }
    }
}

/// One purchased truck.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Truck {
    pub kind: TruckKind,
    pub state: TruckState,
    pub x: f64,
    /// Countdown for the timed states, in ms.
    pub timer_ms: f64,
    /// Display row, assigned in purchase order.
    pub lane: u32,
}

impl Truck {
    pub fn parked(kind: TruckKind, lane: u32, delay_ms: f64) -> Self {
        Self {
            kind,
            state: TruckState::IdleLeft,
            x: 0.0,
            timer_ms: delay_ms.max(0.0),
            lane,
        }
    }
}
