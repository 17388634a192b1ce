//! Player input surface.

use serde::{Deserialize, Serialize};
use stellar_logic::logistics::{TruckKind, TruckUpgrade};
use stellar_logic::sectors::Sector;

/// A discrete player action.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Command {
    /// Click at a point in simulation space.
    Click { x: f64, y: f64 },
    UpgradeClick,
    BuyDrone,
    UpgradeDroneDamage,
    UpgradeDroneFireRate,
    UpgradeSpawnRate,
    BuyTruck { kind: TruckKind },
    UpgradeTruck { upgrade: TruckUpgrade },
    GoSector { sector: Sector },
    ResetSave,
}

/// Why a command left the state untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IgnoreReason {
    Unaffordable,
    Capped,
    /// Not available in the current sector.
    WrongSector,
    /// The click hit nothing.
    NoTarget,
    /// Already in the requested sector.
    AlreadyThere,
}

/// Informational result of [`Command`] application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandOutcome {
    Applied,
    Ignored(IgnoreReason),
}

impl CommandOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, CommandOutcome::Applied)
    }
}

impl From<Result<(), IgnoreReason>> for CommandOutcome {
    fn from(result: Result<(), IgnoreReason>) -> Self {
        match result {
            Ok(()) => CommandOutcome::Applied,
            Err(reason) => CommandOutcome::Ignored(reason),
        }
    }
}
