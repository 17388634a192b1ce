//! Stellar Extractor Core - idle mining simulation engine
//!
//! Owns the economy ledger, the two-sector progression, asteroid combat,
//! the truck logistics loop and offline-progress reconciliation. Rendering
//! and input wiring live in the host, which feeds [`command::Command`]s and
//! viewport geometry in and polls [`view::ViewModel`] out.
//!
//! # Architecture
//!
//! Transient and unit entities live in a `hecs` world:
//! - **Entities**: asteroids, drone units, trucks, lasers, explosion particles
//! - **Components**: pure data attached to entities (Position, Asteroid, Truck, ...)
//! - **Systems**: functions that query and update components
//!
//! Everything that is saved lives in [`economy::EconomyState`]; timers are
//! explicit entries in a [`clock::Scheduler`].
//!
//! # Example
//!
//! ```rust,no_run
//! use stellar_core::prelude::*;
//!
//! let mut engine = SimulationEngine::new(EngineConfig::default());
//! engine.start();
//!
//! loop {
//!     engine.update(1000.0 / 60.0); // 60 FPS
//!     let _view = engine.view();
//! }
//! ```

pub mod clock;
pub mod command;
pub mod components;
pub mod config;
pub mod economy;
pub mod engine;
pub mod persistence;
pub mod sector;
pub mod session;
pub mod systems;
pub mod view;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::clock::{ManualClock, SystemClock, WallClock};
    pub use crate::command::{Command, CommandOutcome, IgnoreReason};
    pub use crate::components::*;
    pub use crate::config::EngineConfig;
    pub use crate::economy::EconomyState;
    pub use crate::engine::{OfflineReport, SimulationEngine};
    pub use crate::persistence::{FileStore, MemoryStore, Snapshot, SnapshotFormat, SnapshotStore};
    pub use crate::session::{IdentityProvider, Session, StaticIdentity, UserId};
    pub use crate::view::ViewModel;
}
