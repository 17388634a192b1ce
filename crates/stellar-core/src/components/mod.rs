//! Component definitions for the entity world.
//!
//! Components are pure data structs attached to entities.
//! They have no behavior - that lives in systems.

mod common;
mod effects;
mod field;
mod fleet;

pub use common::*;
pub use effects::*;
pub use field::*;
pub use fleet::*;
