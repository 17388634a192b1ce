//! Systems - logic that operates on components

mod combat;
mod effects;
mod field;
mod fleet;
mod squadron;

pub use combat::*;
pub use effects::*;
pub use field::*;
pub use fleet::*;
pub use squadron::*;
