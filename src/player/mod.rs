//! Player module - components, physics and respawn

mod components;
mod physics;
mod respawn;

pub use components::*;
pub use physics::*;
pub use respawn::*;
