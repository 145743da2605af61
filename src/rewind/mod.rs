//! Rewind module - motion recording, the rewind state machine and its systems

mod controller;
mod history;
mod segment;
mod systems;

pub use controller::*;
pub use history::*;
pub use segment::*;
pub use systems::*;
