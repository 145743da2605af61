//! Puzzle module - triggers, pressure plates, doors and hazard beams
//!
//! Plates and beams see the player and the ghost the same way: both are
//! [`Body`](crate::body::Body) entities distinguished only by kind.

mod beam;
mod door;
mod plate;
mod trigger;

pub use beam::*;
pub use door::*;
pub use plate::*;
pub use trigger::*;
