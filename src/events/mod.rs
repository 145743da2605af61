//! Game event notifications and the session event log
//!
//! Core systems announce what happened on the [`EventBus`]; the
//! [`EventLogger`] writes each frame's events in a compact text format.

mod bus;
mod format;
mod logger;
mod types;

pub use bus::{BusEvent, EventBus, update_event_bus_time};
pub use format::{parse_event, serialize_event};
pub use logger::{EventLogConfig, EventLogger, flush_event_bus};
pub use types::GameEvent;
