//! Event type definitions for the notification bus and event log

use serde::{Deserialize, Serialize};

use crate::tuning::GameplayTuning;

/// Everything the core announces to collaborators
///
/// Fire-and-forget: nothing in the core reads these back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    // === Session Events ===
    /// Session started (generated once per game launch)
    SessionStart {
        session_id: String, // UUID v4
        timestamp: String,
    },
    /// Tuning snapshot (logged after session start)
    Config(GameplayTuning),
    /// Level loaded and spawned
    LevelStart { level_id: String },

    // === Movement Events ===
    Jump,
    Land,

    // === Rewind Events ===
    RewindStarted,
    /// Rewind ended; `undone` samples were handed to a ghost
    RewindStopped { undone: usize },
    /// Rewind refused by a guard
    RewindRejected { reason: String },

    // === Ghost Events ===
    GhostSpawned { samples: usize },
    GhostExpired,

    // === Puzzle Events ===
    PlatePressed { plate: String },
    PlateReleased { plate: String },
    DoorOpened { door: String },
    DoorClosed { door: String },

    // === Respawn Events ===
    PlayerKilled,
    Respawned,
}

impl GameEvent {
    /// Get the event type code for compact serialization
    pub fn type_code(&self) -> &'static str {
        match self {
            GameEvent::SessionStart { .. } => "SE",
            GameEvent::Config(_) => "CF",
            GameEvent::LevelStart { .. } => "LS",
            GameEvent::Jump => "J",
            GameEvent::Land => "LD",
            GameEvent::RewindStarted => "R+",
            GameEvent::RewindStopped { .. } => "R-",
            GameEvent::RewindRejected { .. } => "RX",
            GameEvent::GhostSpawned { .. } => "G+",
            GameEvent::GhostExpired => "G-",
            GameEvent::PlatePressed { .. } => "P+",
            GameEvent::PlateReleased { .. } => "P-",
            GameEvent::DoorOpened { .. } => "D+",
            GameEvent::DoorClosed { .. } => "D-",
            GameEvent::PlayerKilled => "K",
            GameEvent::Respawned => "RS",
        }
    }
}
