//! Echostep - a 2D platformer built around a bounded time rewind
//!
//! The player can rewind their recent movement. Whatever was undone replays
//! afterwards as a ghost that presses plates and blocks hazard beams.

// Core modules
pub mod app;
pub mod body;
pub mod constants;
pub mod events;
pub mod helpers;
pub mod tuning;

// Gameplay modules
pub mod ghost;
pub mod input;
pub mod levels;
pub mod player;
pub mod puzzle;
pub mod rewind;
pub mod world;

// Re-export commonly used types for convenience
pub use app::{EchostepPlugin, HeadlessAppBuilder};
pub use body::{Body, BodyKind, Collider, Interpolation, KindFilter, PhysicsControl, Velocity};
pub use constants::*;
pub use events::{BusEvent, EventBus, EventLogConfig, EventLogger, GameEvent};
pub use ghost::{GhostPlayback, SpawnGhost};
pub use input::PlayerInput;
pub use levels::{CurrentLevel, LevelData, LevelDatabase, LoadLevel};
pub use player::{Facing, KillRequest, Player, SpawnPoint};
pub use puzzle::{
    BeamHit, BeamOutcome, CombineMode, Door, HazardBeam, PressurePlate, TriggerEvent,
    TriggerVolume,
};
pub use rewind::{
    MotionHistory, RecordedSample, ReplaySegment, RewindCommand, RewindController, RewindPhase,
    RewindRejection, RewindSettings,
};
pub use tuning::{GAMEPLAY_TUNING_FILE, GameplayTuning};
