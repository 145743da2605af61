//! Tunable constants for echostep
//!
//! Default gameplay values live here; most of them can be overridden at
//! runtime through `config/gameplay_tuning.json` (see `tuning.rs`).

use bevy::prelude::*;

// =============================================================================
// COLORS
// =============================================================================

pub const BACKGROUND_COLOR: Color = Color::srgb(0.08, 0.09, 0.12);
pub const PLATFORM_COLOR: Color = Color::srgb(0.24, 0.25, 0.3);
pub const PLAYER_COLOR: Color = Color::srgb(0.95, 0.85, 0.6);
pub const GHOST_COLOR: Color = Color::srgba(0.55, 0.8, 1.0, 0.55);
pub const PLATE_IDLE_COLOR: Color = Color::srgb(0.45, 0.35, 0.2);
pub const PLATE_PRESSED_COLOR: Color = Color::srgb(0.95, 0.7, 0.2);
pub const DOOR_COLOR: Color = Color::srgb(0.55, 0.3, 0.3);
pub const BEAM_COLOR: Color = Color::srgb(1.0, 0.2, 0.25);
pub const BEAM_BLOCKED_COLOR: Color = Color::srgb(0.4, 0.8, 1.0);

// =============================================================================
// SIZE CONSTANTS
// =============================================================================

pub const PLAYER_SIZE: Vec2 = Vec2::new(28.0, 48.0);
pub const PLATE_HEIGHT: f32 = 10.0;

// =============================================================================
// SIMULATION RATE
// =============================================================================

/// Fixed simulation steps per second. Samples are recorded at this rate.
pub const FIXED_HZ: f64 = 50.0;

// =============================================================================
// REWIND
// =============================================================================

pub const RECORDING_DURATION: f32 = 5.0; // Seconds of motion kept in history
pub const MIN_REWIND_SAMPLES: usize = 10; // History needed before a rewind may start
pub const REWIND_COOLDOWN: f32 = 0.5; // Seconds after a rewind ends before another may start
pub const MAX_REWIND_REACH: f32 = 4.0; // How far back one gesture may reach (0 = unbounded)
pub const REWIND_SMOOTH_TIME: f32 = 0.05; // Visual smoothing time constant

// =============================================================================
// GHOST
// =============================================================================

pub const GHOST_REPLAY_SPEED: f32 = 1.0;
pub const GHOST_LIFETIME: f32 = 12.0; // Seconds a ghost lives regardless of playback
pub const GHOST_FACING_DEADZONE: f32 = 5.0; // Horizontal speed below which facing holds

// =============================================================================
// PHYSICS CONSTANTS
// =============================================================================

pub const GRAVITY_RISE: f32 = 980.0; // Gravity while rising
pub const GRAVITY_FALL: f32 = 1400.0; // Gravity while falling (fast fall)
pub const JUMP_VELOCITY: f32 = 620.0;
pub const JUMP_CUT_MULTIPLIER: f32 = 0.4; // Velocity multiplier when releasing jump early
pub const MOVE_SPEED: f32 = 280.0;
pub const GROUND_ACCEL: f32 = 2400.0;
pub const GROUND_DECEL: f32 = 1800.0;
pub const AIR_ACCEL: f32 = 1500.0;
pub const AIR_DECEL: f32 = 900.0;
pub const COLLISION_EPSILON: f32 = 0.5; // Skin width for collision detection
pub const MAX_FALL_SPEED: f32 = 1200.0;

// =============================================================================
// GAME FEEL CONSTANTS
// =============================================================================

pub const COYOTE_TIME: f32 = 0.1;
pub const JUMP_BUFFER_TIME: f32 = 0.1;
pub const STICK_DEADZONE: f32 = 0.25;

// =============================================================================
// HAZARDS
// =============================================================================

pub const DEFAULT_BEAM_DISTANCE: f32 = 2000.0;

// =============================================================================
// ARENA DIMENSIONS
// =============================================================================

pub const ARENA_WIDTH: f32 = 1600.0;
pub const ARENA_HEIGHT: f32 = 900.0;
pub const ARENA_FLOOR_Y: f32 = -ARENA_HEIGHT / 2.0;
pub const FLOOR_THICKNESS: f32 = 40.0;
pub const WALL_THICKNESS: f32 = 20.0;

pub const DEFAULT_SPAWN: Vec2 = Vec2::new(-600.0, ARENA_FLOOR_Y + 60.0);

// =============================================================================
// FILES
// =============================================================================

pub const LEVELS_FILE: &str = "assets/levels.toml";
