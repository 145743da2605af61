//! Global gameplay tuning settings
//!
//! Every field has a serde default, so a partial `gameplay_tuning.json` only
//! overrides the values it names.

use bevy::log::warn;
use bevy::prelude::{ResMut, Resource};
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::rewind::RewindSettings;

fn default_fixed_hz() -> f64 {
    FIXED_HZ
}
fn default_recording_duration() -> f32 {
    RECORDING_DURATION
}
fn default_min_rewind_samples() -> usize {
    MIN_REWIND_SAMPLES
}
fn default_rewind_cooldown() -> f32 {
    REWIND_COOLDOWN
}
fn default_max_rewind_reach() -> f32 {
    MAX_REWIND_REACH
}
fn default_rewind_smooth_time() -> f32 {
    REWIND_SMOOTH_TIME
}
fn default_ghost_replay_speed() -> f32 {
    GHOST_REPLAY_SPEED
}
fn default_ghost_lifetime() -> f32 {
    GHOST_LIFETIME
}
fn default_move_speed() -> f32 {
    MOVE_SPEED
}
fn default_ground_accel() -> f32 {
    GROUND_ACCEL
}
fn default_ground_decel() -> f32 {
    GROUND_DECEL
}
fn default_air_accel() -> f32 {
    AIR_ACCEL
}
fn default_air_decel() -> f32 {
    AIR_DECEL
}
fn default_gravity_rise() -> f32 {
    GRAVITY_RISE
}
fn default_gravity_fall() -> f32 {
    GRAVITY_FALL
}
fn default_jump_velocity() -> f32 {
    JUMP_VELOCITY
}

/// Path to global gameplay tuning config
pub const GAMEPLAY_TUNING_FILE: &str = "config/gameplay_tuning.json";

/// Runtime gameplay values, loaded from config at startup
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameplayTuning {
    /// Simulation (and recording) steps per second
    #[serde(default = "default_fixed_hz")]
    pub fixed_hz: f64,
    /// Seconds of motion kept in the player's history
    #[serde(default = "default_recording_duration")]
    pub recording_duration: f32,
    #[serde(default = "default_min_rewind_samples")]
    pub min_rewind_samples: usize,
    #[serde(default = "default_rewind_cooldown")]
    pub rewind_cooldown: f32,
    /// Furthest one gesture may reach back, in seconds (0 = unbounded)
    #[serde(default = "default_max_rewind_reach")]
    pub max_rewind_reach: f32,
    #[serde(default = "default_rewind_smooth_time")]
    pub rewind_smooth_time: f32,
    #[serde(default = "default_ghost_replay_speed")]
    pub ghost_replay_speed: f32,
    #[serde(default = "default_ghost_lifetime")]
    pub ghost_lifetime: f32,
    // Movement feel
    #[serde(default = "default_move_speed")]
    pub move_speed: f32,
    #[serde(default = "default_ground_accel")]
    pub ground_accel: f32,
    #[serde(default = "default_ground_decel")]
    pub ground_decel: f32,
    #[serde(default = "default_air_accel")]
    pub air_accel: f32,
    #[serde(default = "default_air_decel")]
    pub air_decel: f32,
    #[serde(default = "default_gravity_rise")]
    pub gravity_rise: f32,
    #[serde(default = "default_gravity_fall")]
    pub gravity_fall: f32,
    #[serde(default = "default_jump_velocity")]
    pub jump_velocity: f32,
}

impl Default for GameplayTuning {
    fn default() -> Self {
        Self {
            fixed_hz: default_fixed_hz(),
            recording_duration: default_recording_duration(),
            min_rewind_samples: default_min_rewind_samples(),
            rewind_cooldown: default_rewind_cooldown(),
            max_rewind_reach: default_max_rewind_reach(),
            rewind_smooth_time: default_rewind_smooth_time(),
            ghost_replay_speed: default_ghost_replay_speed(),
            ghost_lifetime: default_ghost_lifetime(),
            move_speed: default_move_speed(),
            ground_accel: default_ground_accel(),
            ground_decel: default_ground_decel(),
            air_accel: default_air_accel(),
            air_decel: default_air_decel(),
            gravity_rise: default_gravity_rise(),
            gravity_fall: default_gravity_fall(),
            jump_velocity: default_jump_velocity(),
        }
    }
}

impl GameplayTuning {
    /// Duration of one recorded frame in seconds
    pub fn frame_duration(&self) -> f32 {
        (1.0 / self.fixed_hz.max(1.0)) as f32
    }

    /// Number of samples the motion history holds
    pub fn history_capacity(&self) -> usize {
        crate::rewind::MotionHistory::capacity_for(
            self.fixed_hz.max(1.0) as f32,
            self.recording_duration,
        )
    }

    /// Rewind controller settings derived from this tuning
    pub fn rewind_settings(&self) -> RewindSettings {
        RewindSettings {
            min_samples: self.min_rewind_samples,
            cooldown: self.rewind_cooldown.max(0.0),
            max_reach: (self.max_rewind_reach > 0.0).then_some(self.max_rewind_reach),
        }
    }
}

pub fn load_gameplay_tuning_from_file(path: &str) -> Result<GameplayTuning, String> {
    let contents =
        std::fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", path, e))?;
    parse_gameplay_tuning(&contents).map_err(|e| format!("Failed to parse {}: {}", path, e))
}

pub fn parse_gameplay_tuning(contents: &str) -> Result<GameplayTuning, String> {
    serde_json::from_str(contents).map_err(|e| e.to_string())
}

/// Load the tuning file into `tuning`, falling back to defaults on error
pub fn apply_global_tuning(tuning: &mut GameplayTuning) -> Result<(), String> {
    match load_gameplay_tuning_from_file(GAMEPLAY_TUNING_FILE) {
        Ok(loaded) => {
            *tuning = loaded;
            Ok(())
        }
        Err(err) => {
            *tuning = GameplayTuning::default();
            Err(err)
        }
    }
}

pub fn load_global_tuning_system(mut tuning: ResMut<GameplayTuning>) {
    if let Err(err) = apply_global_tuning(&mut tuning) {
        warn!("{}, using defaults", err);
    }
}
