//! App wiring - the gameplay plugin and a headless builder for tests
//!
//! Fixed step order:
//! record -> rewind commands -> rewind step -> player physics -> ghosts ->
//! trigger overlaps -> plates -> doors -> beams -> kills.

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use std::time::Duration;

use crate::events::{EventBus, flush_event_bus, update_event_bus_time};
use crate::ghost::{SpawnGhost, advance_ghosts, expire_ghosts, spawn_ghosts};
use crate::input::{PlayerInput, capture_input};
use crate::levels::{
    CurrentLevel, LevelDatabase, LoadLevel, cycle_levels, load_requested_level, setup_world,
};
use crate::player::{
    KillRequest, SpawnPoint, apply_gravity, apply_input, apply_velocity, check_collisions,
    handle_kill_requests,
};
use crate::puzzle::{
    TriggerEvent, detect_trigger_overlaps, evaluate_doors, fire_hazard_beams,
    update_plate_occupancy,
};
use crate::rewind::{
    RewindCommand, apply_rewind_commands, record_motion, smooth_rewind_visual, step_rewind,
    sync_history_capacity,
};
use crate::tuning::GameplayTuning;

/// Registers every message, resource and system of the game.
///
/// Resources already inserted before the plugin (tuning, levels, event bus)
/// are kept; missing ones get defaults.
pub struct EchostepPlugin;

impl Plugin for EchostepPlugin {
    fn build(&self, app: &mut App) {
        if !app.world().contains_resource::<LevelDatabase>() {
            app.insert_resource(LevelDatabase::default_levels());
        }
        if !app.world().contains_resource::<EventBus>() {
            app.insert_resource(EventBus::new());
        }
        app.init_resource::<GameplayTuning>()
            .init_resource::<PlayerInput>()
            .init_resource::<CurrentLevel>()
            .init_resource::<SpawnPoint>();

        let fixed_hz = app.world().resource::<GameplayTuning>().fixed_hz.max(1.0);
        app.insert_resource(Time::<Fixed>::from_hz(fixed_hz));

        app.add_message::<RewindCommand>()
            .add_message::<SpawnGhost>()
            .add_message::<TriggerEvent>()
            .add_message::<KillRequest>()
            .add_message::<LoadLevel>();

        app.add_systems(Startup, setup_world)
            .add_systems(First, update_event_bus_time)
            .add_systems(
                Update,
                (
                    capture_input.run_if(resource_exists::<ButtonInput<KeyCode>>),
                    smooth_rewind_visual,
                )
                    .chain(),
            )
            .add_systems(
                Update,
                (
                    cycle_levels.run_if(resource_exists::<ButtonInput<KeyCode>>),
                    load_requested_level,
                    sync_history_capacity,
                )
                    .chain(),
            )
            .add_systems(
                FixedUpdate,
                (
                    record_motion,
                    apply_rewind_commands,
                    step_rewind,
                    apply_input,
                    apply_gravity,
                    apply_velocity,
                    check_collisions,
                    advance_ghosts,
                    expire_ghosts,
                    spawn_ghosts,
                    detect_trigger_overlaps,
                    update_plate_occupancy,
                    evaluate_doors,
                    fire_hazard_beams,
                    handle_kill_requests,
                )
                    .chain(),
            )
            .add_systems(Last, flush_event_bus);
    }
}

/// Builder for headless apps driven frame by frame
///
/// Each `app.update()` advances time by exactly one fixed step unless a
/// different frame rate is requested.
pub struct HeadlessAppBuilder {
    level_id: Option<String>,
    level_db: Option<LevelDatabase>,
    tuning: GameplayTuning,
    fps: Option<f64>,
}

impl Default for HeadlessAppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessAppBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self {
            level_id: None,
            level_db: None,
            tuning: GameplayTuning::default(),
            fps: None,
        }
    }

    /// Set the starting level ID
    pub fn with_level(mut self, level_id: &str) -> Self {
        self.level_id = Some(level_id.to_string());
        self
    }

    /// Set the level database
    pub fn with_level_db(mut self, level_db: LevelDatabase) -> Self {
        self.level_db = Some(level_db);
        self
    }

    pub fn with_tuning(mut self, tuning: GameplayTuning) -> Self {
        self.tuning = tuning;
        self
    }

    /// Frames per second of simulated time (default: the fixed rate)
    pub fn with_fps(mut self, fps: f64) -> Self {
        self.fps = Some(fps);
        self
    }

    /// Build the app with minimal plugins and the gameplay plugin
    pub fn build(self) -> App {
        let fps = self.fps.unwrap_or(self.tuning.fixed_hz).max(1.0);

        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
            1.0 / fps,
        )));

        app.insert_resource(self.tuning);
        app.insert_resource(CurrentLevel(self.level_id.unwrap_or_default()));
        app.insert_resource(self.level_db.unwrap_or_else(LevelDatabase::default_levels));
        app.insert_resource(EventBus::new());

        app.add_plugins(EchostepPlugin);
        app
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::Player;
    use crate::puzzle::{Door, PressurePlate};

    #[test]
    fn test_headless_app_spawns_level_and_player() {
        let mut app = HeadlessAppBuilder::new().build();
        app.update();

        let players = app
            .world_mut()
            .query_filtered::<(), With<Player>>()
            .iter(app.world())
            .count();
        assert_eq!(players, 1);

        let doors = app.world_mut().query::<&Door>().iter(app.world()).count();
        let plates = app
            .world_mut()
            .query::<&PressurePlate>()
            .iter(app.world())
            .count();
        assert_eq!((doors, plates), (1, 1));
        assert_eq!(app.world().resource::<CurrentLevel>().0, "echo");
    }

    #[test]
    fn test_unknown_start_level_falls_back_to_first() {
        let mut app = HeadlessAppBuilder::new().with_level("nope").build();
        app.update();
        assert_eq!(app.world().resource::<CurrentLevel>().0, "echo");
    }

    #[test]
    fn test_level_start_is_announced() {
        let mut app = HeadlessAppBuilder::new().build();
        app.update();
        let bus = app.world().resource::<EventBus>();
        assert!(bus.processed().iter().any(|e| matches!(
            &e.event,
            crate::events::GameEvent::LevelStart { level_id } if level_id == "echo"
        )));
    }

    #[test]
    fn test_reloaded_fixed_rate_reaches_timestep_and_history() {
        use crate::rewind::MotionHistory;

        let mut app = HeadlessAppBuilder::new().build();
        app.update();

        app.world_mut().resource_mut::<GameplayTuning>().fixed_hz = 25.0;
        app.update();

        let tuning = app.world().resource::<GameplayTuning>().clone();
        let step = app.world().resource::<Time<Fixed>>().timestep().as_secs_f32();
        assert!((step - tuning.frame_duration()).abs() < 1e-6);
        assert!((step - 0.04).abs() < 1e-6);

        let capacity = app
            .world_mut()
            .query_filtered::<&MotionHistory, With<Player>>()
            .single(app.world())
            .unwrap()
            .capacity();
        assert_eq!(capacity, tuning.history_capacity());
        let window = capacity as f32 * step;
        assert!((window - tuning.recording_duration).abs() <= step);
    }
}
