//! Echostep - windowed game entry point

use bevy::{camera::ScalingMode, input::common_conditions::input_just_pressed, prelude::*};
use echostep::{
    ARENA_HEIGHT, BACKGROUND_COLOR, BEAM_BLOCKED_COLOR, BEAM_COLOR, CurrentLevel,
    EchostepPlugin, EventLogConfig, EventLogger, GameplayTuning, HazardBeam, LEVELS_FILE,
    LevelDatabase, ghost, tuning,
};

fn main() {
    // Parse command-line arguments
    let args: Vec<String> = std::env::args().collect();

    // --level <id> picks the starting level
    let level_override = args
        .iter()
        .position(|a| a == "--level")
        .and_then(|i| args.get(i + 1).cloned());

    // --no-log disables the .evlog file
    let log_enabled = !args.iter().any(|a| a == "--no-log");

    let mut gameplay_tuning = GameplayTuning::default();
    if let Err(e) = tuning::apply_global_tuning(&mut gameplay_tuning) {
        warn!("{}", e);
    }

    let level_db = LevelDatabase::load_from_file(LEVELS_FILE);

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                resolution: bevy::window::WindowResolution::new(1280, 720)
                    .with_scale_factor_override(1.0),
                title: "Echostep".into(),
                resizable: false,
                ..default()
            }),
            ..default()
        }))
        .insert_resource(ClearColor(BACKGROUND_COLOR))
        .insert_resource(gameplay_tuning)
        .insert_resource(level_db)
        .insert_resource(CurrentLevel(level_override.unwrap_or_default()))
        .insert_resource(EventLogConfig {
            enabled: log_enabled,
            ..default()
        })
        .add_plugins(EchostepPlugin)
        .add_systems(Startup, (setup_camera, start_event_log))
        .add_systems(Update, (ghost::update_ghost_facing, draw_beams))
        // Reload gameplay tuning (F2)
        .add_systems(
            Update,
            tuning::load_global_tuning_system.run_if(input_just_pressed(KeyCode::F2)),
        )
        .run();
}

/// Orthographic camera that always shows the full arena height
fn setup_camera(mut commands: Commands) {
    commands.spawn((
        Camera2d,
        Projection::Orthographic(OrthographicProjection {
            scaling_mode: ScalingMode::FixedVertical {
                viewport_height: ARENA_HEIGHT,
            },
            ..OrthographicProjection::default_2d()
        }),
    ));
}

/// Open the session event log
fn start_event_log(
    mut commands: Commands,
    config: Res<EventLogConfig>,
    tuning: Res<GameplayTuning>,
) {
    if !config.enabled {
        info!("Event logging disabled");
        return;
    }
    let mut logger = EventLogger::new(config.clone());
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S").to_string();
    match logger.start_session(&timestamp, &tuning) {
        Ok(_) => {
            commands.insert_resource(logger);
        }
        Err(e) => warn!("{}", e),
    }
}

/// Draw each beam up to where it stopped
fn draw_beams(mut gizmos: Gizmos, beams: Query<(&Transform, &HazardBeam)>) {
    for (transform, beam) in &beams {
        if beam.is_degenerate() {
            continue;
        }
        let origin = transform.translation.truncate();
        let end = origin + beam.direction.normalize() * beam.visible_length;
        let color = if beam.visible_length < beam.max_distance {
            BEAM_BLOCKED_COLOR
        } else {
            BEAM_COLOR
        };
        gizmos.line_2d(origin, end, color);
    }
}
