//! Whole-game scenarios driven through the headless app

use bevy::prelude::*;
use echostep::{
    Body, BodyKind, COLLISION_EPSILON, Door, EventBus, GameEvent, GhostPlayback,
    HeadlessAppBuilder, KillRequest, LevelDatabase, MotionHistory, PLAYER_SIZE, PhysicsControl,
    Player, PlayerInput, PressurePlate, RecordedSample, ReplaySegment, RewindCommand,
    RewindController, SpawnGhost,
};

/// Center height of a body standing on the arena floor
fn standing_y() -> f32 {
    echostep::world::floor_top() + PLAYER_SIZE.y / 2.0 - COLLISION_EPSILON
}

fn app_for(level_toml: &str) -> App {
    let db = LevelDatabase::parse(level_toml).unwrap();
    let mut app = HeadlessAppBuilder::new().with_level_db(db).build();
    // Startup, then one settled step
    app.update();
    app.update();
    app
}

fn player(app: &mut App) -> Entity {
    app.world_mut()
        .query_filtered::<Entity, With<Player>>()
        .single(app.world())
        .unwrap()
}

fn player_x(app: &mut App) -> f32 {
    let p = player(app);
    app.world().get::<Transform>(p).unwrap().translation.x
}

fn door_open(app: &mut App) -> bool {
    app.world_mut()
        .query::<&Door>()
        .single(app.world())
        .unwrap()
        .is_open()
}

fn ghost_count(app: &mut App) -> usize {
    app.world_mut()
        .query::<&GhostPlayback>()
        .iter(app.world())
        .count()
}

fn seen(app: &App, wanted: impl Fn(&GameEvent) -> bool) -> bool {
    app.world()
        .resource::<EventBus>()
        .processed()
        .iter()
        .any(|e| wanted(&e.event))
}

fn run_until(app: &mut App, max_frames: usize, mut done: impl FnMut(&mut App) -> bool) -> bool {
    for _ in 0..max_frames {
        if done(app) {
            return true;
        }
        app.update();
    }
    done(app)
}

const PLATE_LEVEL: &str = r#"
[[level]]
id = "plate"
spawn = [-200.0, -406.5]

[[level.plate]]
id = "p"
x = 0.0
y = -430.0
width = 120.0

[[level.door]]
id = "d"
x = 400.0
y = -330.0
height = 200.0
plates = ["p"]
"#;

const BEAM_LEVEL: &str = r#"
[[level]]
id = "beam"
spawn = [-400.0, -406.5]

[[level.beam]]
x = 400.0
y = -406.5
direction = [-1.0, 0.0]
max_distance = 300.0
"#;

#[test]
fn test_ghost_holds_plate_open() {
    let mut app = app_for(PLATE_LEVEL);
    assert!(!door_open(&mut app));

    // Walk right onto the plate
    app.world_mut().resource_mut::<PlayerInput>().move_x = 1.0;
    assert!(run_until(&mut app, 200, |app| player_x(app) >= -10.0));
    app.world_mut().resource_mut::<PlayerInput>().move_x = 0.0;
    for _ in 0..30 {
        app.update();
    }
    assert!(door_open(&mut app), "player on the plate should open the door");

    // Rewind back off the plate
    app.world_mut().write_message(RewindCommand::Start);
    app.update();
    let p = player(&mut app);
    assert!(app.world().get::<RewindController>(p).unwrap().is_rewinding());
    assert!(run_until(&mut app, 150, |app| player_x(app) < -150.0));

    app.world_mut().write_message(RewindCommand::Stop);
    app.update();
    assert!(!app.world().get::<RewindController>(p).unwrap().is_rewinding());
    assert!(app.world().get::<PhysicsControl>(p).unwrap().simulated);
    assert_eq!(ghost_count(&mut app), 1);

    // The ghost walks the undone path onto the plate and stays there
    for _ in 0..120 {
        app.update();
    }
    assert!(player_x(&mut app) < -74.0, "player should be off the plate");
    assert!(door_open(&mut app), "ghost on the plate should hold the door open");

    let plate = app
        .world_mut()
        .query::<&PressurePlate>()
        .single(app.world())
        .unwrap();
    assert_eq!(plate.occupancy(), 1);

    assert!(seen(&app, |e| matches!(e, GameEvent::RewindStarted)));
    assert!(seen(&app, |e| matches!(e, GameEvent::RewindStopped { undone } if *undone > 0)));
    assert!(seen(&app, |e| matches!(e, GameEvent::GhostSpawned { .. })));
    assert!(seen(&app, |e| matches!(e, GameEvent::DoorClosed { .. })));
}

#[test]
fn test_ghost_shields_player_from_beam() {
    let mut app = app_for(BEAM_LEVEL);

    let ghost_at = Vec2::new(300.0, standing_y());
    app.world_mut()
        .write_message(SpawnGhost(ReplaySegment::from_chronological(vec![
            RecordedSample::new(ghost_at, Vec2::ZERO, 0.0),
        ])));
    app.update();
    assert_eq!(ghost_count(&mut app), 1);

    // Stand behind the ghost, inside beam range
    let p = player(&mut app);
    app.world_mut().get_mut::<Transform>(p).unwrap().translation.x = 150.0;
    for _ in 0..10 {
        app.update();
    }
    assert!(!seen(&app, |e| matches!(e, GameEvent::PlayerKilled)));
    assert!((player_x(&mut app) - 150.0).abs() < 1.0);

    // Remove the shield
    let ghosts: Vec<Entity> = app
        .world_mut()
        .query_filtered::<Entity, With<GhostPlayback>>()
        .iter(app.world())
        .collect();
    for g in ghosts {
        app.world_mut().despawn(g);
    }
    app.update();
    app.update();

    assert!(seen(&app, |e| matches!(e, GameEvent::PlayerKilled)));
    assert!(seen(&app, |e| matches!(e, GameEvent::Respawned)));
    assert!((player_x(&mut app) - -400.0).abs() < 1.0);
}

#[test]
fn test_beam_never_kills_the_ghost() {
    let mut app = app_for(BEAM_LEVEL);
    app.world_mut()
        .write_message(SpawnGhost(ReplaySegment::from_chronological(vec![
            RecordedSample::new(Vec2::new(300.0, standing_y()), Vec2::ZERO, 0.0),
        ])));
    for _ in 0..20 {
        app.update();
    }
    let ghosts: Vec<BodyKind> = app
        .world_mut()
        .query_filtered::<&Body, With<GhostPlayback>>()
        .iter(app.world())
        .map(|b| b.kind)
        .collect();
    assert_eq!(ghosts, vec![BodyKind::Ghost]);
    assert!(!seen(&app, |e| matches!(e, GameEvent::PlayerKilled)));
}

#[test]
fn test_rewind_refused_with_short_history() {
    let mut app = app_for(PLATE_LEVEL);
    app.world_mut().write_message(RewindCommand::Start);
    app.update();

    let p = player(&mut app);
    assert!(!app.world().get::<RewindController>(p).unwrap().is_rewinding());
    assert!(seen(&app, |e| matches!(e, GameEvent::RewindRejected { .. })));
}

#[test]
fn test_death_cancels_rewind_and_clears_history() {
    let mut app = app_for(PLATE_LEVEL);
    for _ in 0..40 {
        app.update();
    }

    app.world_mut().write_message(RewindCommand::Start);
    app.update();
    let p = player(&mut app);
    assert!(app.world().get::<RewindController>(p).unwrap().is_rewinding());

    app.world_mut().write_message(KillRequest { target: p });
    app.update();

    assert!(!app.world().get::<RewindController>(p).unwrap().is_rewinding());
    assert!(app.world().get::<PhysicsControl>(p).unwrap().simulated);
    // Cleared on death; at most the step after respawn has been recorded since
    assert!(app.world().get::<MotionHistory>(p).unwrap().count() <= 1);
    assert_eq!(ghost_count(&mut app), 0);
}
