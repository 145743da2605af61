//! Levels module - database, spawning, and level switching

mod database;
mod spawning;

pub use database::*;
pub use spawning::*;

use bevy::prelude::*;

use crate::constants::*;
use crate::events::{EventBus, GameEvent};
use crate::ghost::GhostPlayback;
use crate::input::PlayerInput;
use crate::player::{SpawnPoint, spawn_player};
use crate::tuning::GameplayTuning;
use crate::world::{LevelEntity, spawn_floor, spawn_walls};

/// Request to replace the current level
#[derive(Message, Debug, Clone, PartialEq, Eq)]
pub struct LoadLevel(pub String);

/// Pick the level to start in: the requested one if it exists, else the first
fn resolve_level<'a>(db: &'a LevelDatabase, requested: &str) -> Option<&'a LevelData> {
    if !requested.is_empty() {
        match db.get(requested) {
            Some(level) => return Some(level),
            None => warn!("Unknown level '{}', starting at the first level", requested),
        }
    }
    db.first()
}

/// Startup: arena, first level and the player
pub fn setup_world(
    mut commands: Commands,
    tuning: Res<GameplayTuning>,
    db: Res<LevelDatabase>,
    mut current: ResMut<CurrentLevel>,
    mut spawn: ResMut<SpawnPoint>,
    mut bus: ResMut<EventBus>,
) {
    spawn_floor(&mut commands, PLATFORM_COLOR);
    spawn_walls(&mut commands, PLATFORM_COLOR);

    if let Some(level) = resolve_level(&db, &current.0) {
        spawn_level(&mut commands, level);
        current.0 = level.id.clone();
        spawn.0 = level.spawn_point();
        bus.emit(GameEvent::LevelStart {
            level_id: level.id.clone(),
        });
    } else {
        warn!("Level database is empty, spawning an empty arena");
    }

    spawn_player(&mut commands, spawn.0, &tuning);
}

/// Cycle levels with ] and [
pub fn cycle_levels(
    keyboard: Res<ButtonInput<KeyCode>>,
    db: Res<LevelDatabase>,
    current: Res<CurrentLevel>,
    mut requests: MessageWriter<LoadLevel>,
) {
    let step = if keyboard.just_pressed(KeyCode::BracketRight) {
        1
    } else if keyboard.just_pressed(KeyCode::BracketLeft) {
        -1
    } else {
        return;
    };
    if let Some(id) = db.cycle(&current.0, step) {
        requests.write(LoadLevel(id.to_string()));
    }
}

/// Swap level geometry, retire the ghost and send the player back to spawn
#[allow(clippy::too_many_arguments)]
pub fn load_requested_level(
    mut commands: Commands,
    mut requests: MessageReader<LoadLevel>,
    db: Res<LevelDatabase>,
    mut current: ResMut<CurrentLevel>,
    mut spawn: ResMut<SpawnPoint>,
    mut input: ResMut<PlayerInput>,
    level_entities: Query<Entity, With<LevelEntity>>,
    ghosts: Query<Entity, With<GhostPlayback>>,
    mut bus: ResMut<EventBus>,
) {
    let Some(LoadLevel(id)) = requests.read().last().cloned() else {
        return;
    };
    let Some(level) = db.get(&id) else {
        warn!("Cannot load unknown level '{}'", id);
        return;
    };

    for entity in level_entities.iter().chain(ghosts.iter()) {
        commands.entity(entity).despawn();
    }
    if !ghosts.is_empty() {
        bus.emit(GameEvent::GhostExpired);
    }

    spawn_level(&mut commands, level);
    current.0 = level.id.clone();
    spawn.0 = level.spawn_point();
    // Respawn clears history so no rewind reaches into the old level
    input.reset_pressed = true;

    info!("Loaded level '{}'", level.id);
    bus.emit(GameEvent::LevelStart {
        level_id: level.id.clone(),
    });
}
