//! Level spawning - turns a `LevelData` into entities

use bevy::prelude::*;
use std::collections::HashMap;

use crate::body::Collider;
use crate::constants::*;
use crate::levels::database::LevelData;
use crate::puzzle::{Door, HazardBeam, PressurePlate, TriggerVolume};
use crate::world::{LevelEntity, Platform};

/// Id of the level currently in play
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq)]
pub struct CurrentLevel(pub String);

/// Spawn every platform, plate, door and beam of `level`.
///
/// Plates are spawned first so doors can resolve plate ids to entities. A door
/// naming an unknown plate is still spawned; the missing plate is skipped.
pub fn spawn_level(commands: &mut Commands, level: &LevelData) {
    for platform in &level.platforms {
        let size = Vec2::new(platform.width, platform.height);
        commands.spawn((
            Sprite::from_color(PLATFORM_COLOR, size),
            Transform::from_xyz(platform.x, platform.y, 0.0),
            Platform,
            Collider::new(size),
            LevelEntity,
        ));
    }

    let mut plates: HashMap<&str, Entity> = HashMap::new();
    for plate in &level.plates {
        let size = Vec2::new(plate.width, PLATE_HEIGHT);
        let entity = commands
            .spawn((
                Sprite::from_color(PLATE_IDLE_COLOR, size),
                Transform::from_xyz(plate.x, plate.y + PLATE_HEIGHT / 2.0, 0.2),
                TriggerVolume::new(size),
                PressurePlate::new(plate.id.clone(), plate.authorized.clone()),
                LevelEntity,
            ))
            .id();
        if plates.insert(plate.id.as_str(), entity).is_some() {
            warn!("Level '{}' defines plate '{}' twice", level.id, plate.id);
        }
    }

    for door in &level.doors {
        let plate_entities: Vec<Entity> = door
            .plates
            .iter()
            .filter_map(|id| {
                let found = plates.get(id.as_str()).copied();
                if found.is_none() {
                    warn!(
                        "Door '{}' in level '{}' references unknown plate '{}'",
                        door.id, level.id, id
                    );
                }
                found
            })
            .collect();

        let size = Vec2::new(door.width, door.height);
        commands.spawn((
            Sprite::from_color(DOOR_COLOR, size),
            Transform::from_xyz(door.x, door.y, 0.1),
            Collider::new(size),
            Door::new(door.id.clone(), plate_entities, door.mode, door.open_duration),
            LevelEntity,
        ));
    }

    for beam in &level.beams {
        commands.spawn((
            Sprite::from_color(BEAM_COLOR, Vec2::splat(16.0)),
            Transform::from_xyz(beam.x, beam.y, 0.3),
            HazardBeam::new(Vec2::from_array(beam.direction), beam.max_distance)
                .with_masks(beam.blocking.clone(), beam.damage.clone()),
            LevelEntity,
        ));
    }

    info!(
        "Spawned level '{}': {} platforms, {} plates, {} doors, {} beams",
        level.id,
        level.platforms.len(),
        level.plates.len(),
        level.doors.len(),
        level.beams.len()
    );
}
