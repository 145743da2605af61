//! World components for the arena and level geometry

use bevy::prelude::*;

use crate::body::Collider;
use crate::constants::*;

/// Platform component - solid surface
#[derive(Component)]
pub struct Platform;

/// Marks entities that belong to the current level (despawned on level change)
#[derive(Component)]
pub struct LevelEntity;

// ============================================================================
// Arena spawning functions (shared between the game and headless apps)
// ============================================================================

/// Spawn the arena floor
pub fn spawn_floor(commands: &mut Commands, color: Color) {
    let size = Vec2::new(ARENA_WIDTH - WALL_THICKNESS * 2.0, FLOOR_THICKNESS);
    commands.spawn((
        Sprite::from_color(color, size),
        Transform::from_xyz(0.0, ARENA_FLOOR_Y, 0.0),
        Platform,
        Collider::new(size),
    ));
}

/// Spawn arena walls (left and right)
pub fn spawn_walls(commands: &mut Commands, color: Color) {
    let size = Vec2::new(WALL_THICKNESS, 5000.0);
    for x in [
        -ARENA_WIDTH / 2.0 + WALL_THICKNESS / 2.0,
        ARENA_WIDTH / 2.0 - WALL_THICKNESS / 2.0,
    ] {
        commands.spawn((
            Sprite::from_color(color, size),
            Transform::from_xyz(x, 2000.0, 0.0),
            Platform,
            Collider::new(size),
        ));
    }
}

/// Top surface of the arena floor
pub fn floor_top() -> f32 {
    ARENA_FLOOR_Y + FLOOR_THICKNESS / 2.0
}
