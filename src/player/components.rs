//! Player-related components

use bevy::prelude::*;

/// Marker for the player entity
#[derive(Component)]
pub struct Player;

/// Whether the body is standing on something
#[derive(Component, Default)]
pub struct Grounded(pub bool);

/// Time remaining for coyote jump (seconds after leaving ground you can still jump)
#[derive(Component, Default)]
pub struct CoyoteTimer(pub f32);

/// Tracks if currently in a jump (for variable height)
#[derive(Component, Default)]
pub struct JumpState {
    pub is_jumping: bool,
}

/// Direction a body faces (-1.0 = left, 1.0 = right).
/// Shared by the player and the ghost.
#[derive(Component, Debug, Clone, Copy)]
pub struct Facing(pub f32);

impl Default for Facing {
    fn default() -> Self {
        Self(1.0)
    }
}
