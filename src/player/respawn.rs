//! Respawn - kill requests, manual reset and player spawning

use bevy::prelude::*;

use crate::body::{Body, BodyKind, PhysicsControl, Velocity};
use crate::constants::*;
use crate::events::{EventBus, GameEvent};
use crate::input::PlayerInput;
use crate::player::components::*;
use crate::rewind::{MotionHistory, RewindController, reset_for_respawn};
use crate::tuning::GameplayTuning;

/// Ask the respawn layer to kill an entity. Non-player targets are ignored.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct KillRequest {
    pub target: Entity,
}

/// Where the player comes back after dying or resetting
#[derive(Resource, Debug, Clone, Copy)]
pub struct SpawnPoint(pub Vec2);

impl Default for SpawnPoint {
    fn default() -> Self {
        Self(DEFAULT_SPAWN)
    }
}

/// Spawn the player with everything the rewind core needs
pub fn spawn_player(commands: &mut Commands, position: Vec2, tuning: &GameplayTuning) -> Entity {
    commands
        .spawn((
            Sprite::from_color(PLAYER_COLOR, PLAYER_SIZE),
            Transform::from_xyz(position.x, position.y, 1.0),
            Player,
            Body::new(BodyKind::Player, PLAYER_SIZE),
            Velocity::default(),
            PhysicsControl::default(),
            Grounded(false),
            CoyoteTimer::default(),
            JumpState::default(),
            Facing::default(),
            MotionHistory::with_capacity(tuning.history_capacity()),
            RewindController::default(),
        ))
        .id()
}

/// Runs in FixedUpdate after hazards: respawn killed players and handle manual reset
#[allow(clippy::type_complexity)]
pub fn handle_kill_requests(
    mut kills: MessageReader<KillRequest>,
    mut input: ResMut<PlayerInput>,
    spawn: Res<SpawnPoint>,
    mut players: Query<
        (
            Entity,
            &mut Transform,
            &mut Velocity,
            &mut PhysicsControl,
            &mut RewindController,
            &mut MotionHistory,
            &mut Grounded,
            &mut JumpState,
        ),
        With<Player>,
    >,
    mut bus: ResMut<EventBus>,
) {
    let targets: Vec<Entity> = kills.read().map(|k| k.target).collect();
    let reset = std::mem::take(&mut input.reset_pressed);
    if targets.is_empty() && !reset {
        return;
    }

    for (
        entity,
        mut transform,
        mut velocity,
        mut control,
        mut controller,
        mut history,
        mut grounded,
        mut jump_state,
    ) in &mut players
    {
        let killed = targets.contains(&entity);
        if !killed && !reset {
            continue;
        }

        if killed {
            info!("Player killed at {:?}", transform.translation.truncate());
            bus.emit(GameEvent::PlayerKilled);
        }

        transform.translation.x = spawn.0.x;
        transform.translation.y = spawn.0.y;
        velocity.0 = Vec2::ZERO;
        grounded.0 = false;
        jump_state.is_jumping = false;
        reset_for_respawn(&mut history, &mut controller, &mut control);

        bus.emit(GameEvent::Respawned);
    }
}
