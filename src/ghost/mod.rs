//! Ghost module - the autonomous body that replays undone motion
//!
//! A ghost is a full participant in the world: it stands on pressure plates
//! and blocks hazard beams exactly like the player would, but it ignores input
//! and is never killed. Only one ghost exists at a time.

mod playback;

pub use playback::*;

use bevy::prelude::*;

use crate::body::{Body, BodyKind, Velocity};
use crate::constants::*;
use crate::events::{EventBus, GameEvent};
use crate::player::Facing;
use crate::rewind::ReplaySegment;
use crate::tuning::GameplayTuning;

/// Request to create a ghost from a finished rewind
#[derive(Message, Debug, Clone)]
pub struct SpawnGhost(pub ReplaySegment);

/// Create ghosts for finished rewinds, retiring any ghost already in play
pub fn spawn_ghosts(
    mut commands: Commands,
    mut requests: MessageReader<SpawnGhost>,
    existing: Query<Entity, With<GhostPlayback>>,
    tuning: Res<GameplayTuning>,
    real: Res<Time<Real>>,
    mut bus: ResMut<EventBus>,
) {
    // Several requests in one step collapse to the newest
    let Some(SpawnGhost(segment)) = requests.read().last().cloned() else {
        return;
    };

    let samples = segment.len();
    let Some(playback) = GhostPlayback::play(segment, tuning.ghost_lifetime) else {
        return;
    };
    let playback = playback.born_at(real.elapsed_secs());

    for entity in &existing {
        commands.entity(entity).despawn();
        bus.emit(GameEvent::GhostExpired);
    }

    let start = playback.start_position();
    let facing = playback.facing();
    commands.spawn((
        Sprite::from_color(GHOST_COLOR, PLAYER_SIZE),
        Transform::from_xyz(start.x, start.y, 0.5),
        Body::new(BodyKind::Ghost, PLAYER_SIZE),
        Velocity::default(),
        Facing(facing),
        playback,
    ));

    info!("Ghost spawned replaying {} samples", samples);
    bus.emit(GameEvent::GhostSpawned { samples });
}

/// Runs in FixedUpdate: move each ghost to its current recorded sample
pub fn advance_ghosts(
    time: Res<Time>,
    tuning: Res<GameplayTuning>,
    mut ghosts: Query<(&mut GhostPlayback, &mut Transform, &mut Velocity, &mut Facing)>,
) {
    let dt = time.delta_secs();
    let frame = tuning.frame_duration();
    for (mut playback, mut transform, mut velocity, mut facing) in &mut ghosts {
        let sample = *playback.advance(dt, tuning.ghost_replay_speed, frame, GHOST_FACING_DEADZONE);
        transform.translation.x = sample.position.x;
        transform.translation.y = sample.position.y;
        velocity.0 = sample.velocity;
        facing.0 = playback.facing();
    }
}

/// Runs in FixedUpdate: despawn ghosts whose wall-clock lifetime ran out
pub fn expire_ghosts(
    mut commands: Commands,
    real: Res<Time<Real>>,
    mut ghosts: Query<(Entity, &mut GhostPlayback)>,
    mut bus: ResMut<EventBus>,
) {
    let now = real.elapsed_secs();
    for (entity, mut playback) in &mut ghosts {
        if playback.age_to(now) {
            debug!(
                "Ghost expired after {:.2}s at sample {}/{}",
                playback.age(),
                playback.cursor() + 1,
                playback.segment().len()
            );
            commands.entity(entity).despawn();
            bus.emit(GameEvent::GhostExpired);
        }
    }
}

/// Mirror the ghost sprite to match its facing
pub fn update_ghost_facing(mut ghosts: Query<(&Facing, &mut Sprite), With<GhostPlayback>>) {
    for (facing, mut sprite) in &mut ghosts {
        sprite.flip_x = facing.0 < 0.0;
    }
}
