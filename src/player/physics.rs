//! Player physics systems
//!
//! Every system here leaves a body alone while its `PhysicsControl` says it
//! is not simulated; the rewind controller drives it instead.

use bevy::prelude::*;

use crate::body::{Body, Collider, PhysicsControl, Velocity};
use crate::constants::*;
use crate::events::{EventBus, GameEvent};
use crate::helpers::move_toward;
use crate::input::PlayerInput;
use crate::player::components::*;
use crate::tuning::GameplayTuning;

/// Runs in FixedUpdate to apply captured input to physics
pub fn apply_input(
    tuning: Res<GameplayTuning>,
    mut input: ResMut<PlayerInput>,
    mut players: Query<
        (
            &mut Velocity,
            &mut CoyoteTimer,
            &mut JumpState,
            &mut Facing,
            &Grounded,
            &PhysicsControl,
        ),
        With<Player>,
    >,
    time: Res<Time>,
    mut bus: ResMut<EventBus>,
) {
    let dt = time.delta_secs();
    for (mut velocity, mut coyote, mut jump_state, mut facing, grounded, control) in &mut players {
        if !control.simulated {
            continue;
        }

        let move_x = input.move_x;

        // Acceleration-based horizontal movement
        let target_speed = move_x * tuning.move_speed;
        let current_speed = velocity.0.x;

        let has_input = move_x.abs() > STICK_DEADZONE;
        let same_direction =
            target_speed.signum() == current_speed.signum() || current_speed.abs() < 1.0;
        let is_accelerating = has_input && same_direction;

        let rate = match (grounded.0, is_accelerating) {
            (true, true) => tuning.ground_accel,
            (true, false) => tuning.ground_decel,
            (false, true) => tuning.air_accel,
            (false, false) => tuning.air_decel,
        };

        velocity.0.x = move_toward(current_speed, target_speed, rate * dt);

        // Facing follows input, not velocity, so turning feels responsive
        if move_x > STICK_DEADZONE {
            facing.0 = 1.0;
        } else if move_x < -STICK_DEADZONE {
            facing.0 = -1.0;
        }

        if grounded.0 {
            coyote.0 = COYOTE_TIME;
            jump_state.is_jumping = false;
        } else {
            coyote.0 = (coyote.0 - dt).max(0.0);
        }

        let can_jump = grounded.0 || coyote.0 > 0.0;

        if input.jump_buffer_timer > 0.0 && can_jump {
            velocity.0.y = tuning.jump_velocity;
            input.jump_buffer_timer = 0.0;
            coyote.0 = 0.0; // No double jump off coyote time
            jump_state.is_jumping = true;
            bus.emit(GameEvent::Jump);
        }

        // Variable jump height: cut once if released while rising
        if jump_state.is_jumping && velocity.0.y > 0.0 && !input.jump_held {
            velocity.0.y *= JUMP_CUT_MULTIPLIER;
            jump_state.is_jumping = false;
        }
    }
}

/// Apply gravity to airborne players
pub fn apply_gravity(
    tuning: Res<GameplayTuning>,
    mut query: Query<(&mut Velocity, &Grounded, &PhysicsControl), With<Player>>,
    time: Res<Time>,
) {
    for (mut velocity, grounded, control) in &mut query {
        if !control.simulated || grounded.0 {
            continue;
        }
        // Fast fall: higher gravity when falling than rising
        let gravity = if velocity.0.y > 0.0 {
            tuning.gravity_rise
        } else {
            tuning.gravity_fall
        };
        velocity.0.y = (velocity.0.y - gravity * time.delta_secs()).max(-MAX_FALL_SPEED);
    }
}

/// Integrate velocity into position
pub fn apply_velocity(
    mut query: Query<(&mut Transform, &Velocity, &PhysicsControl), With<Player>>,
    time: Res<Time>,
) {
    let dt = time.delta_secs();
    for (mut transform, velocity, control) in &mut query {
        if !control.simulated {
            continue;
        }
        transform.translation.x += velocity.0.x * dt;
        transform.translation.y += velocity.0.y * dt;
    }
}

/// Resolve player overlap with solid colliders and update ground contact
pub fn check_collisions(
    mut players: Query<
        (
            &mut Transform,
            &mut Velocity,
            &mut Grounded,
            &Body,
            &PhysicsControl,
        ),
        With<Player>,
    >,
    colliders: Query<(&Transform, &Collider), Without<Player>>,
    mut bus: ResMut<EventBus>,
) {
    for (mut player_transform, mut player_velocity, mut grounded, body, control) in &mut players {
        if !control.simulated {
            continue;
        }
        let player_half = body.half_size;
        let was_grounded = grounded.0;

        // Not grounded until we find a floor beneath us
        grounded.0 = false;

        for (collider_transform, collider) in &colliders {
            if !collider.enabled {
                continue;
            }
            let collider_half = collider.half_size;

            let player_pos = player_transform.translation.truncate();
            let collider_pos = collider_transform.translation.truncate();

            let diff = player_pos - collider_pos;
            let overlap_x = player_half.x + collider_half.x - diff.x.abs();
            let overlap_y = player_half.y + collider_half.y - diff.y.abs();

            if overlap_x <= 0.0 || overlap_y <= 0.0 {
                continue;
            }

            // Resolve along the smallest overlap axis
            if overlap_y < overlap_x {
                if diff.y > 0.0 {
                    // Land; stay EPSILON inside so the next step still detects contact
                    player_transform.translation.y =
                        collider_pos.y + collider_half.y + player_half.y - COLLISION_EPSILON;
                    if player_velocity.0.y <= 0.0 {
                        player_velocity.0.y = 0.0;
                        grounded.0 = true;
                    }
                } else {
                    // Ceiling
                    player_transform.translation.y =
                        collider_pos.y - collider_half.y - player_half.y + COLLISION_EPSILON;
                    if player_velocity.0.y > 0.0 {
                        player_velocity.0.y = 0.0;
                    }
                }
            } else {
                // Wall: push out, keep sliding
                if diff.x > 0.0 {
                    player_transform.translation.x =
                        collider_pos.x + collider_half.x + player_half.x - COLLISION_EPSILON;
                } else {
                    player_transform.translation.x =
                        collider_pos.x - collider_half.x - player_half.x + COLLISION_EPSILON;
                }
            }
        }

        if grounded.0 && !was_grounded {
            bus.emit(GameEvent::Land);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::BodyKind;
    use std::time::Duration;

    fn physics_app() -> App {
        let mut app = App::new();
        app.init_resource::<GameplayTuning>()
            .init_resource::<PlayerInput>()
            .init_resource::<Time>()
            .insert_resource(EventBus::new());
        app
    }

    fn spawn_test_player(app: &mut App, pos: Vec2, simulated: bool) -> Entity {
        app.world_mut()
            .spawn((
                Player,
                Transform::from_xyz(pos.x, pos.y, 0.0),
                Velocity::default(),
                Grounded(false),
                CoyoteTimer::default(),
                JumpState::default(),
                Facing::default(),
                Body::new(BodyKind::Player, PLAYER_SIZE),
                PhysicsControl {
                    simulated,
                    ..default()
                },
            ))
            .id()
    }

    #[test]
    fn test_lands_on_collider() {
        let mut app = physics_app();
        app.add_systems(Update, check_collisions);
        app.world_mut()
            .spawn((Transform::default(), Collider::new(Vec2::new(200.0, 20.0))));
        // Feet sunk 4 units into the top of the floor
        let player = spawn_test_player(&mut app, Vec2::new(0.0, 10.0 + 24.0 - 4.0), true);
        app.world_mut().get_mut::<Velocity>(player).unwrap().0.y = -50.0;

        app.update();

        let grounded = app.world().get::<Grounded>(player).unwrap();
        assert!(grounded.0);
        let y = app.world().get::<Transform>(player).unwrap().translation.y;
        assert!((y - (10.0 + 24.0 - COLLISION_EPSILON)).abs() < 1e-4);
        assert_eq!(app.world().resource::<EventBus>().pending_count(), 1);
    }

    #[test]
    fn test_disabled_collider_is_ignored() {
        let mut app = physics_app();
        app.add_systems(Update, check_collisions);
        let mut collider = Collider::new(Vec2::new(200.0, 20.0));
        collider.enabled = false;
        app.world_mut().spawn((Transform::default(), collider));
        let player = spawn_test_player(&mut app, Vec2::new(0.0, 30.0), true);

        app.update();

        assert!(!app.world().get::<Grounded>(player).unwrap().0);
    }

    /// Advance time by one 20ms step and run the systems
    fn step(app: &mut App) {
        app.world_mut()
            .resource_mut::<Time>()
            .advance_by(Duration::from_millis(20));
        app.update();
    }

    fn airborne_player(app: &mut App, simulated: bool) -> Entity {
        app.add_systems(
            Update,
            (apply_input, apply_gravity, apply_velocity, check_collisions).chain(),
        );
        app.world_mut()
            .spawn((Transform::default(), Collider::new(Vec2::new(200.0, 20.0))));
        let player = spawn_test_player(app, Vec2::new(0.0, 200.0), simulated);
        app.world_mut().get_mut::<Velocity>(player).unwrap().0 = Vec2::new(100.0, 100.0);
        app.world_mut().resource_mut::<PlayerInput>().move_x = -1.0;
        player
    }

    #[test]
    fn test_suspended_body_is_left_alone() {
        let mut app = physics_app();
        let player = airborne_player(&mut app, false);

        for _ in 0..3 {
            step(&mut app);
        }

        let transform = app.world().get::<Transform>(player).unwrap();
        assert_eq!(transform.translation.truncate(), Vec2::new(0.0, 200.0));
        assert_eq!(app.world().get::<Velocity>(player).unwrap().0, Vec2::new(100.0, 100.0));
        assert_eq!(app.world().get::<Facing>(player).unwrap().0, 1.0);
    }

    #[test]
    fn test_simulated_body_moves_under_same_input() {
        let mut app = physics_app();
        let player = airborne_player(&mut app, true);

        for _ in 0..3 {
            step(&mut app);
        }

        let transform = app.world().get::<Transform>(player).unwrap();
        assert!(transform.translation.y > 200.0);
        let velocity = app.world().get::<Velocity>(player).unwrap().0;
        assert!(velocity.x < 100.0, "input should pull velocity left");
        assert!(velocity.y < 100.0, "gravity should slow the rise");
        assert_eq!(app.world().get::<Facing>(player).unwrap().0, -1.0);
    }
}
