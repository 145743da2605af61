//! Input module - PlayerInput resource and capture_input system
//!
//! Raw button state is polled once per frame. The rewind button is turned into
//! `RewindCommand::Start` / `Stop` edges here so the rewind core never sees keys.

use bevy::prelude::*;

use crate::constants::*;
use crate::rewind::RewindCommand;

/// Buffered input state for the player
#[derive(Resource, Default)]
pub struct PlayerInput {
    pub move_x: f32,
    pub jump_buffer_timer: f32, // Time remaining in jump buffer
    pub jump_held: bool,        // Is jump button currently held
    pub rewind_held: bool,      // Rewind button state as of last frame
    pub reset_pressed: bool,    // Accumulates until the respawn layer consumes it
}

/// Turn a held/not-held transition into a rewind command
pub fn rewind_edge(was_held: bool, held_now: bool) -> Option<RewindCommand> {
    match (was_held, held_now) {
        (false, true) => Some(RewindCommand::Start),
        (true, false) => Some(RewindCommand::Stop),
        _ => None,
    }
}

/// Runs in Update to capture input state before it's cleared
pub fn capture_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    gamepads: Query<&Gamepad>,
    mut input: ResMut<PlayerInput>,
    time: Res<Time>,
    mut rewind: MessageWriter<RewindCommand>,
) {
    // Horizontal movement (continuous - overwrite each frame)
    let mut move_x = 0.0;

    if keyboard.pressed(KeyCode::KeyA) || keyboard.pressed(KeyCode::ArrowLeft) {
        move_x -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyD) || keyboard.pressed(KeyCode::ArrowRight) {
        move_x += 1.0;
    }

    for gamepad in &gamepads {
        if let Some(stick_x) = gamepad.get(GamepadAxis::LeftStickX)
            && stick_x.abs() > STICK_DEADZONE
        {
            move_x += stick_x;
        }
    }

    input.move_x = move_x.clamp(-1.0, 1.0);

    let jump_pressed = keyboard.just_pressed(KeyCode::Space)
        || keyboard.just_pressed(KeyCode::KeyW)
        || keyboard.just_pressed(KeyCode::ArrowUp)
        || gamepads
            .iter()
            .any(|gp| gp.just_pressed(GamepadButton::South));

    input.jump_held = keyboard.pressed(KeyCode::Space)
        || keyboard.pressed(KeyCode::KeyW)
        || keyboard.pressed(KeyCode::ArrowUp)
        || gamepads.iter().any(|gp| gp.pressed(GamepadButton::South));

    // Jump buffering - reset timer on press, count down otherwise
    if jump_pressed {
        input.jump_buffer_timer = JUMP_BUFFER_TIME;
    } else {
        input.jump_buffer_timer = (input.jump_buffer_timer - time.delta_secs()).max(0.0);
    }

    // Rewind (Shift / left trigger) - held for as long as the rewind lasts
    let rewind_held_now = keyboard.pressed(KeyCode::ShiftLeft)
        || keyboard.pressed(KeyCode::KeyQ)
        || gamepads
            .iter()
            .any(|gp| gp.pressed(GamepadButton::LeftTrigger));
    if let Some(command) = rewind_edge(input.rewind_held, rewind_held_now) {
        rewind.write(command);
    }
    input.rewind_held = rewind_held_now;

    // Reset (R / Start)
    if keyboard.just_pressed(KeyCode::KeyR)
        || gamepads
            .iter()
            .any(|gp| gp.just_pressed(GamepadButton::Start))
    {
        input.reset_pressed = true;
    }
}
