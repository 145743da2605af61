//! Rewind systems - recording, command handling, stepping and smoothing

use bevy::prelude::*;

use super::controller::{RewindController, RewindRejection, RewindStep};
use super::history::{MotionHistory, RecordedSample};
use crate::body::{PhysicsControl, Velocity};
use crate::events::{EventBus, GameEvent};
use crate::ghost::SpawnGhost;
use crate::tuning::GameplayTuning;

/// Abstract rewind input, produced by the input layer from press/release edges
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewindCommand {
    Start,
    Stop,
}

/// Keep the fixed timestep and history capacity in line with the tuning.
///
/// Ghost playback and the recording window both assume one sample per
/// `frame_duration()`, so a reloaded `fixed_hz` has to reach `Time<Fixed>` too.
pub fn sync_history_capacity(
    tuning: Res<GameplayTuning>,
    mut fixed: ResMut<Time<Fixed>>,
    mut histories: Query<&mut MotionHistory>,
) {
    if !tuning.is_changed() {
        return;
    }
    let step = tuning.frame_duration();
    if (fixed.timestep().as_secs_f32() - step).abs() > f32::EPSILON {
        fixed.set_timestep_hz(tuning.fixed_hz.max(1.0));
        info!("Fixed timestep set to {:.1} Hz", tuning.fixed_hz.max(1.0));
    }
    let capacity = tuning.history_capacity();
    for mut history in &mut histories {
        history.set_capacity(capacity);
    }
}

/// Runs in FixedUpdate: append one sample per step while not rewinding
pub fn record_motion(
    time: Res<Time>,
    mut players: Query<(&Transform, &Velocity, &RewindController, &mut MotionHistory)>,
) {
    let now = time.elapsed_secs();
    for (transform, velocity, controller, mut history) in &mut players {
        if controller.is_rewinding() {
            continue;
        }
        history.record(RecordedSample::new(
            transform.translation.truncate(),
            velocity.0,
            now,
        ));
    }
}

/// Runs in FixedUpdate: apply Start/Stop commands issued since the last step
pub fn apply_rewind_commands(
    mut commands_in: MessageReader<RewindCommand>,
    time: Res<Time>,
    tuning: Res<GameplayTuning>,
    mut players: Query<(
        &mut Transform,
        &mut Velocity,
        &mut PhysicsControl,
        &mut RewindController,
        &MotionHistory,
    )>,
    mut ghosts: MessageWriter<SpawnGhost>,
    mut bus: ResMut<EventBus>,
) {
    let now = time.elapsed_secs();
    let settings = tuning.rewind_settings();

    for command in commands_in.read() {
        for (mut transform, mut velocity, mut control, mut controller, history) in &mut players {
            match command {
                RewindCommand::Start => {
                    let position = transform.translation.truncate();
                    match controller.try_start(
                        history,
                        position,
                        &mut velocity,
                        &mut control,
                        now,
                        &settings,
                    ) {
                        Ok(()) => {
                            debug!("Rewind started with {} samples", history.count());
                            bus.emit(GameEvent::RewindStarted);
                        }
                        Err(RewindRejection::AlreadyRewinding) => {}
                        Err(reason) => {
                            if controller.should_report_rejection() {
                                warn!("Rewind refused: {}", reason);
                            }
                            bus.emit(GameEvent::RewindRejected {
                                reason: reason.to_string(),
                            });
                        }
                    }
                }
                RewindCommand::Stop => finish_rewind(
                    &mut controller,
                    &mut transform,
                    &mut velocity,
                    &mut control,
                    now,
                    &mut ghosts,
                    &mut bus,
                ),
            }
        }
    }
}

/// Runs in FixedUpdate: consume one sample per step while rewinding
pub fn step_rewind(
    time: Res<Time>,
    tuning: Res<GameplayTuning>,
    mut players: Query<(
        &mut Transform,
        &mut Velocity,
        &mut PhysicsControl,
        &mut RewindController,
        &mut MotionHistory,
    )>,
    mut ghosts: MessageWriter<SpawnGhost>,
    mut bus: ResMut<EventBus>,
) {
    let now = time.elapsed_secs();
    let settings = tuning.rewind_settings();

    for (mut transform, mut velocity, mut control, mut controller, mut history) in &mut players {
        if controller.step(&mut history, &settings) == RewindStep::Exhausted {
            debug!("Rewind ran out of history");
            finish_rewind(
                &mut controller,
                &mut transform,
                &mut velocity,
                &mut control,
                now,
                &mut ghosts,
                &mut bus,
            );
        }
    }
}

/// Runs in Update: spring the displayed position toward the rewind target
pub fn smooth_rewind_visual(
    real_time: Res<Time<Real>>,
    tuning: Res<GameplayTuning>,
    mut players: Query<(&mut Transform, &mut RewindController)>,
) {
    let dt = real_time.delta_secs();
    for (mut transform, mut controller) in &mut players {
        if !controller.is_rewinding() {
            continue;
        }
        let pos = controller.smooth(dt, tuning.rewind_smooth_time);
        transform.translation.x = pos.x;
        transform.translation.y = pos.y;
    }
}

fn finish_rewind(
    controller: &mut RewindController,
    transform: &mut Transform,
    velocity: &mut Velocity,
    control: &mut PhysicsControl,
    now: f32,
    ghosts: &mut MessageWriter<SpawnGhost>,
    bus: &mut EventBus,
) {
    if !controller.is_rewinding() {
        return;
    }

    let undone = controller.undone_count();
    let segment = controller.stop(transform, velocity, control, now);
    debug!("Rewind stopped after undoing {} samples", undone);
    bus.emit(GameEvent::RewindStopped { undone });

    if let Some(segment) = segment {
        ghosts.write(SpawnGhost(segment));
    }
}
