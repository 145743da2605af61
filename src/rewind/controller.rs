//! Rewind controller - Recording / Rewinding state machine
//!
//! While rewinding, the controller owns the player's motion: physics is
//! suspended, samples are consumed back-to-front from the history, and the
//! displayed position springs toward the latest target. Releasing the rewind
//! input snaps the body onto that target and hands the undone samples off as
//! a [`ReplaySegment`].

use bevy::prelude::*;

use super::history::{MotionHistory, RecordedSample};
use super::segment::ReplaySegment;
use crate::body::{Interpolation, PhysicsControl, Velocity};
use crate::helpers::smooth_damp;

/// Fewest samples a rewind can ever start with
const ABSOLUTE_MIN_SAMPLES: usize = 2;

/// Controller phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RewindPhase {
    #[default]
    Recording,
    Rewinding,
}

/// Why a rewind request was refused. Never fatal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RewindRejection {
    AlreadyRewinding,
    InsufficientHistory { available: usize, required: usize },
    CoolingDown { remaining: f32 },
}

impl std::fmt::Display for RewindRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RewindRejection::AlreadyRewinding => write!(f, "already rewinding"),
            RewindRejection::InsufficientHistory {
                available,
                required,
            } => write!(f, "history too short ({}/{} samples)", available, required),
            RewindRejection::CoolingDown { remaining } => {
                write!(f, "cooling down ({:.2}s left)", remaining)
            }
        }
    }
}

/// Guard and reach settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RewindSettings {
    /// Minimum history length before a rewind may start
    pub min_samples: usize,
    /// Seconds after a rewind ends before another may start
    pub cooldown: f32,
    /// How far back (seconds before the gesture began) consumption may reach
    pub max_reach: Option<f32>,
}

impl Default for RewindSettings {
    fn default() -> Self {
        Self {
            min_samples: crate::constants::MIN_REWIND_SAMPLES,
            cooldown: crate::constants::REWIND_COOLDOWN,
            max_reach: Some(crate::constants::MAX_REWIND_REACH),
        }
    }
}

/// Result of one rewind step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewindStep {
    /// Not rewinding
    Idle,
    /// One sample moved from history into the segment buffer
    Consumed,
    /// Reach cap hit; holding the last target
    Frozen,
    /// Fewer than two samples left; the rewind must end
    Exhausted,
}

/// Per-player rewind state
#[derive(Component, Debug, Clone, Default)]
pub struct RewindController {
    phase: RewindPhase,
    rewind_start_time: f32,
    /// When the previous rewind ended
    last_rewind_end: Option<f32>,
    target_position: Vec2,
    target_velocity: Vec2,
    visual_position: Vec2,
    smoothing_velocity: Vec2,
    /// Samples undone so far this gesture, newest first
    undone: Vec<RecordedSample>,
    saved_interpolation: Interpolation,
    rejection_reported: bool,
}

impl RewindController {
    pub fn phase(&self) -> RewindPhase {
        self.phase
    }

    pub fn is_rewinding(&self) -> bool {
        self.phase == RewindPhase::Rewinding
    }

    pub fn rewind_start_time(&self) -> f32 {
        self.rewind_start_time
    }

    pub fn target_position(&self) -> Vec2 {
        self.target_position
    }

    pub fn target_velocity(&self) -> Vec2 {
        self.target_velocity
    }

    pub fn visual_position(&self) -> Vec2 {
        self.visual_position
    }

    /// Samples undone so far in the current gesture
    pub fn undone_count(&self) -> usize {
        self.undone.len()
    }

    /// Check both start guards without changing anything
    pub fn can_start(
        &self,
        history: &MotionHistory,
        now: f32,
        settings: &RewindSettings,
    ) -> Result<(), RewindRejection> {
        if self.is_rewinding() {
            return Err(RewindRejection::AlreadyRewinding);
        }

        let required = settings.min_samples.max(ABSOLUTE_MIN_SAMPLES);
        if history.count() < required {
            return Err(RewindRejection::InsufficientHistory {
                available: history.count(),
                required,
            });
        }

        if let Some(ended) = self.last_rewind_end {
            let since = now - ended;
            if since < settings.cooldown {
                return Err(RewindRejection::CoolingDown {
                    remaining: settings.cooldown - since,
                });
            }
        }

        Ok(())
    }

    /// Enter Rewinding if the guards allow it.
    ///
    /// On success physics is suspended for the body and its velocity zeroed.
    /// On rejection nothing changes.
    pub fn try_start(
        &mut self,
        history: &MotionHistory,
        position: Vec2,
        velocity: &mut Velocity,
        control: &mut PhysicsControl,
        now: f32,
        settings: &RewindSettings,
    ) -> Result<(), RewindRejection> {
        self.can_start(history, now, settings)?;

        self.phase = RewindPhase::Rewinding;
        self.rewind_start_time = now;
        self.undone.clear();
        self.target_position = position;
        self.target_velocity = Vec2::ZERO;
        self.visual_position = position;
        self.smoothing_velocity = Vec2::ZERO;
        self.rejection_reported = false;

        self.saved_interpolation = control.interpolation;
        control.simulated = false;
        control.interpolation = Interpolation::None;
        velocity.0 = Vec2::ZERO;

        Ok(())
    }

    /// Consume one sample from the end of the history
    pub fn step(&mut self, history: &mut MotionHistory, settings: &RewindSettings) -> RewindStep {
        if !self.is_rewinding() {
            return RewindStep::Idle;
        }

        let count = history.count();
        if count < ABSOLUTE_MIN_SAMPLES {
            return RewindStep::Exhausted;
        }

        let Some(candidate) = history.get(count - 2).copied() else {
            return RewindStep::Exhausted;
        };

        if let Some(max_reach) = settings.max_reach
            && self.rewind_start_time - candidate.timestamp > max_reach
        {
            return RewindStep::Frozen;
        }

        if let Some(newest) = history.pop_last() {
            self.undone.push(newest);
        }
        if let Some(last) = history.last() {
            self.target_position = last.position;
            self.target_velocity = last.velocity;
        }

        RewindStep::Consumed
    }

    /// Advance the displayed position toward the target.
    ///
    /// Driven by unscaled frame time so time-scale effects don't slow it.
    pub fn smooth(&mut self, dt: f32, smooth_time: f32) -> Vec2 {
        if self.is_rewinding() {
            self.visual_position = smooth_damp(
                self.visual_position,
                self.target_position,
                &mut self.smoothing_velocity,
                smooth_time,
                dt,
            );
        }
        self.visual_position
    }

    /// Leave Rewinding: snap onto the target and restore physics.
    ///
    /// Returns the undone motion in chronological order, or `None` when nothing
    /// was undone (or no rewind was in progress).
    pub fn stop(
        &mut self,
        transform: &mut Transform,
        velocity: &mut Velocity,
        control: &mut PhysicsControl,
        now: f32,
    ) -> Option<ReplaySegment> {
        if !self.is_rewinding() {
            return None;
        }

        transform.translation.x = self.target_position.x;
        transform.translation.y = self.target_position.y;
        velocity.0 = self.target_velocity;
        self.visual_position = self.target_position;
        self.smoothing_velocity = Vec2::ZERO;

        control.simulated = true;
        control.interpolation = self.saved_interpolation;

        self.phase = RewindPhase::Recording;
        self.last_rewind_end = Some(now);

        if self.undone.is_empty() {
            None
        } else {
            Some(ReplaySegment::from_undone(std::mem::take(&mut self.undone)))
        }
    }

    /// Abort any rewind without producing a segment (death / respawn)
    pub fn cancel(&mut self, control: &mut PhysicsControl) {
        if self.is_rewinding() {
            control.simulated = true;
            control.interpolation = self.saved_interpolation;
        }
        self.phase = RewindPhase::Recording;
        self.undone.clear();
        self.smoothing_velocity = Vec2::ZERO;
    }

    /// True the first time it is called after a rejection streak begins.
    /// Used to surface a single diagnostic instead of one per frame.
    pub fn should_report_rejection(&mut self) -> bool {
        if self.rejection_reported {
            false
        } else {
            self.rejection_reported = true;
            true
        }
    }
}

/// Respawn hook: history never survives death and any rewind is cancelled
pub fn reset_for_respawn(
    history: &mut MotionHistory,
    controller: &mut RewindController,
    control: &mut PhysicsControl,
) {
    history.clear();
    controller.cancel(control);
}
