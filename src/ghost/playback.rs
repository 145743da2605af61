//! Ghost playback - deterministic replay of a segment with a bounded lifetime

use bevy::prelude::*;

use crate::rewind::{RecordedSample, ReplaySegment};

/// Slack for comparing accumulated float clocks against frame boundaries
const TIME_EPSILON: f32 = 1e-4;

/// Replays a [`ReplaySegment`] one recorded frame at a time.
///
/// The cursor only moves forward and stops on the last sample. The lifetime
/// is measured on the wall clock, so a ghost expires on schedule even
/// mid-playback or under a scaled game clock.
#[derive(Component, Debug, Clone)]
pub struct GhostPlayback {
    segment: ReplaySegment,
    cursor: usize,
    /// Playback clock, already scaled by replay speed
    elapsed: f32,
    /// Wall-clock time the ghost appeared
    born_at: f32,
    age: f32,
    lifetime: f32,
    facing: f32,
}

impl GhostPlayback {
    /// Begin playback of `segment`. `None` for an empty segment.
    pub fn play(segment: ReplaySegment, lifetime: f32) -> Option<Self> {
        if segment.is_empty() {
            return None;
        }
        let facing = segment
            .first()
            .map(|s| if s.velocity.x < 0.0 { -1.0 } else { 1.0 })
            .unwrap_or(1.0);
        Some(Self {
            segment,
            cursor: 0,
            elapsed: 0.0,
            born_at: 0.0,
            age: 0.0,
            lifetime,
            facing,
        })
    }

    /// Start the lifetime clock at wall-clock time `now`
    pub fn born_at(mut self, now: f32) -> Self {
        self.born_at = now;
        self
    }

    pub fn segment(&self) -> &ReplaySegment {
        &self.segment
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn age(&self) -> f32 {
        self.age
    }

    /// -1.0 = left, 1.0 = right
    pub fn facing(&self) -> f32 {
        self.facing
    }

    /// Sample currently shown
    pub fn current(&self) -> &RecordedSample {
        // Cursor is always in bounds: segments are never empty and the cursor clamps
        &self.segment.samples()[self.cursor]
    }

    pub fn start_position(&self) -> Vec2 {
        self.segment.samples()[0].position
    }

    /// Reached the final sample
    pub fn is_finished(&self) -> bool {
        self.cursor + 1 >= self.segment.len()
    }

    /// Advance the playback clock by `dt` real seconds.
    ///
    /// The cursor lands on the latest sample whose offset
    /// (`index * frame_duration`) has been reached by the scaled clock.
    pub fn advance(
        &mut self,
        dt: f32,
        replay_speed: f32,
        frame_duration: f32,
        facing_deadzone: f32,
    ) -> &RecordedSample {
        self.elapsed += dt * replay_speed.max(0.0);

        let last = self.segment.len() - 1;
        if frame_duration <= 0.0 {
            self.cursor = last;
        } else {
            while self.cursor < last
                && (self.cursor + 1) as f32 * frame_duration <= self.elapsed + TIME_EPSILON
            {
                self.cursor += 1;
            }
        }

        let vx = self.current().velocity.x;
        if vx > facing_deadzone {
            self.facing = 1.0;
        } else if vx < -facing_deadzone {
            self.facing = -1.0;
        }

        self.current()
    }

    /// Age the ghost to wall-clock time `now`; true once its lifetime is used up
    pub fn age_to(&mut self, now: f32) -> bool {
        self.age = (now - self.born_at).max(0.0);
        self.is_expired()
    }

    pub fn is_expired(&self) -> bool {
        self.age + TIME_EPSILON >= self.lifetime
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: f32 = 0.02;

    fn segment(n: usize) -> ReplaySegment {
        ReplaySegment::from_chronological(
            (0..n)
                .map(|i| {
                    RecordedSample::new(
                        Vec2::new(i as f32 * 10.0, 5.0),
                        Vec2::new(100.0, 0.0),
                        i as f32 * FRAME,
                    )
                })
                .collect(),
        )
    }

    #[test]
    fn test_empty_segment_does_not_play() {
        assert!(GhostPlayback::play(ReplaySegment::default(), 5.0).is_none());
    }

    #[test]
    fn test_starts_at_first_sample() {
        let ghost = GhostPlayback::play(segment(4), 5.0).unwrap();
        assert_eq!(ghost.start_position(), Vec2::new(0.0, 5.0));
        assert_eq!(ghost.cursor(), 0);
    }

    #[test]
    fn test_cursor_follows_recorded_timing() {
        let mut ghost = GhostPlayback::play(segment(10), 5.0).unwrap();

        ghost.advance(FRAME, 1.0, FRAME, 1.0);
        assert_eq!(ghost.cursor(), 1);
        ghost.advance(FRAME * 0.5, 1.0, FRAME, 1.0);
        assert_eq!(ghost.cursor(), 1);
        ghost.advance(FRAME * 0.5, 1.0, FRAME, 1.0);
        assert_eq!(ghost.cursor(), 2);
    }

    #[test]
    fn test_reaches_last_sample_and_stays() {
        let k = 7;
        let speed = 2.0;
        let mut ghost = GhostPlayback::play(segment(k + 1), 60.0).unwrap();

        // k * frame / speed seconds of real time
        let needed = k as f32 * FRAME / speed;
        let dt = 0.005;
        let mut t = 0.0;
        while t < needed + dt {
            ghost.advance(dt, speed, FRAME, 1.0);
            t += dt;
        }
        assert_eq!(ghost.cursor(), k);
        assert!(ghost.is_finished());

        for _ in 0..100 {
            let sample = ghost.advance(dt, speed, FRAME, 1.0);
            assert_eq!(sample.position, Vec2::new(k as f32 * 10.0, 5.0));
        }
        assert_eq!(ghost.cursor(), k);
    }

    #[test]
    fn test_slow_replay_takes_longer() {
        let mut ghost = GhostPlayback::play(segment(5), 60.0).unwrap();
        // Half speed: two real frames per recorded frame
        ghost.advance(FRAME, 0.5, FRAME, 1.0);
        assert_eq!(ghost.cursor(), 0);
        ghost.advance(FRAME, 0.5, FRAME, 1.0);
        assert_eq!(ghost.cursor(), 1);
    }

    #[test]
    fn test_expires_at_timeout_even_mid_playback() {
        let lifetime = 1.0;
        let mut ghost = GhostPlayback::play(segment(10_000), lifetime)
            .unwrap()
            .born_at(5.0);
        let dt = 0.1;

        for step in 1..=10 {
            ghost.advance(dt, 0.1, FRAME, 1.0);
            let expired = ghost.age_to(5.0 + step as f32 * dt);
            if step < 10 {
                assert!(!expired, "expired early at step {}", step);
            } else {
                assert!(expired);
            }
        }
        assert!(!ghost.is_finished());
    }

    #[test]
    fn test_facing_uses_deadzone() {
        let samples = vec![
            RecordedSample::new(Vec2::ZERO, Vec2::new(-50.0, 0.0), 0.0),
            RecordedSample::new(Vec2::ZERO, Vec2::new(0.5, 0.0), FRAME),
            RecordedSample::new(Vec2::ZERO, Vec2::new(40.0, 0.0), 2.0 * FRAME),
        ];
        let mut ghost =
            GhostPlayback::play(ReplaySegment::from_chronological(samples), 5.0).unwrap();
        assert_eq!(ghost.facing(), -1.0);

        ghost.advance(FRAME, 1.0, FRAME, 5.0);
        // Tiny velocity inside the dead zone keeps the old facing
        assert_eq!(ghost.facing(), -1.0);

        ghost.advance(FRAME, 1.0, FRAME, 5.0);
        assert_eq!(ghost.facing(), 1.0);
    }
}
