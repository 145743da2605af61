//! Motion history - bounded record of the player's recent motion

use bevy::prelude::*;
use std::collections::VecDeque;

/// One recorded simulation step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecordedSample {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Simulation time the sample was taken at (seconds)
    pub timestamp: f32,
}

impl RecordedSample {
    pub fn new(position: Vec2, velocity: Vec2, timestamp: f32) -> Self {
        Self {
            position,
            velocity,
            timestamp,
        }
    }
}

/// Oldest-first ring of recorded samples owned by the player.
///
/// Appending past capacity evicts the oldest sample. Only the recorder appends
/// and only the rewind controller pops from the end.
#[derive(Component, Debug, Clone)]
pub struct MotionHistory {
    samples: VecDeque<RecordedSample>,
    capacity: usize,
}

impl MotionHistory {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// History sized to hold `duration` seconds recorded at `rate` samples per second
    pub fn for_window(rate: f32, duration: f32) -> Self {
        Self::with_capacity(Self::capacity_for(rate, duration))
    }

    /// `ceil(rate * duration)`, at least one
    pub fn capacity_for(rate: f32, duration: f32) -> usize {
        ((rate * duration).ceil().max(1.0)) as usize
    }

    /// Append a sample, evicting the oldest when full
    pub fn record(&mut self, sample: RecordedSample) {
        while self.samples.len() >= self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    /// Change capacity, dropping the oldest samples if the history shrinks
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn count(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Sample at `index`, oldest first
    pub fn get(&self, index: usize) -> Option<&RecordedSample> {
        self.samples.get(index)
    }

    pub fn last(&self) -> Option<&RecordedSample> {
        self.samples.back()
    }

    pub(crate) fn pop_last(&mut self) -> Option<RecordedSample> {
        self.samples.pop_back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RecordedSample> {
        self.samples.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(i: usize) -> RecordedSample {
        RecordedSample::new(Vec2::new(i as f32, 0.0), Vec2::ZERO, i as f32 * 0.02)
    }

    #[test]
    fn test_capacity_for_window() {
        assert_eq!(MotionHistory::capacity_for(50.0, 5.0), 250);
        assert_eq!(MotionHistory::capacity_for(60.0, 0.01), 1);
        assert_eq!(MotionHistory::capacity_for(50.0, 0.0), 1);
    }

    #[test]
    fn test_overflow_keeps_most_recent_in_order() {
        let mut history = MotionHistory::with_capacity(8);
        for i in 0..30 {
            history.record(sample(i));
        }

        assert_eq!(history.count(), 8);
        let xs: Vec<f32> = history.iter().map(|s| s.position.x).collect();
        assert_eq!(xs, vec![22.0, 23.0, 24.0, 25.0, 26.0, 27.0, 28.0, 29.0]);
    }

    #[test]
    fn test_under_capacity_keeps_everything() {
        let mut history = MotionHistory::with_capacity(8);
        for i in 0..5 {
            history.record(sample(i));
        }
        assert_eq!(history.count(), 5);
        assert_eq!(history.get(0).unwrap().position.x, 0.0);
        assert_eq!(history.last().unwrap().position.x, 4.0);
    }

    #[test]
    fn test_shrinking_capacity_drops_oldest() {
        let mut history = MotionHistory::with_capacity(10);
        for i in 0..10 {
            history.record(sample(i));
        }
        history.set_capacity(3);
        let xs: Vec<f32> = history.iter().map(|s| s.position.x).collect();
        assert_eq!(xs, vec![7.0, 8.0, 9.0]);
    }

    #[test]
    fn test_clear() {
        let mut history = MotionHistory::with_capacity(4);
        history.record(sample(0));
        history.clear();
        assert!(history.is_empty());
        assert!(history.last().is_none());
    }
}
