//! Replay segment - the motion undone by one rewind gesture

use super::history::RecordedSample;

/// Chronological (oldest-first) slice of samples handed to a ghost
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReplaySegment {
    samples: Vec<RecordedSample>,
}

impl ReplaySegment {
    /// Build from samples already in chronological order
    pub fn from_chronological(samples: Vec<RecordedSample>) -> Self {
        Self { samples }
    }

    /// Build from the rewind buffer, which fills newest-first
    pub(crate) fn from_undone(mut newest_first: Vec<RecordedSample>) -> Self {
        newest_first.reverse();
        Self {
            samples: newest_first,
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[RecordedSample] {
        &self.samples
    }

    pub fn get(&self, index: usize) -> Option<&RecordedSample> {
        self.samples.get(index)
    }

    pub fn first(&self) -> Option<&RecordedSample> {
        self.samples.first()
    }

    pub fn last(&self) -> Option<&RecordedSample> {
        self.samples.last()
    }

    /// Playback time from first to last sample at one sample per frame
    pub fn duration(&self, frame_duration: f32) -> f32 {
        self.samples.len().saturating_sub(1) as f32 * frame_duration
    }
}
