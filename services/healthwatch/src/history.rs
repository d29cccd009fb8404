//! Bounded newest-first history of health samples

use std::collections::VecDeque;

use crate::sample::HealthSample;

/// Number of samples kept in the rolling history
pub const HISTORY_CAPACITY: usize = 10;

#[derive(Debug, Clone)]
pub struct SampleHistory {
    samples: VecDeque<HealthSample>,
}

impl Default for SampleHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl SampleHistory {
    pub fn new() -> Self {
        Self {
            samples: VecDeque::with_capacity(HISTORY_CAPACITY),
        }
    }

    /// Prepend a sample, evicting the oldest one when full
    pub fn push(&mut self, sample: HealthSample) {
        if self.samples.len() >= HISTORY_CAPACITY {
            self.samples.pop_back();
        }
        self.samples.push_front(sample);
    }

    /// Newest first
    pub fn iter(&self) -> impl Iterator<Item = &HealthSample> {
        self.samples.iter()
    }

    pub fn all(&self) -> Vec<HealthSample> {
        self.samples.iter().cloned().collect()
    }

    pub fn latest(&self) -> Option<&HealthSample> {
        self.samples.front()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
