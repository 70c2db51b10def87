//! Rolling vitals history for the graphs panel.

use std::collections::VecDeque;

use crate::presentation::StatusSnapshot;

/// Keeps the most recent `capacity` samples of one metric.
pub struct SampleRing {
    samples: VecDeque<f32>,
    capacity: usize,
}

impl SampleRing {
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    pub fn push(&mut self, value: f32) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(value);
    }

    /// Samples in chronological order.
    pub fn iter(&self) -> impl Iterator<Item = f32> + '_ {
        self.samples.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn last(&self) -> Option<f32> {
        self.samples.back().copied()
    }
}

/// Energy, stress and guilt sampled on each presentation refresh.
pub struct VitalsHistory {
    pub energy: SampleRing,
    pub stress: SampleRing,
    pub guilt: SampleRing,
}

impl VitalsHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            energy: SampleRing::new(capacity),
            stress: SampleRing::new(capacity),
            guilt: SampleRing::new(capacity),
        }
    }

    pub fn record(&mut self, snapshot: &StatusSnapshot) {
        self.energy.push(snapshot.energy);
        self.stress.push(snapshot.stress);
        self.guilt.push(snapshot.guilt);
    }
}
