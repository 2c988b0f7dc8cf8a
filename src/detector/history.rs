use core::fmt;

use heapless::{Deque, Vec};

use super::types::Vector3;

pub const HISTORY_CAPACITY: usize = 10;

/// Fixed-capacity FIFO of the most recent samples of one channel.
#[derive(Clone)]
pub struct SampleHistory {
    samples: Deque<Vector3, HISTORY_CAPACITY>,
}

impl SampleHistory {
    pub const fn new() -> Self {
        Self {
            samples: Deque::new(),
        }
    }

    /// Appends `sample`, evicting the oldest one when full.
    pub fn push(&mut self, sample: Vector3) {
        if self.samples.is_full() {
            self.samples.pop_front();
        }
        // A slot is free at this point.
        let _ = self.samples.push_back(sample);
    }

    /// The last `k` samples, oldest first. Shorter when history is.
    pub fn recent(&self, k: usize) -> Vec<Vector3, HISTORY_CAPACITY> {
        let skip = self.samples.len().saturating_sub(k);
        self.samples.iter().skip(skip).copied().collect()
    }

    pub fn latest(&self) -> Option<Vector3> {
        self.samples.back().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Vector3> {
        self.samples.iter()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

impl Default for SampleHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SampleHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.samples.iter()).finish()
    }
}
