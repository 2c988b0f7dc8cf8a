use super::{history::SampleHistory, types::Vector3};

/// Resting magnetic field the detector measures pulls against.
///
/// The first sample seeds a provisional value. The baseline is locked once
/// enough history exists and is then only replaced after `invalidate` or by
/// an explicit `set`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BaselineEstimator {
    value: Option<Vector3>,
    is_set: bool,
}

impl BaselineEstimator {
    pub const fn new() -> Self {
        Self {
            value: None,
            is_set: false,
        }
    }

    /// Component-wise mean of the history.
    pub fn compute(history: &SampleHistory) -> Option<Vector3> {
        if history.is_empty() {
            return None;
        }
        let n = history.len() as f32;
        let sum = history.iter().fold(Vector3::ZERO, |acc, s| {
            Vector3::new(acc.x + s.x, acc.y + s.y, acc.z + s.z)
        });
        Some(Vector3::new(sum.x / n, sum.y / n, sum.z / n))
    }

    /// Locks the baseline to the history mean once `min_samples` are
    /// buffered. Returns the new value when this call set it.
    pub fn refresh(&mut self, history: &SampleHistory, min_samples: usize) -> Option<Vector3> {
        if self.is_set || history.len() < min_samples {
            return None;
        }
        let mean = Self::compute(history)?;
        self.set(mean);
        Some(mean)
    }

    pub fn seed(&mut self, value: Vector3) {
        if !self.is_set {
            self.value = Some(value);
        }
    }

    pub fn set(&mut self, value: Vector3) {
        self.value = Some(value);
        self.is_set = true;
    }

    pub fn invalidate(&mut self) {
        self.value = None;
        self.is_set = false;
    }

    pub fn is_set(&self) -> bool {
        self.is_set
    }

    pub fn current(&self) -> Option<Vector3> {
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(samples: &[Vector3]) -> SampleHistory {
        let mut history = SampleHistory::new();
        for s in samples {
            history.push(*s);
        }
        history
    }

    #[test]
    fn compute_is_component_wise_mean() {
        let history = filled(&[
            Vector3::new(-330.0, 2.0, 10.0),
            Vector3::new(-346.0, -2.0, 20.0),
        ]);
        assert_eq!(
            BaselineEstimator::compute(&history),
            Some(Vector3::new(-338.0, 0.0, 15.0))
        );
        assert_eq!(BaselineEstimator::compute(&SampleHistory::new()), None);
    }

    #[test]
    fn refresh_waits_for_min_samples_then_locks() {
        let mut baseline = BaselineEstimator::new();
        let mut history = filled(&[Vector3::new(-338.0, 0.0, 0.0); 4]);

        assert_eq!(baseline.refresh(&history, 5), None);
        assert!(!baseline.is_set());

        history.push(Vector3::new(-338.0, 0.0, 0.0));
        assert_eq!(
            baseline.refresh(&history, 5),
            Some(Vector3::new(-338.0, 0.0, 0.0))
        );
        assert!(baseline.is_set());

        history.push(Vector3::new(-500.0, 0.0, 0.0));
        assert_eq!(baseline.refresh(&history, 5), None);
        assert_eq!(baseline.current(), Some(Vector3::new(-338.0, 0.0, 0.0)));
    }

    #[test]
    fn seed_never_overwrites_locked_value() {
        let mut baseline = BaselineEstimator::new();
        baseline.seed(Vector3::new(1.0, 1.0, 1.0));
        assert!(!baseline.is_set());
        assert_eq!(baseline.current(), Some(Vector3::new(1.0, 1.0, 1.0)));

        baseline.set(Vector3::new(2.0, 2.0, 2.0));
        baseline.seed(Vector3::new(3.0, 3.0, 3.0));
        assert_eq!(baseline.current(), Some(Vector3::new(2.0, 2.0, 2.0)));

        baseline.invalidate();
        assert!(!baseline.is_set());
        assert_eq!(baseline.current(), None);
    }
}
