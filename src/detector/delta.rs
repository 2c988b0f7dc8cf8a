use super::{config::GestureThresholds, types::Vector3};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FieldDeltas {
    /// Change since the previous field sample.
    pub instant: f32,
    /// Distance from the baseline, `None` while no baseline exists.
    pub from_baseline: Option<f32>,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct DeltaClass {
    pub exceeds_click: bool,
    pub exceeds_long_click: bool,
    /// Baseline delta also clears the click threshold.
    pub baseline_confirms: bool,
}

pub fn compute_deltas(current: Vector3, last: Vector3, baseline: Option<Vector3>) -> FieldDeltas {
    FieldDeltas {
        instant: current.distance(last),
        from_baseline: baseline.map(|b| current.distance(b)),
    }
}

pub fn classify_deltas(deltas: FieldDeltas, thresholds: &GestureThresholds) -> DeltaClass {
    DeltaClass {
        exceeds_click: deltas.instant > thresholds.click_threshold,
        exceeds_long_click: deltas.instant > thresholds.long_click_threshold,
        baseline_confirms: deltas
            .from_baseline
            .is_some_and(|d| d > thresholds.click_threshold),
    }
}
