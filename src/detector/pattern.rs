use super::{
    config::{AxisSelection, PatternConfig},
    history::SampleHistory,
    types::{Axis, RejectReason, Vector3},
};

pub const CHECK_TREND: u8 = 0x01;
pub const CHECK_MOVEMENT: u8 = 0x02;
pub const CHECK_DOMINANCE: u8 = 0x04;
pub const CHECK_BASELINE: u8 = 0x08;
pub const CHECK_ALL: u8 = CHECK_TREND | CHECK_MOVEMENT | CHECK_DOMINANCE | CHECK_BASELINE;

pub const TREND_WINDOW: usize = 3;
pub const ACCEL_WINDOW: usize = 3;
const MIN_ACCEL_SAMPLES: usize = 2;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct PatternAssessment {
    pub accepted: bool,
    /// Bitmask of `CHECK_*` heuristics that held.
    pub passed_mask: u8,
    /// First failing heuristic, `None` when accepted.
    pub reason: RejectReason,
    pub axis: Axis,
}

/// Resolves the pull axis for this sample.
pub fn select_axis(field_history: &SampleHistory, selection: AxisSelection) -> Axis {
    match selection {
        AxisSelection::Fixed(axis) => axis,
        AxisSelection::HighestVariance => highest_variance_axis(field_history),
    }
}

fn highest_variance_axis(history: &SampleHistory) -> Axis {
    if history.len() < 2 {
        return Axis::X;
    }
    let n = history.len() as f32;
    let mut best = (Axis::X, f32::MIN);
    for axis in Axis::ALL {
        let mean = history.iter().map(|s| s.axis(axis)).sum::<f32>() / n;
        let variance = history
            .iter()
            .map(|s| {
                let d = s.axis(axis) - mean;
                d * d
            })
            .sum::<f32>()
            / n;
        if variance > best.1 {
            best = (axis, variance);
        }
    }
    best.0
}

/// At least one step of the recent trend moves in the pull direction and at
/// least one step is large.
fn directional_trend(
    recent: &[Vector3],
    axis: Axis,
    click_threshold: f32,
    cfg: &PatternConfig,
) -> bool {
    let min_step = cfg.trend_step_ratio * click_threshold;
    let mut toward_pull = false;
    let mut large_step = false;
    for pair in recent.windows(2) {
        let step = pair[1].axis(axis) - pair[0].axis(axis);
        toward_pull |= cfg.pull_direction.along(step) > 0.0;
        large_step |= step.abs() > min_step;
    }
    toward_pull && large_step
}

/// Largest consecutive change of acceleration magnitude.
pub fn accel_magnitude_jump(recent: &[Vector3]) -> f32 {
    recent
        .windows(2)
        .map(|pair| (pair[1].magnitude() - pair[0].magnitude()).abs())
        .fold(0.0, f32::max)
}

fn axis_dominance(
    recent: &[Vector3],
    last: Vector3,
    current: Vector3,
    axis: Axis,
    click_threshold: f32,
    cfg: &PatternConfig,
) -> bool {
    let (primary, others) = current.axis_split(last, axis);
    let dominant = primary > cfg.dominance_ratio * others;
    let large = primary > cfg.axis_delta_ratio * click_threshold;
    let moved =
        cfg.pull_direction.along(current.axis(axis) - last.axis(axis)) > cfg.direction_margin;

    let quick_change = match recent {
        [.., before, latest] => {
            let change = (latest.axis(axis) - before.axis(axis)).abs();
            change > cfg.quick_change_ratio * click_threshold
        }
        _ => false,
    };

    dominant && large && moved && quick_change
}

fn baseline_significance(
    current: Vector3,
    baseline: Vector3,
    axis: Axis,
    click_threshold: f32,
    cfg: &PatternConfig,
) -> bool {
    (current.axis(axis) - baseline.axis(axis)).abs() > cfg.baseline_ratio * click_threshold
}

/// Checks that a click-threshold crossing looks like a deliberate pull and
/// not ambient noise, pocket jostling or slow drift. All four heuristics
/// must hold.
pub fn analyze_pattern(
    field_history: &SampleHistory,
    accel_history: &SampleHistory,
    last: Vector3,
    current: Vector3,
    baseline: Vector3,
    click_threshold: f32,
    cfg: &PatternConfig,
) -> PatternAssessment {
    let axis = select_axis(field_history, cfg.axis);
    let field_recent = field_history.recent(TREND_WINDOW);
    let accel_recent = accel_history.recent(ACCEL_WINDOW);

    if field_recent.len() < TREND_WINDOW || accel_recent.len() < MIN_ACCEL_SAMPLES {
        return PatternAssessment {
            accepted: false,
            passed_mask: 0,
            reason: RejectReason::InsufficientHistory,
            axis,
        };
    }

    let checks = [
        (
            CHECK_TREND,
            RejectReason::NoDirectionalTrend,
            directional_trend(&field_recent, axis, click_threshold, cfg),
        ),
        (
            CHECK_MOVEMENT,
            RejectReason::DeviceStationary,
            accel_magnitude_jump(&accel_recent) > cfg.accel_jerk_min,
        ),
        (
            CHECK_DOMINANCE,
            RejectReason::AxisNotDominant,
            axis_dominance(&field_recent, last, current, axis, click_threshold, cfg),
        ),
        (
            CHECK_BASELINE,
            RejectReason::BaselineInsignificant,
            baseline_significance(current, baseline, axis, click_threshold, cfg),
        ),
    ];

    let mut passed_mask = 0u8;
    let mut reason = RejectReason::None;
    for (bit, failure, passed) in checks {
        if passed {
            passed_mask |= bit;
        } else if reason == RejectReason::None {
            reason = failure;
        }
    }

    PatternAssessment {
        accepted: passed_mask == CHECK_ALL,
        passed_mask,
        reason,
        axis,
    }
}

#[cfg(test)]
mod tests;
