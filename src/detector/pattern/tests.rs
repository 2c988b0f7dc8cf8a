use super::super::config::default_config;
use super::*;

const CLICK: f32 = 80.0;
const REST: Vector3 = Vector3::new(-338.0, 0.0, 0.0);
const PULLED: Vector3 = Vector3::new(-449.0, 0.0, 0.0);

fn field_history(tail: Vector3) -> SampleHistory {
    let mut history = SampleHistory::new();
    for _ in 0..5 {
        history.push(REST);
    }
    history.push(tail);
    history
}

fn accel_history(magnitudes: &[f32]) -> SampleHistory {
    let mut history = SampleHistory::new();
    for m in magnitudes {
        history.push(Vector3::new(0.0, 0.0, *m));
    }
    history
}

fn cfg() -> PatternConfig {
    default_config().pattern
}

#[test]
fn deliberate_pull_passes_every_heuristic() {
    let decision = analyze_pattern(
        &field_history(PULLED),
        &accel_history(&[9.8, 9.8, 11.8]),
        REST,
        PULLED,
        REST,
        CLICK,
        &cfg(),
    );
    assert!(decision.accepted);
    assert_eq!(decision.passed_mask, CHECK_ALL);
    assert_eq!(decision.reason, RejectReason::None);
    assert_eq!(decision.axis, Axis::X);
}

#[test]
fn stationary_device_is_rejected() {
    let decision = analyze_pattern(
        &field_history(PULLED),
        &accel_history(&[9.8, 9.8, 9.8]),
        REST,
        PULLED,
        REST,
        CLICK,
        &cfg(),
    );
    assert!(!decision.accepted);
    assert_eq!(decision.reason, RejectReason::DeviceStationary);
    assert_eq!(decision.passed_mask, CHECK_ALL & !CHECK_MOVEMENT);
}

#[test]
fn movement_against_pull_direction_is_rejected() {
    let away = Vector3::new(-227.0, 0.0, 0.0);
    let decision = analyze_pattern(
        &field_history(away),
        &accel_history(&[9.8, 9.8, 11.8]),
        REST,
        away,
        REST,
        CLICK,
        &cfg(),
    );
    assert!(!decision.accepted);
    assert_eq!(decision.reason, RejectReason::NoDirectionalTrend);
    assert_eq!(decision.passed_mask & CHECK_DOMINANCE, 0);
}

#[test]
fn off_axis_change_is_rejected() {
    let skewed = Vector3::new(-449.0, 150.0, 0.0);
    let decision = analyze_pattern(
        &field_history(skewed),
        &accel_history(&[9.8, 9.8, 11.8]),
        REST,
        skewed,
        REST,
        CLICK,
        &cfg(),
    );
    assert!(!decision.accepted);
    assert_eq!(decision.reason, RejectReason::AxisNotDominant);
}

#[test]
fn change_close_to_baseline_is_rejected() {
    let drifted_baseline = Vector3::new(-420.0, 0.0, 0.0);
    let decision = analyze_pattern(
        &field_history(PULLED),
        &accel_history(&[9.8, 9.8, 11.8]),
        REST,
        PULLED,
        drifted_baseline,
        CLICK,
        &cfg(),
    );
    assert!(!decision.accepted);
    assert_eq!(decision.reason, RejectReason::BaselineInsignificant);
}

#[test]
fn short_history_suppresses_analysis() {
    let mut field = SampleHistory::new();
    field.push(REST);
    field.push(PULLED);
    let decision = analyze_pattern(
        &field,
        &accel_history(&[9.8, 11.8]),
        REST,
        PULLED,
        REST,
        CLICK,
        &cfg(),
    );
    assert!(!decision.accepted);
    assert_eq!(decision.reason, RejectReason::InsufficientHistory);

    let decision = analyze_pattern(
        &field_history(PULLED),
        &accel_history(&[11.8]),
        REST,
        PULLED,
        REST,
        CLICK,
        &cfg(),
    );
    assert_eq!(decision.reason, RejectReason::InsufficientHistory);
}

#[test]
fn highest_variance_selection_follows_the_noisy_axis() {
    let mut history = SampleHistory::new();
    for z in [10.0, -40.0, 35.0, -20.0] {
        history.push(Vector3::new(-338.0, 1.0, z));
    }
    assert_eq!(select_axis(&history, AxisSelection::HighestVariance), Axis::Z);
    assert_eq!(select_axis(&history, AxisSelection::Fixed(Axis::Y)), Axis::Y);
    assert_eq!(
        select_axis(&SampleHistory::new(), AxisSelection::HighestVariance),
        Axis::X
    );
}

#[test]
fn accel_jump_is_largest_consecutive_magnitude_change() {
    let samples = [
        Vector3::new(0.0, 0.0, 9.8),
        Vector3::new(3.0, 4.0, 0.0),
        Vector3::new(0.0, 0.0, 5.5),
    ];
    let jump = accel_magnitude_jump(&samples);
    assert!((jump - 4.8).abs() < 1e-4);
}
