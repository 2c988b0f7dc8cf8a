use serde::Serialize;

use super::types::{Axis, DetectorStateId, GestureKind, RejectReason};

/// Diagnostics for the most recent magnetic-field evaluation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct DetectorTraceSample {
    pub now_ms: u64,
    pub state_id: DetectorStateId,
    pub reject_reason: RejectReason,
    pub instant_delta: f32,
    /// Zero while no baseline exists.
    pub baseline_delta: f32,
    pub baseline_set: bool,
    pub pattern_mask: u8,
    pub axis: Axis,
    pub cooldown_active: bool,
    /// Time the signal has continuously stayed above the long threshold.
    pub long_hold_ms: u64,
    pub gesture: Option<GestureKind>,
}
