use serde::{Deserialize, Serialize};

use super::{error::DetectorError, history::HISTORY_CAPACITY, types::Axis};

/// Trigger levels and timing supplied by the host.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GestureThresholds {
    /// Instant delta required to consider a short click.
    pub click_threshold: f32,
    /// Instant delta that must be held for a long click.
    pub long_click_threshold: f32,
    /// Minimum time between two accepted short clicks.
    pub cooldown_ms: u64,
    /// Continuous time above `long_click_threshold` before a long click.
    pub long_hold_ms: u64,
}

impl GestureThresholds {
    pub fn validate(&self) -> Result<(), DetectorError> {
        for (name, value) in [
            ("click_threshold", self.click_threshold),
            ("long_click_threshold", self.long_click_threshold),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(DetectorError::InvalidThreshold { name, value });
            }
        }
        if self.long_click_threshold < self.click_threshold {
            return Err(DetectorError::ThresholdOrder {
                click: self.click_threshold,
                long_click: self.long_click_threshold,
            });
        }
        if self.long_hold_ms == 0 {
            return Err(DetectorError::ZeroDuration {
                name: "long_hold_ms",
            });
        }
        Ok(())
    }
}

/// Which field axis the pattern heuristics treat as the pull axis.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(from = "AxisSetting", into = "AxisSetting")]
pub enum AxisSelection {
    /// Axis fixed by the host calibration profile.
    Fixed(Axis),
    /// Axis with the largest variance over the field history.
    HighestVariance,
}

impl Default for AxisSelection {
    fn default() -> Self {
        Self::Fixed(Axis::X)
    }
}

// Flat spelling used by `config/detector.toml`: "x", "y", "z" or "highest_variance".
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
enum AxisSetting {
    X,
    Y,
    Z,
    HighestVariance,
}

impl From<AxisSetting> for AxisSelection {
    fn from(value: AxisSetting) -> Self {
        match value {
            AxisSetting::X => Self::Fixed(Axis::X),
            AxisSetting::Y => Self::Fixed(Axis::Y),
            AxisSetting::Z => Self::Fixed(Axis::Z),
            AxisSetting::HighestVariance => Self::HighestVariance,
        }
    }
}

impl From<AxisSelection> for AxisSetting {
    fn from(value: AxisSelection) -> Self {
        match value {
            AxisSelection::Fixed(Axis::X) => Self::X,
            AxisSelection::Fixed(Axis::Y) => Self::Y,
            AxisSelection::Fixed(Axis::Z) => Self::Z,
            AxisSelection::HighestVariance => Self::HighestVariance,
        }
    }
}

/// Sign of the primary-axis change produced by pulling the magnet closer.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PullDirection {
    #[default]
    Negative,
    Positive,
}

impl PullDirection {
    /// Projects a raw axis change onto the pull direction: positive means
    /// the field moved the way a pull moves it.
    pub fn along(self, delta: f32) -> f32 {
        match self {
            PullDirection::Negative => -delta,
            PullDirection::Positive => delta,
        }
    }
}

/// Heuristic multipliers for the pattern analyzer. Ratios scale the click
/// threshold; `direction_margin` and `accel_jerk_min` are absolute sensor
/// units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PatternConfig {
    pub axis: AxisSelection,
    pub pull_direction: PullDirection,
    pub trend_step_ratio: f32,
    pub dominance_ratio: f32,
    pub axis_delta_ratio: f32,
    pub direction_margin: f32,
    pub quick_change_ratio: f32,
    pub baseline_ratio: f32,
    pub accel_jerk_min: f32,
}

impl PatternConfig {
    pub fn validate(&self) -> Result<(), DetectorError> {
        for (name, value) in [
            ("trend_step_ratio", self.trend_step_ratio),
            ("dominance_ratio", self.dominance_ratio),
            ("axis_delta_ratio", self.axis_delta_ratio),
            ("direction_margin", self.direction_margin),
            ("quick_change_ratio", self.quick_change_ratio),
            ("baseline_ratio", self.baseline_ratio),
            ("accel_jerk_min", self.accel_jerk_min),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(DetectorError::InvalidTunable { name, value });
            }
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetectorConfig {
    pub thresholds: GestureThresholds,
    pub pattern: PatternConfig,
    /// Debounce window after any emitted gesture.
    pub settle_ms: u64,
    /// History length required before the baseline is computed.
    pub baseline_min_samples: usize,
}

impl DetectorConfig {
    pub fn validate(&self) -> Result<(), DetectorError> {
        self.thresholds.validate()?;
        self.pattern.validate()?;
        if self.settle_ms == 0 {
            return Err(DetectorError::ZeroDuration { name: "settle_ms" });
        }
        if self.baseline_min_samples == 0 || self.baseline_min_samples > HISTORY_CAPACITY {
            return Err(DetectorError::BaselineWindow {
                value: self.baseline_min_samples,
                max: HISTORY_CAPACITY,
            });
        }
        Ok(())
    }
}

impl Default for DetectorConfig {
    fn default() -> Self {
        DETECTOR_CONFIG
    }
}

include!(concat!(env!("OUT_DIR"), "/detector_config.rs"));

pub fn default_config() -> DetectorConfig {
    DETECTOR_CONFIG
}
