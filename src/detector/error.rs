use thiserror::Error;

#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum DetectorError {
    #[error("calibration requested before any magnetic-field sample")]
    NoSampleYet,
    #[error("{name} must be finite and positive, got {value}")]
    InvalidThreshold { name: &'static str, value: f32 },
    #[error("long click threshold {long_click} is below click threshold {click}")]
    ThresholdOrder { click: f32, long_click: f32 },
    #[error("{name} must be > 0")]
    ZeroDuration { name: &'static str },
    #[error("pattern tunable {name} must be finite and non-negative, got {value}")]
    InvalidTunable { name: &'static str, value: f32 },
    #[error("baseline_min_samples must be within 1..={max}, got {value}")]
    BaselineWindow { value: usize, max: usize },
}
