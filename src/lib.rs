//! Magnetometer pull-gesture detection.
//!
//! [`PullDetector`] consumes magnetic-field and acceleration samples and
//! emits [`GestureKind::ShortClick`] when a headset magnet is pulled toward
//! the device, or [`GestureKind::LongClick`] when the pull is held. Sensor
//! ownership, tap execution and settings persistence stay with the host.
//!
//! ```
//! use magpull::{PullDetector, Vector3};
//!
//! let mut detector = PullDetector::default();
//! for i in 0..5 {
//!     detector.on_field(i * 10, Vector3::new(-338.0, 0.0, 0.0));
//! }
//! assert!(detector.is_baseline_set());
//! ```

pub mod detector;

pub use detector::{
    default_config, AxisSelection, DetectorConfig, DetectorError, DetectorStateId,
    DetectorTraceSample, EngineOutput, GestureEvent, GestureKind, GestureThresholds,
    PatternConfig, PullDetector, PullDirection, RejectReason, SensorChannel, SensorFrame,
    Vector3,
};
