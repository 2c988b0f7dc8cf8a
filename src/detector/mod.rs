pub mod baseline;
pub mod config;
pub mod delta;
pub mod error;
pub mod gesture_hsm;
pub mod history;
pub mod pattern;
pub mod trace;
pub mod types;

pub use config::{
    default_config, AxisSelection, DetectorConfig, GestureThresholds, PatternConfig,
    PullDirection,
};
pub use error::DetectorError;
pub use gesture_hsm::{EngineOutput, PullDetector};
pub use history::{SampleHistory, HISTORY_CAPACITY};
pub use trace::DetectorTraceSample;
pub use types::{
    Axis, DetectorStateId, GestureEvent, GestureKind, RejectReason, SensorChannel, SensorFrame,
    Vector3,
};
