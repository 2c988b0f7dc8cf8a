use core::ops::Sub;

use serde::{Deserialize, Serialize};

/// One magnetic-field or acceleration reading.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    pub fn magnitude(self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    pub fn distance(self, other: Self) -> f32 {
        (self - other).magnitude()
    }

    pub fn axis(self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    /// Absolute per-axis change split into the chosen axis and the sum of
    /// the other two.
    pub fn axis_split(self, other: Self, axis: Axis) -> (f32, f32) {
        let d = self - other;
        let (ax, ay, az) = (d.x.abs(), d.y.abs(), d.z.abs());
        match axis {
            Axis::X => (ax, ay + az),
            Axis::Y => (ay, ax + az),
            Axis::Z => (az, ax + ay),
        }
    }
}

impl Sub for Vector3 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    #[default]
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorChannel {
    MagneticField,
    Acceleration,
}

/// A sample as delivered by the host, stamped with its monotonic clock.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SensorFrame {
    pub now_ms: u64,
    pub channel: SensorChannel,
    pub sample: Vector3,
}

impl SensorFrame {
    pub const fn field(now_ms: u64, sample: Vector3) -> Self {
        Self {
            now_ms,
            channel: SensorChannel::MagneticField,
            sample,
        }
    }

    pub const fn acceleration(now_ms: u64, sample: Vector3) -> Self {
        Self {
            now_ms,
            channel: SensorChannel::Acceleration,
            sample,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureKind {
    ShortClick,
    LongClick,
}

impl GestureKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            GestureKind::ShortClick => "short_click",
            GestureKind::LongClick => "long_click",
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GestureEvent {
    pub kind: GestureKind,
    pub at_ms: u64,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum RejectReason {
    #[default]
    None = 0,
    Bootstrap = 1,
    BelowThreshold = 2,
    BaselineUnset = 3,
    BaselineDeltaLow = 4,
    GestureInProgress = 5,
    CooldownActive = 6,
    InsufficientHistory = 7,
    NoDirectionalTrend = 8,
    DeviceStationary = 9,
    AxisNotDominant = 10,
    BaselineInsignificant = 11,
    NonFiniteSample = 12,
}

impl RejectReason {
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum DetectorStateId {
    #[default]
    Idle = 0,
    GestureInProgress = 1,
}

impl DetectorStateId {
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}
