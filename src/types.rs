/// Unit rotation quaternion, scalar-first.
///
/// The engine-facing convention everywhere in this crate is `(w, x, y, z)`.
/// Operations on quaternions are value-semantic; see [`crate::math`].
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quaternion {
    pub w: f32,
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Quaternion {
    /// The identity rotation `(1, 0, 0, 0)`.
    pub const IDENTITY: Quaternion = Quaternion {
        w: 1.0,
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub const fn new(w: f32, x: f32, y: f32, z: f32) -> Self {
        Self { w, x, y, z }
    }

    /// Euclidean norm of all four components.
    pub fn norm(&self) -> f32 {
        (self.w * self.w + self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

/// Physical orientation of the display relative to its natural orientation,
/// in quarter turns. Read from the host at tracker construction and again on
/// every gyroscope emission.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayRotation {
    Deg0 = 0,
    Deg90 = 1,
    Deg180 = 2,
    Deg270 = 3,
}

impl DisplayRotation {
    /// Map a quarter-turn count (0..=3) to a rotation. Anything else is an
    /// unknown host value and yields `None`; callers treat that as
    /// "no compensation".
    pub fn from_quarter_turns(turns: i32) -> Option<DisplayRotation> {
        match turns {
            0 => Some(DisplayRotation::Deg0),
            1 => Some(DisplayRotation::Deg90),
            2 => Some(DisplayRotation::Deg180),
            3 => Some(DisplayRotation::Deg270),
            _ => None,
        }
    }
}

/// One sample from a physical sensor, tagged by source.
///
/// Gyroscope samples carry the host timestamp because consecutive-sample
/// deltas drive the integration step; the other two streams are stateless
/// per sample.
#[derive(Debug, Clone, Copy)]
pub enum SensorSample {
    /// Raw accelerometer reading in m/s².
    Accelerometer([f32; 3]),
    /// Dedicated gravity virtual-sensor reading in m/s².
    Gravity([f32; 3]),
    /// Angular velocity in rad/s plus the sample timestamp in nanoseconds.
    Gyroscope { rate: [f32; 3], timestamp_ns: u64 },
}

impl SensorSample {
    /// The registration bit for this sample's source sensor.
    pub fn kind(&self) -> SensorKinds {
        match self {
            SensorSample::Accelerometer(_) => SensorKinds::ACCELEROMETER,
            SensorSample::Gravity(_) => SensorKinds::GRAVITY,
            SensorSample::Gyroscope { .. } => SensorKinds::GYROSCOPE,
        }
    }
}

/// Phase of a touch event. Down and Move both report as pressed to the
/// engine; Up releases.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchPhase {
    Down = 0,
    Move = 1,
    Up = 2,
}

/// A host input event: either a sensor sample or a touch.
#[derive(Debug, Clone, Copy)]
pub enum InputEvent {
    Sensor(SensorSample),
    Touch { x: f32, y: f32, phase: TouchPhase },
}

bitflags::bitflags! {
    /// Bitmap of sensor streams the dispatcher currently accepts.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    #[repr(C)]
    pub struct SensorKinds: u32 {
        const ACCELEROMETER = 1 << 0;
        const GRAVITY       = 1 << 1;
        const GYROSCOPE     = 1 << 2;
    }
}
