//! # echo-motion - Orientation tracking and input bridge for native engine hosts
//!
//! Converts the host platform's raw sensor streams (accelerometer, gravity,
//! gyroscope) and touch events into the motion stream a native game engine
//! consumes. Provides:
//! - A gravity low-pass / linear-acceleration high-pass filter
//! - Gyroscope integration into a display-rotation-compensated orientation
//!   quaternion, one emission per gyroscope sample
//! - Touch pass-through and pause/resume gating of sensor delivery
//! - A C FFI surface for embedding in C/C++/JNI hosts
//!
//! ## Quick Start
//! ```
//! use echo_motion::{DisplayRotation, InputDispatcher, InputEvent, MotionSink, SensorSample};
//!
//! struct PrintSink;
//!
//! impl MotionSink for PrintSink {
//!     fn set_linear_acceleration(&mut self, x: f32, y: f32, z: f32) {
//!         println!("linear: ({x}, {y}, {z})");
//!     }
//!     fn set_gravity(&mut self, x: f32, y: f32, z: f32) {
//!         println!("gravity: ({x}, {y}, {z})");
//!     }
//!     fn set_gyroscope(&mut self, w: f32, x: f32, y: f32, z: f32) {
//!         println!("orientation: ({w}, {x}, {y}, {z})");
//!     }
//!     fn set_mouse(&mut self, x: f32, y: f32, pressed: i32) {
//!         println!("mouse: ({x}, {y}) pressed={pressed}");
//!     }
//! }
//!
//! let mut dispatcher = InputDispatcher::new(DisplayRotation::Deg0, PrintSink);
//! dispatcher.dispatch(InputEvent::Sensor(SensorSample::Gyroscope {
//!     rate: [0.0, 0.0, 0.0],
//!     timestamp_ns: 1,
//! }));
//! ```

pub mod error;
pub mod types;
pub mod math;
pub mod tracker;
pub mod dispatch;
pub mod pump;
pub mod ffi;

pub use dispatch::InputDispatcher;
pub use error::MotionError;
pub use pump::EventPump;
pub use tracker::{MotionSink, OrientationTracker, RotationSource};
pub use types::*;

/// Result type alias for echo-motion operations.
pub type Result<T> = std::result::Result<T, MotionError>;
