//! C FFI layer for echo-motion.
//!
//! Provides an opaque handle-based API for native engine hosts. The host
//! supplies a callback table for the four emission entry points and a
//! display-rotation query callback; events are pushed through the handle.
//! The generated C header is written to `include/echo_motion.h` by cbindgen.

use crate::dispatch::InputDispatcher;
use crate::error::LastError;
use crate::tracker::{MotionSink, RotationSource};
use crate::types::{DisplayRotation, InputEvent, SensorSample, TouchPhase};
use crate::MotionError;
use std::ffi::{c_char, c_int, c_void};

/// Last error message for C consumers.
static LAST_ERROR: LastError = LastError::new();

/// Host callback returning the current display rotation in quarter turns
/// (0..=3). Values outside that range are treated as "no compensation".
pub type EmtRotationFn = extern "C" fn(user_data: *mut c_void) -> c_int;

/// Emission callback table. Null entries are skipped.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct EmtSinkTable {
    /// Opaque pointer passed back to every callback.
    pub user_data: *mut c_void,
    pub set_linear_acceleration:
        Option<extern "C" fn(user_data: *mut c_void, x: f32, y: f32, z: f32)>,
    pub set_gravity: Option<extern "C" fn(user_data: *mut c_void, x: f32, y: f32, z: f32)>,
    pub set_gyroscope:
        Option<extern "C" fn(user_data: *mut c_void, w: f32, x: f32, y: f32, z: f32)>,
    pub set_mouse: Option<extern "C" fn(user_data: *mut c_void, x: f32, y: f32, pressed: c_int)>,
}

struct CallbackSink(EmtSinkTable);

impl MotionSink for CallbackSink {
    fn set_linear_acceleration(&mut self, x: f32, y: f32, z: f32) {
        if let Some(f) = self.0.set_linear_acceleration {
            f(self.0.user_data, x, y, z);
        }
    }
    fn set_gravity(&mut self, x: f32, y: f32, z: f32) {
        if let Some(f) = self.0.set_gravity {
            f(self.0.user_data, x, y, z);
        }
    }
    fn set_gyroscope(&mut self, w: f32, x: f32, y: f32, z: f32) {
        if let Some(f) = self.0.set_gyroscope {
            f(self.0.user_data, w, x, y, z);
        }
    }
    fn set_mouse(&mut self, x: f32, y: f32, pressed: i32) {
        if let Some(f) = self.0.set_mouse {
            f(self.0.user_data, x, y, pressed as c_int);
        }
    }
}

struct CallbackRotation {
    callback: Option<EmtRotationFn>,
    user_data: *mut c_void,
}

impl RotationSource for CallbackRotation {
    fn display_rotation(&self) -> DisplayRotation {
        let turns = match self.callback {
            Some(f) => f(self.user_data),
            None => 0,
        };
        match DisplayRotation::from_quarter_turns(turns) {
            Some(rotation) => rotation,
            None => {
                log::warn!("host reported unknown display rotation {}, using 0°", turns);
                DisplayRotation::Deg0
            }
        }
    }
}

/// Opaque tracker handle for C consumers.
pub struct EmtTracker(InputDispatcher<CallbackRotation, CallbackSink>);

/// Create a tracker.
///
/// `rotation` may be null; the tracker then assumes the natural display
/// orientation. Returns NULL if `sink` is null (check emt_last_error()).
///
/// # Safety
/// `sink` must point to a valid `EmtSinkTable`, or be null. The callbacks
/// and `user_data` pointers must stay valid for the tracker's lifetime.
#[no_mangle]
pub unsafe extern "C" fn emt_tracker_new(
    sink: *const EmtSinkTable,
    rotation: Option<EmtRotationFn>,
    rotation_user_data: *mut c_void,
) -> *mut EmtTracker {
    if sink.is_null() {
        LAST_ERROR.set(&MotionError::InvalidArgument("sink table is null"));
        return std::ptr::null_mut();
    }

    let rotation_source = CallbackRotation {
        callback: rotation,
        user_data: rotation_user_data,
    };
    let dispatcher = InputDispatcher::new(rotation_source, CallbackSink(*sink));
    Box::into_raw(Box::new(EmtTracker(dispatcher)))
}

/// Destroy a tracker and free its resources.
///
/// # Safety
/// `tracker` must be a pointer returned by `emt_tracker_new`, or null.
#[no_mangle]
pub unsafe extern "C" fn emt_tracker_free(tracker: *mut EmtTracker) {
    if !tracker.is_null() {
        drop(Box::from_raw(tracker));
    }
}

/// Push a raw accelerometer sample (m/s²).
///
/// # Safety
/// `tracker` must be a valid tracker pointer, or null.
#[no_mangle]
pub unsafe extern "C" fn emt_tracker_accelerometer(
    tracker: *mut EmtTracker,
    x: f32,
    y: f32,
    z: f32,
) {
    if let Some(tracker) = tracker.as_mut() {
        tracker
            .0
            .dispatch(InputEvent::Sensor(SensorSample::Accelerometer([x, y, z])));
    }
}

/// Push a gravity virtual-sensor sample (m/s²).
///
/// # Safety
/// `tracker` must be a valid tracker pointer, or null.
#[no_mangle]
pub unsafe extern "C" fn emt_tracker_gravity(tracker: *mut EmtTracker, x: f32, y: f32, z: f32) {
    if let Some(tracker) = tracker.as_mut() {
        tracker
            .0
            .dispatch(InputEvent::Sensor(SensorSample::Gravity([x, y, z])));
    }
}

/// Push a gyroscope sample: angular velocity (rad/s) plus the sample
/// timestamp in nanoseconds.
///
/// # Safety
/// `tracker` must be a valid tracker pointer, or null.
#[no_mangle]
pub unsafe extern "C" fn emt_tracker_gyroscope(
    tracker: *mut EmtTracker,
    x: f32,
    y: f32,
    z: f32,
    timestamp_ns: u64,
) {
    if let Some(tracker) = tracker.as_mut() {
        tracker.0.dispatch(InputEvent::Sensor(SensorSample::Gyroscope {
            rate: [x, y, z],
            timestamp_ns,
        }));
    }
}

/// Push a touch event. `phase`: 0 = down, 1 = move, 2 = up.
/// Returns 0 on success, -1 on an unknown phase.
///
/// # Safety
/// `tracker` must be a valid tracker pointer, or null.
#[no_mangle]
pub unsafe extern "C" fn emt_tracker_touch(
    tracker: *mut EmtTracker,
    x: f32,
    y: f32,
    phase: c_int,
) -> c_int {
    let phase = match phase {
        0 => TouchPhase::Down,
        1 => TouchPhase::Move,
        2 => TouchPhase::Up,
        _ => {
            LAST_ERROR.set(&MotionError::InvalidArgument("unknown touch phase"));
            return -1;
        }
    };
    if let Some(tracker) = tracker.as_mut() {
        tracker.0.dispatch(InputEvent::Touch { x, y, phase });
    }
    0
}

/// Stop accepting sensor samples. Tracker state is preserved.
///
/// # Safety
/// `tracker` must be a valid tracker pointer, or null.
#[no_mangle]
pub unsafe extern "C" fn emt_tracker_pause(tracker: *mut EmtTracker) {
    if let Some(tracker) = tracker.as_mut() {
        tracker.0.pause();
    }
}

/// Re-enable sensor delivery after a pause.
///
/// # Safety
/// `tracker` must be a valid tracker pointer, or null.
#[no_mangle]
pub unsafe extern "C" fn emt_tracker_resume(tracker: *mut EmtTracker) {
    if let Some(tracker) = tracker.as_mut() {
        tracker.0.resume();
    }
}

/// Get the last error message. Returns NULL if no error.
/// The returned pointer is valid until the next echo-motion API call.
#[no_mangle]
pub extern "C" fn emt_last_error() -> *const c_char {
    LAST_ERROR.as_ptr()
}
