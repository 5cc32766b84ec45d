use std::fmt;

/// Errors surfaced by the event pump and the C API layer.
///
/// The tracker core itself is infallible by contract: every sample is
/// accepted and produces a deterministic emission.
#[derive(Debug, thiserror::Error)]
pub enum MotionError {
    #[error("Event pump thread failed to start: {0}")]
    PumpStart(String),

    #[error("Event pump stopped")]
    PumpStopped,

    #[error("Invalid argument: {0}")]
    InvalidArgument(&'static str),
}

/// Thread-safe last-error storage for the C FFI layer.
pub(crate) struct LastError {
    message: std::sync::Mutex<String>,
}

impl LastError {
    pub const fn new() -> Self {
        Self {
            message: std::sync::Mutex::new(String::new()),
        }
    }

    pub fn set(&self, err: &MotionError) {
        if let Ok(mut msg) = self.message.lock() {
            *msg = fmt::format(format_args!("{}\0", err));
        }
    }

    pub fn as_ptr(&self) -> *const std::ffi::c_char {
        match self.message.lock() {
            Ok(msg) if !msg.is_empty() => msg.as_ptr() as *const std::ffi::c_char,
            _ => std::ptr::null(),
        }
    }
}
