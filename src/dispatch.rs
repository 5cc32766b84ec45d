use crate::tracker::{MotionSink, OrientationTracker, RotationSource};
use crate::types::{InputEvent, SensorKinds, SensorSample, TouchPhase};

/// Routes host input events to the orientation tracker and the sink.
///
/// Sensor samples go through the tracker; touch events are a direct
/// coordinate pass-through. Every delivered event produces at most one
/// emission — no buffering, no coalescing.
///
/// `pause` mirrors the host dropping its sensor registrations: sensor
/// samples are discarded while paused, but tracker state is untouched, so
/// integration resumes from the last-seen orientation and timestamp.
/// Touch delivery is independent of sensor registration and is never gated.
pub struct InputDispatcher<R, S> {
    tracker: OrientationTracker<R>,
    sink: S,
    active: SensorKinds,
}

impl<R: RotationSource, S: MotionSink> InputDispatcher<R, S> {
    /// Build a dispatcher with all three sensor streams active.
    pub fn new(rotation_source: R, sink: S) -> Self {
        Self {
            tracker: OrientationTracker::new(rotation_source),
            sink,
            active: SensorKinds::all(),
        }
    }

    /// Deliver one event.
    pub fn dispatch(&mut self, event: InputEvent) {
        match event {
            InputEvent::Sensor(sample) => {
                if !self.active.contains(sample.kind()) {
                    log::trace!("dropping {:?} sample while inactive", sample.kind());
                    return;
                }
                match sample {
                    SensorSample::Accelerometer(raw) => {
                        self.tracker.handle_accelerometer(raw, &mut self.sink)
                    }
                    SensorSample::Gravity(raw) => self.tracker.handle_gravity(raw, &mut self.sink),
                    SensorSample::Gyroscope { rate, timestamp_ns } => {
                        self.tracker.handle_gyroscope(rate, timestamp_ns, &mut self.sink)
                    }
                }
            }
            InputEvent::Touch { x, y, phase } => {
                let pressed = match phase {
                    TouchPhase::Down | TouchPhase::Move => 1,
                    TouchPhase::Up => 0,
                };
                self.sink.set_mouse(x, y, pressed);
            }
        }
    }

    /// Stop accepting sensor samples. Tracker state is preserved.
    pub fn pause(&mut self) {
        log::debug!("sensor delivery paused");
        self.active = SensorKinds::empty();
    }

    /// Re-enable all sensor streams.
    pub fn resume(&mut self) {
        log::debug!("sensor delivery resumed");
        self.active = SensorKinds::all();
    }

    /// The sensor streams currently being accepted.
    pub fn active_sensors(&self) -> SensorKinds {
        self.active
    }

    /// Access the underlying tracker.
    pub fn tracker(&self) -> &OrientationTracker<R> {
        &self.tracker
    }

    /// Access the sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }
}
