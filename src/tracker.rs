use crate::math;
use crate::types::{DisplayRotation, Quaternion};

/// Smoothing factor for the gravity low-pass filter:
/// `g = ALPHA * g + (1 - ALPHA) * raw`.
pub const GRAVITY_ALPHA: f32 = 0.8;

/// Angular speeds below this (rad/s) leave the rotation axis unnormalized.
/// The sine of the resulting half-angle is vanishingly small, so the delta
/// rotation degenerates to identity either way.
pub const OMEGA_EPSILON: f32 = 0.005;

/// Nanoseconds to seconds.
pub const NS_TO_S: f32 = 1.0e-9;

/// Consumer of the tracker's output stream.
///
/// Mirrors the native engine's ingestion surface: four fire-and-forget
/// setters, no return values, no backpressure.
pub trait MotionSink {
    fn set_linear_acceleration(&mut self, x: f32, y: f32, z: f32);
    fn set_gravity(&mut self, x: f32, y: f32, z: f32);
    fn set_gyroscope(&mut self, w: f32, x: f32, y: f32, z: f32);
    fn set_mouse(&mut self, x: f32, y: f32, pressed: i32);
}

/// Host query for the current display rotation.
pub trait RotationSource {
    fn display_rotation(&self) -> DisplayRotation;
}

/// A fixed rotation is a valid source for hosts that never rotate.
impl RotationSource for DisplayRotation {
    fn display_rotation(&self) -> DisplayRotation {
        *self
    }
}

/// Converts raw accelerometer, gravity, and gyroscope samples into the
/// engine-facing motion stream.
///
/// Accelerometer samples feed a low-pass gravity estimate whose complement
/// is emitted as linear acceleration. Gyroscope samples are integrated into
/// a running orientation quaternion, compensated for the host's current
/// display rotation before each emission. The dedicated gravity stream is
/// passed through untouched.
///
/// Single-threaded by contract: the host delivers all callbacks on one
/// event-dispatch thread and the tracker does no locking of its own.
pub struct OrientationTracker<R> {
    rotation_source: R,
    /// Low-pass gravity estimate in the accelerometer frame.
    gravity: [f32; 3],
    /// Orientation relative to the orientation at construction time,
    /// pre-rolled into the display's rotated frame.
    rotation_current: Quaternion,
    /// Timestamp of the last gyroscope sample, in nanoseconds.
    /// Zero means no sample has been seen yet.
    last_timestamp_ns: u64,
}

impl<R: RotationSource> OrientationTracker<R> {
    /// Create a tracker, pre-rolling the orientation into the frame of the
    /// display rotation reported at construction.
    pub fn new(rotation_source: R) -> Self {
        let rotation_current = match boot_roll(rotation_source.display_rotation()) {
            Some(angle) => math::roll_by_angle(Quaternion::IDENTITY, angle),
            None => Quaternion::IDENTITY,
        };

        Self {
            rotation_source,
            gravity: [0.0; 3],
            rotation_current,
            last_timestamp_ns: 0,
        }
    }

    /// The accumulated orientation, without display-rotation compensation.
    pub fn orientation(&self) -> Quaternion {
        self.rotation_current
    }

    /// Whether a gyroscope timestamp has been seeded yet.
    pub fn is_tracking(&self) -> bool {
        self.last_timestamp_ns != 0
    }

    /// Low-pass the gravity estimate and emit the high-pass remainder as
    /// linear acceleration. Every sample produces exactly one emission.
    pub fn handle_accelerometer(&mut self, raw: [f32; 3], sink: &mut impl MotionSink) {
        for axis in 0..3 {
            self.gravity[axis] =
                GRAVITY_ALPHA * self.gravity[axis] + (1.0 - GRAVITY_ALPHA) * raw[axis];
        }

        sink.set_linear_acceleration(
            raw[0] - self.gravity[0],
            raw[1] - self.gravity[1],
            raw[2] - self.gravity[2],
        );
    }

    /// Forward a dedicated gravity-sensor sample verbatim.
    pub fn handle_gravity(&mut self, raw: [f32; 3], sink: &mut impl MotionSink) {
        sink.set_gravity(raw[0], raw[1], raw[2]);
    }

    /// Integrate one gyroscope sample and emit the compensated orientation.
    ///
    /// The first sample only seeds the timestamp and emits the identity
    /// quaternion. Each later sample converts the angular-velocity vector
    /// into an axis-angle delta over the elapsed time, composes it onto the
    /// accumulated orientation, and emits that orientation rolled by the
    /// current display rotation's compensation angle.
    pub fn handle_gyroscope(&mut self, rate: [f32; 3], timestamp_ns: u64, sink: &mut impl MotionSink) {
        if self.last_timestamp_ns == 0 {
            self.last_timestamp_ns = timestamp_ns;
            log::debug!("gyroscope stream seeded at t={}ns", timestamp_ns);
            sink.set_gyroscope(1.0, 0.0, 0.0, 0.0);
            return;
        }

        let dt = timestamp_ns.wrapping_sub(self.last_timestamp_ns) as f32 * NS_TO_S;

        let [mut axis_x, mut axis_y, mut axis_z] = rate;
        let omega = (axis_x * axis_x + axis_y * axis_y + axis_z * axis_z).sqrt();
        if omega > OMEGA_EPSILON {
            axis_x /= omega;
            axis_y /= omega;
            axis_z /= omega;
        }

        // Axis-angle over the timestep, as a rotation vector [x, y, z, w].
        let theta_over_two = omega * dt / 2.0;
        let (sin_theta, cos_theta) = theta_over_two.sin_cos();
        let delta = math::from_rotation_vector(&[
            sin_theta * axis_x,
            sin_theta * axis_y,
            sin_theta * axis_z,
            cos_theta,
        ]);

        self.rotation_current = math::multiply(self.rotation_current, delta);
        self.last_timestamp_ns = timestamp_ns;

        let emitted = match compensation_roll(self.rotation_source.display_rotation()) {
            Some(angle) => math::roll_by_angle(self.rotation_current, angle),
            None => self.rotation_current,
        };
        sink.set_gyroscope(emitted.w, emitted.x, emitted.y, emitted.z);
    }
}

/// Construction-time pre-roll angle for a display rotation, or `None` for
/// the natural orientation.
///
/// The 270° case rolls by 2π/3 rather than 3π/2. That asymmetry ships in the
/// engine's consumer-facing behavior; changing it would change the emitted
/// frame for existing content, so it is kept and pinned by tests.
fn boot_roll(rotation: DisplayRotation) -> Option<f32> {
    use std::f32::consts::PI;
    match rotation {
        DisplayRotation::Deg0 => None,
        DisplayRotation::Deg90 => Some(PI / 2.0),
        DisplayRotation::Deg180 => Some(PI),
        DisplayRotation::Deg270 => Some(2.0 * PI / 3.0),
    }
}

/// Per-emission compensation angle: same magnitudes as [`boot_roll`],
/// negative sign.
fn compensation_roll(rotation: DisplayRotation) -> Option<f32> {
    boot_roll(rotation).map(|angle| -angle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::f32::consts::PI;
    use std::rc::Rc;

    /// Sink that records every emission for inspection.
    #[derive(Default)]
    struct RecordingSink {
        linear: Vec<[f32; 3]>,
        gravity: Vec<[f32; 3]>,
        gyro: Vec<Quaternion>,
    }

    impl MotionSink for RecordingSink {
        fn set_linear_acceleration(&mut self, x: f32, y: f32, z: f32) {
            self.linear.push([x, y, z]);
        }
        fn set_gravity(&mut self, x: f32, y: f32, z: f32) {
            self.gravity.push([x, y, z]);
        }
        fn set_gyroscope(&mut self, w: f32, x: f32, y: f32, z: f32) {
            self.gyro.push(Quaternion::new(w, x, y, z));
        }
        fn set_mouse(&mut self, _x: f32, _y: f32, _pressed: i32) {}
    }

    /// Rotation source whose value can change mid-session, like a device
    /// being physically rotated.
    #[derive(Clone)]
    struct SharedRotation(Rc<Cell<DisplayRotation>>);

    impl RotationSource for SharedRotation {
        fn display_rotation(&self) -> DisplayRotation {
            self.0.get()
        }
    }

    fn assert_quat_eq(a: Quaternion, b: Quaternion, tol: f32) {
        assert!(
            (a.w - b.w).abs() <= tol
                && (a.x - b.x).abs() <= tol
                && (a.y - b.y).abs() <= tol
                && (a.z - b.z).abs() <= tol,
            "quaternions differ: {:?} vs {:?}",
            a,
            b
        );
    }

    #[test]
    fn test_gravity_filter_converges_to_constant_input() {
        let mut tracker = OrientationTracker::new(DisplayRotation::Deg0);
        let mut sink = RecordingSink::default();

        let raw = [0.3, -9.6, 1.2];
        for _ in 0..200 {
            tracker.handle_accelerometer(raw, &mut sink);
        }

        assert_eq!(sink.linear.len(), 200);
        let last = sink.linear.last().unwrap();
        // Estimate has converged to the input, so the high-pass residual
        // converges to zero.
        for axis in 0..3 {
            assert!((tracker.gravity[axis] - raw[axis]).abs() < 1e-3);
            assert!(last[axis].abs() < 1e-3);
        }
    }

    #[test]
    fn test_gravity_filter_first_sample_weighting() {
        let mut tracker = OrientationTracker::new(DisplayRotation::Deg0);
        let mut sink = RecordingSink::default();

        tracker.handle_accelerometer([10.0, 0.0, 0.0], &mut sink);

        // From a zero estimate, one sample contributes (1 - alpha) of itself.
        assert!((tracker.gravity[0] - 2.0).abs() < 1e-6);
        assert!((sink.linear[0][0] - 8.0).abs() < 1e-6);
    }

    #[test]
    fn test_gravity_passthrough_is_verbatim() {
        let mut tracker = OrientationTracker::new(DisplayRotation::Deg0);
        let mut sink = RecordingSink::default();

        tracker.handle_gravity([0.1, 9.81, -0.2], &mut sink);
        assert_eq!(sink.gravity, vec![[0.1, 9.81, -0.2]]);
    }

    #[test]
    fn test_first_gyro_sample_emits_identity_and_seeds() {
        let mut tracker = OrientationTracker::new(DisplayRotation::Deg0);
        let mut sink = RecordingSink::default();
        assert!(!tracker.is_tracking());

        // Sample values are irrelevant on the first delivery.
        tracker.handle_gyroscope([5.0, -3.0, 7.0], 1_000, &mut sink);

        assert!(tracker.is_tracking());
        assert_eq!(sink.gyro.len(), 1);
        assert_quat_eq(sink.gyro[0], Quaternion::IDENTITY, 0.0);
    }

    #[test]
    fn test_zero_rate_stream_stays_identity() {
        let mut tracker = OrientationTracker::new(DisplayRotation::Deg0);
        let mut sink = RecordingSink::default();

        tracker.handle_gyroscope([0.0; 3], 1_000, &mut sink);
        for step in 1..50u64 {
            tracker.handle_gyroscope([0.0; 3], 1_000 + step * 10_000_000, &mut sink);
        }

        assert_eq!(sink.gyro.len(), 50);
        for q in &sink.gyro {
            assert_quat_eq(*q, Quaternion::IDENTITY, 1e-6);
        }
    }

    #[test]
    fn test_small_angle_yaw_integration() {
        let mut tracker = OrientationTracker::new(DisplayRotation::Deg0);
        let mut sink = RecordingSink::default();

        // Seed, then 0.1 s of 1 rad/s spin about z: θ/2 = 0.05.
        tracker.handle_gyroscope([0.0; 3], 1, &mut sink);
        tracker.handle_gyroscope([0.0, 0.0, 1.0], 1 + 100_000_000, &mut sink);

        let expected = Quaternion::new(0.05f32.cos(), 0.0, 0.0, 0.05f32.sin());
        assert_quat_eq(sink.gyro[1], expected, 1e-5);
    }

    #[test]
    fn test_integration_composes_across_samples() {
        let mut tracker = OrientationTracker::new(DisplayRotation::Deg0);
        let mut sink = RecordingSink::default();

        // Two 0.1 s steps at 1 rad/s about z accumulate the same rotation
        // as one 0.2 s step.
        tracker.handle_gyroscope([0.0; 3], 1, &mut sink);
        tracker.handle_gyroscope([0.0, 0.0, 1.0], 1 + 100_000_000, &mut sink);
        tracker.handle_gyroscope([0.0, 0.0, 1.0], 1 + 200_000_000, &mut sink);

        let expected = Quaternion::new(0.1f32.cos(), 0.0, 0.0, 0.1f32.sin());
        assert_quat_eq(sink.gyro[2], expected, 1e-5);
    }

    #[test]
    fn test_sub_epsilon_rate_skips_axis_normalization() {
        let mut tracker = OrientationTracker::new(DisplayRotation::Deg0);
        let mut sink = RecordingSink::default();

        tracker.handle_gyroscope([0.0; 3], 1, &mut sink);
        tracker.handle_gyroscope([0.001, 0.0, 0.0], 1 + 10_000_000, &mut sink);

        // ω below the gate still produces a finite, near-identity emission.
        let q = sink.gyro[1];
        assert!(!q.w.is_nan());
        assert!((q.w - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_boot_roll_applied_at_construction() {
        let tracker = OrientationTracker::new(DisplayRotation::Deg90);
        let expected = math::roll_by_angle(Quaternion::IDENTITY, PI / 2.0);
        assert_quat_eq(tracker.orientation(), expected, 1e-6);

        let natural = OrientationTracker::new(DisplayRotation::Deg0);
        assert_quat_eq(natural.orientation(), Quaternion::IDENTITY, 0.0);
    }

    #[test]
    fn test_compensation_table_produces_distinct_outputs() {
        let rotation = SharedRotation(Rc::new(Cell::new(DisplayRotation::Deg0)));
        let mut tracker = OrientationTracker::new(rotation.clone());
        let mut sink = RecordingSink::default();

        // Seed, then hold the device still while cycling the display
        // rotation. The accumulated orientation stays identity, so each
        // emission is the bare compensation roll.
        tracker.handle_gyroscope([0.0; 3], 1, &mut sink);
        for (step, value) in [
            DisplayRotation::Deg0,
            DisplayRotation::Deg90,
            DisplayRotation::Deg180,
            DisplayRotation::Deg270,
        ]
        .into_iter()
        .enumerate()
        {
            rotation.0.set(value);
            tracker.handle_gyroscope([0.0; 3], 1 + (step as u64 + 1) * 1_000_000, &mut sink);
        }

        let emitted = &sink.gyro[1..];
        assert_quat_eq(emitted[0], Quaternion::IDENTITY, 1e-6);
        assert_quat_eq(
            emitted[1],
            math::roll_by_angle(Quaternion::IDENTITY, -PI / 2.0),
            1e-6,
        );
        assert_quat_eq(
            emitted[2],
            math::roll_by_angle(Quaternion::IDENTITY, -PI),
            1e-6,
        );
        // 270° compensates by 2π/3, not 3π/2. Pinned behavior; see the
        // boot_roll doc comment.
        assert_quat_eq(
            emitted[3],
            math::roll_by_angle(Quaternion::IDENTITY, -2.0 * PI / 3.0),
            1e-6,
        );
        let three_half_pi = math::roll_by_angle(Quaternion::IDENTITY, -3.0 * PI / 2.0);
        assert!((emitted[3].z - three_half_pi.z).abs() > 0.1);

        // All four outputs are pairwise distinct.
        for i in 0..emitted.len() {
            for j in (i + 1)..emitted.len() {
                let (a, b) = (emitted[i], emitted[j]);
                let dist = (a.w - b.w).abs()
                    + (a.x - b.x).abs()
                    + (a.y - b.y).abs()
                    + (a.z - b.z).abs();
                assert!(dist > 1e-3, "emissions {} and {} coincide", i, j);
            }
        }
    }
}
