use crate::types::Quaternion;

/// Hamilton product `q ⊗ r`.
///
/// Scalar-first convention throughout. Non-commutative: composing on the
/// right applies `r`'s rotation in `q`'s frame, which is the order the
/// gyroscope integrator relies on.
pub fn multiply(q: Quaternion, r: Quaternion) -> Quaternion {
    Quaternion {
        w: q.w * r.w - q.x * r.x - q.y * r.y - q.z * r.z,
        x: q.w * r.x + q.x * r.w + q.y * r.z - q.z * r.y,
        y: q.w * r.y + q.y * r.w + q.z * r.x - q.x * r.z,
        z: q.w * r.z + q.z * r.w + q.x * r.y - q.y * r.x,
    }
}

/// Roll `q` by `radians` about its roll axis (yaw = 0, pitch = 0).
///
/// Builds the pure-roll quaternion via half-angle trig, then composes it on
/// the right of `q`. Used by the screen-rotation compensator and for the
/// construction-time pre-roll.
pub fn roll_by_angle(q: Quaternion, radians: f32) -> Quaternion {
    let half_roll = radians * 0.5;
    let (sin_roll, cos_roll) = half_roll.sin_cos();

    // Full yaw/pitch/roll expansion with yaw = pitch = 0 collapses to a
    // quaternion with only the scalar and z terms populated.
    let roll = Quaternion::new(cos_roll, 0.0, 0.0, sin_roll);
    multiply(q, roll)
}

/// Convert a delta-rotation vector to a scalar-first quaternion.
///
/// A 4-component input `[x, y, z, w]` is reordered as-is. A 3-component
/// input derives the scalar as `sqrt(1 - |v|²)`, clamped to 0 when the
/// vector magnitude reaches or exceeds 1.
pub fn from_rotation_vector(v: &[f32]) -> Quaternion {
    let w = if v.len() >= 4 {
        v[3]
    } else {
        let remainder = 1.0 - v[0] * v[0] - v[1] * v[1] - v[2] * v[2];
        if remainder > 0.0 {
            remainder.sqrt()
        } else {
            0.0
        }
    };
    Quaternion::new(w, v[0], v[1], v[2])
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f32 = 1e-6;

    fn assert_quat_eq(a: Quaternion, b: Quaternion, tol: f32) {
        assert!(
            (a.w - b.w).abs() < tol
                && (a.x - b.x).abs() < tol
                && (a.y - b.y).abs() < tol
                && (a.z - b.z).abs() < tol,
            "quaternions differ: {:?} vs {:?}",
            a,
            b
        );
    }

    #[test]
    fn test_multiply_identity_both_sides() {
        let q = Quaternion::new(0.5, 0.5, 0.5, 0.5);
        assert_quat_eq(multiply(Quaternion::IDENTITY, q), q, TOL);
        assert_quat_eq(multiply(q, Quaternion::IDENTITY), q, TOL);
    }

    #[test]
    fn test_multiply_is_noncommutative() {
        // Two quarter turns about different axes.
        let s = std::f32::consts::FRAC_1_SQRT_2;
        let qx = Quaternion::new(s, s, 0.0, 0.0);
        let qz = Quaternion::new(s, 0.0, 0.0, s);

        let ab = multiply(qx, qz);
        let ba = multiply(qz, qx);
        assert!((ab.y - ba.y).abs() > 0.1);
    }

    #[test]
    fn test_multiply_preserves_unit_norm() {
        let s = std::f32::consts::FRAC_1_SQRT_2;
        let qx = Quaternion::new(s, s, 0.0, 0.0);
        let qz = Quaternion::new(s, 0.0, 0.0, s);
        assert!((multiply(qx, qz).norm() - 1.0).abs() < TOL);
    }

    #[test]
    fn test_roll_by_angle_half_turn() {
        // Rolling the identity by π gives a pure-z quaternion.
        let q = roll_by_angle(Quaternion::IDENTITY, std::f32::consts::PI);
        assert_quat_eq(q, Quaternion::new(0.0, 0.0, 0.0, 1.0), 1e-5);
    }

    #[test]
    fn test_roll_by_zero_is_identity_operation() {
        let q = Quaternion::new(0.8, 0.1, 0.4, 0.2);
        assert_quat_eq(roll_by_angle(q, 0.0), q, TOL);
    }

    #[test]
    fn test_from_rotation_vector_four_components() {
        let q = from_rotation_vector(&[0.1, 0.2, 0.3, 0.9]);
        assert_quat_eq(q, Quaternion::new(0.9, 0.1, 0.2, 0.3), TOL);
    }

    #[test]
    fn test_from_rotation_vector_derives_scalar() {
        let q = from_rotation_vector(&[0.6, 0.0, 0.0]);
        assert!((q.w - 0.8).abs() < TOL);
        assert!((q.x - 0.6).abs() < TOL);
    }

    #[test]
    fn test_from_rotation_vector_clamps_overlong_input() {
        // Magnitude ≥ 1 must not produce NaN.
        let q = from_rotation_vector(&[0.9, 0.9, 0.9]);
        assert_eq!(q.w, 0.0);
        assert!(!q.w.is_nan());
    }
}
