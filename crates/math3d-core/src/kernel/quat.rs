//! Quaternion operations.
//!
//! Quaternions are unit rotations stored as `(x, y, z, w)`, the layout of
//! [`glam::Quat`]. Conversion to Euler angles is deliberately absent; only
//! Euler → quaternion is offered.

use glam::{EulerRot, Mat3, Mat4, Quat, Vec3};
use tracing::debug;

use crate::error::MathResult;
use crate::stack::{StackOffset, ValueStack};
use crate::types::LinearType;

use super::vector::{normalize3, normalize_or_zero};

/// Identity rotation
pub const IDENTITY: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

/// Unit quaternion along `q`. A zero quaternion becomes the identity.
pub fn normalize(q: &[f32; 4]) -> [f32; 4] {
    let q = Quat::from_array(*q);
    let len = q.length();
    if len <= f32::EPSILON {
        debug!(?q, "normalizing zero quaternion");
        return IDENTITY;
    }
    (q * len.recip()).to_array()
}

pub fn conjugate(q: &[f32; 4]) -> [f32; 4] {
    Quat::from_array(*q).conjugate().to_array()
}

/// Multiplicative inverse. A zero quaternion inverts to the identity.
pub fn inverse(q: &[f32; 4]) -> [f32; 4] {
    let q = Quat::from_array(*q);
    let n2 = q.length_squared();
    if n2 <= f32::EPSILON * f32::EPSILON {
        debug!(?q, "inverting zero quaternion");
        return IDENTITY;
    }
    (q.conjugate() * n2.recip()).to_array()
}

/// Hamilton product `a * b` (apply `b` first, then `a`).
pub fn mul(a: &[f32; 4], b: &[f32; 4]) -> [f32; 4] {
    (Quat::from_array(*a) * Quat::from_array(*b)).to_array()
}

/// Rotate `v` by `q`.
pub fn rotate(q: &[f32; 4], v: &[f32; 3]) -> [f32; 3] {
    (Quat::from_array(*q) * Vec3::from_array(*v)).to_array()
}

/// Rotation from Euler angles in radians, applied x first, then y, then z.
pub fn from_euler(x: f32, y: f32, z: f32) -> [f32; 4] {
    Quat::from_euler(EulerRot::ZYX, z, y, x).to_array()
}

/// Rotation of `radians` about `axis`. A zero axis yields the identity.
pub fn from_axis(axis: &[f32; 3], radians: f32) -> [f32; 4] {
    let axis = normalize_or_zero(Vec3::from_array(*axis));
    if axis == Vec3::ZERO {
        return IDENTITY;
    }
    Quat::from_axis_angle(axis, radians).to_array()
}

/// Rotation matrix of `q` (column-major, no translation).
pub fn to_matrix(q: &[f32; 4]) -> [f32; 16] {
    Mat4::from_quat(Quat::from_array(*q)).to_cols_array()
}

/// Quaternion of the upper 3x3 of `m`, which must be a pure rotation.
pub fn from_rotation_matrix(m: &[f32; 16]) -> [f32; 4] {
    from_basis(&Mat3::from_mat4(Mat4::from_cols_array(m)))
}

/// Normalized quaternion of an orthonormal basis.
///
/// The extraction branches on the largest diagonal term (Shepperd), so the
/// divisor stays well away from zero.
pub(crate) fn from_basis(basis: &Mat3) -> [f32; 4] {
    normalize(&Quat::from_mat3(basis).to_array())
}

/// Direction `q` turns the +Z axis to.
pub fn to_viewdir(q: &[f32; 4]) -> [f32; 3] {
    (Quat::from_array(*q) * Vec3::Z).to_array()
}

/// Shortest-arc rotation taking +Z to `dir`.
///
/// A zero direction yields the identity; the exact opposite direction is a
/// half turn about +Y.
pub fn from_viewdir(dir: &[f32; 3]) -> [f32; 4] {
    let d = normalize_or_zero(Vec3::from_array(*dir));
    if d == Vec3::ZERO {
        return IDENTITY;
    }
    if Vec3::Z.dot(d) < -1.0 + 1e-6 {
        return [0.0, 1.0, 0.0, 0.0];
    }
    Quat::from_rotation_arc(Vec3::Z, d).to_array()
}

pub fn make_quat_from_euler(stack: &mut ValueStack, x: f32, y: f32, z: f32) -> MathResult<StackOffset> {
    stack.push(LinearType::Quaternion, &from_euler(x, y, z))
}

pub fn make_quat_from_axis(
    stack: &mut ValueStack,
    axis: &[f32; 3],
    radians: f32,
) -> MathResult<StackOffset> {
    stack.push(LinearType::Quaternion, &from_axis(axis, radians))
}

pub fn normalize_quat(stack: &mut ValueStack, q: &[f32; 4]) -> MathResult<StackOffset> {
    stack.push(LinearType::Quaternion, &normalize(q))
}

pub fn inverse_quat(stack: &mut ValueStack, q: &[f32; 4]) -> MathResult<StackOffset> {
    stack.push(LinearType::Quaternion, &inverse(q))
}

pub fn quat_to_matrix(stack: &mut ValueStack, q: &[f32; 4]) -> MathResult<StackOffset> {
    stack.push(LinearType::Matrix4, &to_matrix(q))
}

pub fn matrix_to_quat(stack: &mut ValueStack, m: &[f32; 16]) -> MathResult<StackOffset> {
    stack.push(LinearType::Quaternion, &from_rotation_matrix(m))
}

pub fn quat_to_viewdir(stack: &mut ValueStack, q: &[f32; 4]) -> MathResult<StackOffset> {
    stack.push(LinearType::Vector3, &to_viewdir(q))
}

/// Push the normalized third column of a rotation matrix.
pub fn rotmat_to_viewdir(stack: &mut ValueStack, m: &[f32; 16]) -> MathResult<StackOffset> {
    stack.push(LinearType::Vector3, &normalize3(&[m[8], m[9], m[10]]))
}

pub fn viewdir_to_quat(stack: &mut ValueStack, dir: &[f32; 3]) -> MathResult<StackOffset> {
    stack.push(LinearType::Quaternion, &from_viewdir(dir))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f32::consts::FRAC_PI_2;

    fn assert_vec_eq(a: &[f32], b: &[f32]) {
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b) {
            assert_abs_diff_eq!(*x, *y, epsilon = 1e-5);
        }
    }

    #[test]
    fn zero_quaternion_normalizes_to_identity() {
        assert_eq!(normalize(&[0.0; 4]), IDENTITY);
        assert_eq!(inverse(&[0.0; 4]), IDENTITY);
    }

    #[test]
    fn quarter_turn_about_z_rotates_x_to_y() {
        let q = from_axis(&[0.0, 0.0, 2.0], FRAC_PI_2);
        assert_vec_eq(&rotate(&q, &[1.0, 0.0, 0.0]), &[0.0, 1.0, 0.0]);
    }

    #[test]
    fn euler_single_axis_matches_axis_angle() {
        assert_vec_eq(&from_euler(0.3, 0.0, 0.0), &from_axis(&[1.0, 0.0, 0.0], 0.3));
        assert_vec_eq(&from_euler(0.0, 0.7, 0.0), &from_axis(&[0.0, 1.0, 0.0], 0.7));
        assert_vec_eq(&from_euler(0.0, 0.0, -1.1), &from_axis(&[0.0, 0.0, 1.0], -1.1));
    }

    #[test]
    fn matrix_agrees_with_rotate() {
        let q = normalize(&[0.2, -0.4, 0.1, 0.9]);
        let m = to_matrix(&q);
        let v = [0.5, 2.0, -1.0];
        let by_matrix = [
            m[0] * v[0] + m[4] * v[1] + m[8] * v[2],
            m[1] * v[0] + m[5] * v[1] + m[9] * v[2],
            m[2] * v[0] + m[6] * v[1] + m[10] * v[2],
        ];
        assert_vec_eq(&by_matrix, &rotate(&q, &v));
    }

    #[test]
    fn inverse_undoes_rotation() {
        let q = normalize(&[0.3, 0.1, -0.5, 0.8]);
        assert_vec_eq(&mul(&q, &inverse(&q)), &IDENTITY);
    }

    #[test]
    fn viewdir_round_trip() {
        for dir in [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.3, -0.2, 0.9], [0.0, 0.0, -1.0]] {
            let q = from_viewdir(&dir);
            assert_vec_eq(&to_viewdir(&q), &normalize3(&dir));
        }
        assert_eq!(from_viewdir(&[0.0; 3]), IDENTITY);
    }

    #[test]
    fn rotmat_viewdir_is_third_column() {
        let mut stack = ValueStack::default();
        let q = from_axis(&[0.0, 1.0, 0.0], FRAC_PI_2);
        rotmat_to_viewdir(&mut stack, &to_matrix(&q)).unwrap();
        quat_to_viewdir(&mut stack, &q).unwrap();
        let b = stack.pop().unwrap();
        let a = stack.pop().unwrap();
        assert_vec_eq(a.as_slice(), b.as_slice());
        assert_vec_eq(a.as_slice(), &[1.0, 0.0, 0.0]);
    }
}
