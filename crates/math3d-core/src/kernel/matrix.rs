//! 4x4 matrix operations.
//!
//! Matrices are column-major: element (row `r`, column `c`) lives at
//! `m[c * 4 + r]`, and the translation is `m[12..15]`. This is the layout of
//! [`glam::Mat4::from_cols_array`].

use glam::{Mat3, Mat4, Quat, Vec3, Vec4};
use tracing::debug;

use crate::error::MathResult;
use crate::stack::{StackOffset, ValueStack};
use crate::types::LinearType;

use super::quat;

#[rustfmt::skip]
pub const IDENTITY: [f32; 16] = [
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 1.0, 0.0,
    0.0, 0.0, 0.0, 1.0,
];

/// A matrix is singular when `|det|` is at or below this fraction of the
/// product of its column lengths (the Hadamard bound on `|det|`).
pub const SINGULAR_TOLERANCE: f32 = 1e-5;

/// Product `a * b`.
pub fn mul(a: &[f32; 16], b: &[f32; 16]) -> [f32; 16] {
    (Mat4::from_cols_array(a) * Mat4::from_cols_array(b)).to_cols_array()
}

/// `m * v` for a homogeneous 4-vector.
pub fn transform(m: &[f32; 16], v: &[f32; 4]) -> [f32; 4] {
    (Mat4::from_cols_array(m) * Vec4::from_array(*v)).to_array()
}

/// Transform a point (`w = 1`), without the homogeneous divide.
pub fn transform_point(m: &[f32; 16], p: &[f32; 3]) -> [f32; 3] {
    (Mat4::from_cols_array(m) * Vec3::from_array(*p).extend(1.0))
        .truncate()
        .to_array()
}

pub fn transpose(m: &[f32; 16]) -> [f32; 16] {
    Mat4::from_cols_array(m).transpose().to_cols_array()
}

pub fn determinant(m: &[f32; 16]) -> f32 {
    Mat4::from_cols_array(m).determinant()
}

/// Largest `|det|` possible for matrices with the column lengths of `m`.
///
/// An affine matrix has the determinant of its upper 3x3, so translation is
/// left out of the bound.
fn hadamard_bound(m: &Mat4) -> f32 {
    if m.row(3) == Vec4::W {
        m.x_axis.truncate().length() * m.y_axis.truncate().length() * m.z_axis.truncate().length()
    } else {
        m.x_axis.length() * m.y_axis.length() * m.z_axis.length() * m.w_axis.length()
    }
}

/// General inverse, or `None` when `m` is singular.
///
/// Singularity is judged relative to the magnitude of `m`, so a rank
/// deficient matrix whose determinant is only rounding noise is rejected,
/// while a uniformly tiny but well-conditioned matrix still inverts.
pub fn try_inverse(m: &[f32; 16]) -> Option<[f32; 16]> {
    let mat = Mat4::from_cols_array(m);
    let det = mat.determinant();
    if !det.is_finite() || det.abs() <= SINGULAR_TOLERANCE * hadamard_bound(&mat) {
        return None;
    }
    let inv = mat.inverse();
    inv.is_finite().then(|| inv.to_cols_array())
}

/// `T * R * S` from scale, rotation quaternion and translation.
///
/// Scale is applied as given; zero or negative components are not corrected.
pub fn srt(s: &[f32; 3], r: &[f32; 4], t: &[f32; 3]) -> [f32; 16] {
    Mat4::from_scale_rotation_translation(
        Vec3::from_array(*s),
        Quat::from_array(*r),
        Vec3::from_array(*t),
    )
    .to_cols_array()
}

fn upper3(m: &[f32; 16]) -> Mat3 {
    Mat3::from_mat4(Mat4::from_cols_array(m))
}

fn scale_of(basis: &Mat3) -> [f32; 3] {
    let mut s = [
        basis.x_axis.length(),
        basis.y_axis.length(),
        basis.z_axis.length(),
    ];
    if basis.determinant() < 0.0 {
        s[0] = -s[0];
    }
    s
}

/// Per-axis scale of the upper 3x3.
///
/// Each component is the length of its column; when the 3x3 determinant is
/// negative the x component carries the reflection.
pub fn decompose_scale(m: &[f32; 16]) -> [f32; 3] {
    scale_of(&upper3(m))
}

/// Rotation of the upper 3x3 with scale divided out.
///
/// See [`decompose`] for how zero-scale axes are handled.
pub fn decompose_rot(m: &[f32; 16]) -> [f32; 4] {
    let basis = upper3(m);
    rotation_of(&basis, &scale_of(&basis))
}

/// Axis `i` of a right-handed frame, from the other two.
fn complete_axis(axes: &[Vec3; 3], i: usize) -> Vec3 {
    axes[(i + 1) % 3].cross(axes[(i + 2) % 3]).normalize_or_zero()
}

fn rotation_of(basis: &Mat3, scale: &[f32; 3]) -> [f32; 4] {
    let mut axes = [basis.x_axis, basis.y_axis, basis.z_axis];
    let mut zero = [false; 3];
    for i in 0..3 {
        if scale[i].abs() <= f32::EPSILON {
            debug!(axis = i, "zero-scale axis");
            zero[i] = true;
        } else {
            axes[i] /= scale[i];
        }
    }

    let kept: Vec<usize> = (0..3).filter(|&i| !zero[i]).collect();
    match kept.as_slice() {
        [_, _, _] => {}
        [a, b] => {
            let i = 3 - a - b;
            axes[i] = complete_axis(&axes, i);
        }
        [k] => {
            let k = *k;
            let i = (k + 1) % 3;
            // standard basis vector of the first missing axis, made
            // orthogonal to the surviving one
            let u = axes[k];
            let mut v = Vec3::AXES[i] - u * Vec3::AXES[i].dot(u);
            if v.length() <= f32::EPSILON {
                let j = (k + 2) % 3;
                v = Vec3::AXES[j] - u * Vec3::AXES[j].dot(u);
            }
            axes[i] = v.normalize_or_zero();
            let j = (k + 2) % 3;
            axes[j] = complete_axis(&axes, j);
        }
        _ => return quat::IDENTITY,
    }
    quat::from_basis(&Mat3::from_cols(axes[0], axes[1], axes[2]))
}

/// Split an affine matrix into scale, rotation and translation.
///
/// A zero-scale axis (`|s| <= f32::EPSILON`) has no direction of its own,
/// so the rotation is completed to an orthonormal right-handed frame:
///
/// - one zero axis is the cross product of the other two;
/// - with two zero axes, the first one after the surviving axis (in x, y, z
///   order, wrapping) is its standard basis vector made orthogonal to the
///   surviving axis (the next basis vector when those two are parallel), and
///   the last is their cross product;
/// - with all three zero the rotation is the identity.
///
/// In every case `srt(decompose(m))` reproduces the upper 3x3 of `m`.
pub fn decompose(m: &[f32; 16]) -> ([f32; 3], [f32; 4], [f32; 3]) {
    let basis = upper3(m);
    let s = scale_of(&basis);
    let r = rotation_of(&basis, &s);
    (s, r, [m[12], m[13], m[14]])
}

pub fn make_srt(
    stack: &mut ValueStack,
    s: &[f32; 3],
    r: &[f32; 4],
    t: &[f32; 3],
) -> MathResult<StackOffset> {
    stack.push(LinearType::Matrix4, &srt(s, r, t))
}

/// Push the inverse of `m`.
///
/// A singular matrix pushes the all-zero matrix, which is never a valid
/// inverse; use [`try_inverse`] to branch on singularity directly.
pub fn inverse_matrix(stack: &mut ValueStack, m: &[f32; 16]) -> MathResult<StackOffset> {
    let inv = try_inverse(m).unwrap_or_else(|| {
        debug!("inverting singular matrix");
        [0.0; 16]
    });
    stack.push(LinearType::Matrix4, &inv)
}

pub fn transpose_matrix(stack: &mut ValueStack, m: &[f32; 16]) -> MathResult<StackOffset> {
    stack.push(LinearType::Matrix4, &transpose(m))
}

/// Push `m * v` divided by its `w`. A zero `w` skips the divide.
pub fn mul_h(stack: &mut ValueStack, m: &[f32; 16], v: &[f32; 4]) -> MathResult<StackOffset> {
    let mut r = transform(m, v);
    if r[3] != 0.0 {
        let inv_w = 1.0 / r[3];
        r = r.map(|x| x * inv_w);
    }
    stack.push(LinearType::Vector4, &r)
}

/// Push scale (Vector3), rotation (Quaternion) and translation (Vector3),
/// in that order. Either all three are pushed or none is.
pub fn decompose_matrix(stack: &mut ValueStack, m: &[f32; 16]) -> MathResult<[StackOffset; 3]> {
    let (s, r, t) = decompose(m);
    let mark = stack.mark();
    let pushed = push_components(stack, &s, &r, &t);
    if pushed.is_err() {
        stack.restore(mark)?;
    }
    pushed
}

fn push_components(
    stack: &mut ValueStack,
    s: &[f32; 3],
    r: &[f32; 4],
    t: &[f32; 3],
) -> MathResult<[StackOffset; 3]> {
    Ok([
        stack.push(LinearType::Vector3, s)?,
        stack.push(LinearType::Quaternion, r)?,
        stack.push(LinearType::Vector3, t)?,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StackConfig;
    use crate::error::MathError;
    use approx::assert_abs_diff_eq;

    fn assert_mat_eq(a: &[f32], b: &[f32]) {
        for (x, y) in a.iter().zip(b) {
            assert_abs_diff_eq!(*x, *y, epsilon = 1e-5);
        }
    }

    #[test]
    fn srt_scales_then_translates() {
        let m = srt(&[2.0, 3.0, 4.0], &quat::IDENTITY, &[1.0, 2.0, 3.0]);
        assert_eq!(transform_point(&m, &[1.0, 1.0, 1.0]), [3.0, 5.0, 7.0]);
    }

    #[test]
    fn translation_inverse() {
        let m = srt(&[1.0; 3], &quat::IDENTITY, &[4.0, -2.0, 1.0]);
        let inv = try_inverse(&m).unwrap();
        assert_mat_eq(&inv, &srt(&[1.0; 3], &quat::IDENTITY, &[-4.0, 2.0, -1.0]));
    }

    #[test]
    fn singular_inverse_pushes_zero_matrix() {
        let mut stack = ValueStack::default();
        let m = srt(&[1.0, 0.0, 1.0], &quat::IDENTITY, &[0.0; 3]);
        assert!(try_inverse(&m).is_none());
        inverse_matrix(&mut stack, &m).unwrap();
        assert_eq!(stack.top().unwrap().1, &[0.0; 16]);
    }

    #[test]
    fn transpose_swaps_rows_and_columns() {
        let m: [f32; 16] = core::array::from_fn(|i| i as f32);
        let t = transpose(&m);
        assert_eq!(t[1], m[4]);
        assert_eq!(t[14], m[11]);
        assert_eq!(transpose(&t), m);
    }

    #[test]
    fn negative_determinant_flips_x_scale() {
        let m = srt(&[1.0, -2.0, 1.0], &quat::IDENTITY, &[0.0; 3]);
        let (s, r, _) = decompose(&m);
        assert_mat_eq(&s, &[-1.0, 2.0, 1.0]);
        // different split, same transform
        assert_mat_eq(&srt(&s, &r, &[0.0; 3]), &m);
    }

    #[test]
    fn zero_scale_axes_fall_back_to_basis() {
        let q = quat::from_axis(&[0.0, 1.0, 0.0], 0.8);
        let (s, r, t) = decompose(&srt(&[0.0; 3], &q, &[1.0, 2.0, 3.0]));
        assert_eq!(s, [0.0; 3]);
        assert_mat_eq(&r, &quat::IDENTITY);
        assert_eq!(t, [1.0, 2.0, 3.0]);

        let (s, r, _) = decompose(&srt(&[0.0, 2.0, 3.0], &quat::IDENTITY, &[0.0; 3]));
        assert_mat_eq(&s, &[0.0, 2.0, 3.0]);
        assert_mat_eq(&r, &quat::IDENTITY);
    }

    fn assert_same_rotation(a: &[f32; 4], b: &[f32; 4]) {
        let d: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
        assert_abs_diff_eq!(d.abs(), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn one_zero_axis_keeps_rotation() {
        let q = quat::from_axis(&[0.0, 1.0, 0.0], core::f32::consts::FRAC_PI_2);
        for zero_axis in 0..3 {
            let mut scale = [1.0, 2.0, 0.5];
            scale[zero_axis] = 0.0;
            let m = srt(&scale, &q, &[1.0, -2.0, 3.0]);

            let (s, r, t) = decompose(&m);
            assert_mat_eq(&s, &scale);
            assert_same_rotation(&r, &q);
            assert_mat_eq(&srt(&s, &r, &t), &m);
        }
    }

    #[test]
    fn two_zero_axes_complete_a_rotation() {
        let q = quat::from_axis(&[1.0, 2.0, -0.5], 1.3);
        for kept in 0..3 {
            let mut scale = [0.0; 3];
            scale[kept] = 2.5;
            let m = srt(&scale, &q, &[0.0; 3]);

            let (s, r, t) = decompose(&m);
            let len: f32 = r.iter().map(|x| x * x).sum::<f32>().sqrt();
            assert_abs_diff_eq!(len, 1.0, epsilon = 1e-5);
            assert_mat_eq(&srt(&s, &r, &t), &m);
        }

        // surviving z axis turned onto x, the basis vector the fill starts from
        let q = quat::from_axis(&[0.0, 1.0, 0.0], core::f32::consts::FRAC_PI_2);
        let m = srt(&[0.0, 0.0, 1.0], &q, &[0.0; 3]);
        let (s, r, t) = decompose(&m);
        assert_mat_eq(&srt(&s, &r, &t), &m);
    }

    #[test]
    fn rank_deficient_matrix_is_singular() {
        let q = quat::from_axis(&[0.3, -1.0, 0.4], 0.7);
        let mut m = srt(&[1.0; 3], &q, &[4.0, -5.0, 6.0]);
        for k in 0..3 {
            m[8 + k] = 0.6 * m[k] - 1.7 * m[4 + k];
        }
        assert!(try_inverse(&m).is_none());

        let mut stack = ValueStack::default();
        inverse_matrix(&mut stack, &m).unwrap();
        assert_eq!(stack.top().unwrap().1, &[0.0; 16]);
    }

    #[test]
    fn far_translation_is_invertible() {
        let m = srt(&[1.0; 3], &quat::IDENTITY, &[1e6, -2e6, 5e5]);
        let inv = try_inverse(&m).expect("pure translation");
        for (got, want) in inv[12..15].iter().zip([-1e6, 2e6, -5e5]) {
            approx::assert_relative_eq!(*got, want, max_relative = 1e-6);
        }
    }

    #[test]
    fn tiny_uniform_scale_is_invertible() {
        let m = srt(&[1e-5; 3], &quat::IDENTITY, &[0.0; 3]);
        let inv = try_inverse(&m).expect("well-conditioned matrix");
        assert_mat_eq(&mul(&m, &inv), &IDENTITY);
        assert_abs_diff_eq!(inv[0], 1e5, epsilon = 1.0);
    }

    #[test]
    fn decompose_pushes_all_or_nothing() {
        let mut stack = ValueStack::new(&StackConfig::bounded(8));
        let err = decompose_matrix(&mut stack, &IDENTITY).unwrap_err();
        assert!(matches!(err, MathError::CapacityExceeded { .. }));
        assert!(stack.is_empty());
    }

    #[test]
    fn mul_h_divides_by_w() {
        let mut stack = ValueStack::default();
        let mut m = IDENTITY;
        m[15] = 2.0;
        mul_h(&mut stack, &m, &[2.0, 4.0, 6.0, 1.0]).unwrap();
        assert_eq!(stack.top().unwrap().1, &[1.0, 2.0, 3.0, 1.0]);

        mul_h(&mut stack, &IDENTITY, &[2.0, 4.0, 6.0, 0.0]).unwrap();
        assert_eq!(stack.top().unwrap().1, &[2.0, 4.0, 6.0, 0.0]);
    }
}
