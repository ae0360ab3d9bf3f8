//! Vector operations.

use glam::{Vec3, Vec4};
use tracing::debug;

use crate::error::{MathError, MathResult};
use crate::stack::{StackOffset, ValueStack};
use crate::types::{LinearType, LinearValue};

/// Euclidean length of a 3-vector.
pub fn length(v: &[f32; 3]) -> f32 {
    Vec3::from_array(*v).length()
}

pub fn dot(a: &[f32; 3], b: &[f32; 3]) -> f32 {
    Vec3::from_array(*a).dot(Vec3::from_array(*b))
}

pub fn cross3(a: &[f32; 3], b: &[f32; 3]) -> [f32; 3] {
    Vec3::from_array(*a).cross(Vec3::from_array(*b)).to_array()
}

pub fn scale3(v: &[f32; 3], k: f32) -> [f32; 3] {
    (Vec3::from_array(*v) * k).to_array()
}

pub fn sub3(a: &[f32; 3], b: &[f32; 3]) -> [f32; 3] {
    (Vec3::from_array(*a) - Vec3::from_array(*b)).to_array()
}

/// Unit vector along `v`. A zero-length vector stays zero.
pub fn normalize3(v: &[f32; 3]) -> [f32; 3] {
    normalize_or_zero(Vec3::from_array(*v)).to_array()
}

pub(crate) fn normalize_or_zero(v: Vec3) -> Vec3 {
    let len = v.length();
    if len <= f32::EPSILON {
        debug!(?v, "normalizing zero-length vector");
        return Vec3::ZERO;
    }
    v / len
}

/// Push `a × b` as a Vector3.
pub fn cross(stack: &mut ValueStack, a: &[f32; 3], b: &[f32; 3]) -> MathResult<StackOffset> {
    stack.push(LinearType::Vector3, &cross3(a, b))
}

/// Push the normalized vector. Vector4 keeps its `w` and normalizes `xyz`.
pub fn normalize_vector(stack: &mut ValueStack, v: &LinearValue) -> MathResult<StackOffset> {
    match v {
        LinearValue::Vector3(v3) => stack.push(LinearType::Vector3, &normalize3(v3)),
        LinearValue::Vector4(v4) => {
            let n = normalize_or_zero(Vec4::from_array(*v4).truncate());
            stack.push(LinearType::Vector4, &n.extend(v4[3]).to_array())
        }
        other => Err(not_a_vector(other)),
    }
}

/// Component-wise floor.
pub fn floor(stack: &mut ValueStack, v: &LinearValue) -> MathResult<StackOffset> {
    map_components(stack, v, f32::floor)
}

/// Component-wise ceil.
pub fn ceil(stack: &mut ValueStack, v: &LinearValue) -> MathResult<StackOffset> {
    map_components(stack, v, f32::ceil)
}

/// Component-wise `1 / x`; a zero component yields a signed infinity.
pub fn reciprocal(stack: &mut ValueStack, v: &LinearValue) -> MathResult<StackOffset> {
    map_components(stack, v, f32::recip)
}

fn map_components(
    stack: &mut ValueStack,
    v: &LinearValue,
    f: fn(f32) -> f32,
) -> MathResult<StackOffset> {
    match v {
        LinearValue::Vector3(v3) => stack.push(LinearType::Vector3, &v3.map(f)),
        LinearValue::Vector4(v4) => stack.push(LinearType::Vector4, &v4.map(f)),
        other => Err(not_a_vector(other)),
    }
}

fn not_a_vector(v: &LinearValue) -> MathError {
    MathError::TypeMismatch {
        expected: "vector",
        found: v.tag(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn cross_of_axes() {
        assert_eq!(cross3(&[1.0, 0.0, 0.0], &[0.0, 1.0, 0.0]), [0.0, 0.0, 1.0]);
        assert_eq!(cross3(&[0.0, 1.0, 0.0], &[1.0, 0.0, 0.0]), [0.0, 0.0, -1.0]);
    }

    #[test]
    fn normalize_zero_stays_zero() {
        assert_eq!(normalize3(&[0.0, 0.0, 0.0]), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn normalize_vector4_keeps_w() {
        let mut stack = ValueStack::default();
        normalize_vector(&mut stack, &LinearValue::Vector4([3.0, 0.0, 4.0, 1.0])).unwrap();
        let (tag, data) = stack.top().unwrap();
        assert_eq!(tag, LinearType::Vector4);
        for (got, want) in data.iter().zip([0.6, 0.0, 0.8, 1.0]) {
            assert_abs_diff_eq!(*got, want, epsilon = 1e-6);
        }
    }

    #[test]
    fn floor_ceil_reciprocal() {
        let mut stack = ValueStack::default();
        let v = LinearValue::Vector3([1.5, -1.5, 2.0]);
        let f = floor(&mut stack, &v).unwrap();
        let c = ceil(&mut stack, &v).unwrap();
        let r = reciprocal(&mut stack, &v).unwrap();
        assert_eq!(stack.get(f).unwrap().1, &[1.0, -2.0, 2.0]);
        assert_eq!(stack.get(c).unwrap().1, &[2.0, -1.0, 2.0]);
        assert_eq!(stack.get(r).unwrap().1, &[1.0 / 1.5, -1.0 / 1.5, 0.5]);
    }

    #[test]
    fn non_vector_is_rejected_without_push() {
        let mut stack = ValueStack::default();
        let q = LinearValue::Quaternion([0.0, 0.0, 0.0, 1.0]);
        let err = normalize_vector(&mut stack, &q).unwrap_err();
        assert_eq!(
            err,
            MathError::TypeMismatch { expected: "vector", found: LinearType::Quaternion }
        );
        assert!(stack.is_empty());
    }
}
