//! Polymorphic multiply over tagged operands.
//!
//! Supported pairs (left * right → result):
//!
//! | left       | right      | result     |
//! |------------|------------|------------|
//! | matrix     | matrix     | matrix     |
//! | matrix     | vector4    | vector4    |
//! | matrix     | vector3    | vector3 (point, `w = 1`, no divide) |
//! | quat       | quat       | quat       |
//! | quat       | vector3    | vector3 (rotated) |
//! | quat       | vector4    | vector4 (xyz rotated, `w` kept) |
//! | vector3    | vector3    | vector3 (component-wise) |
//! | vector4    | vector4    | vector4 (component-wise) |
//!
//! Every other pair is rejected before anything is pushed.

use glam::{Vec3, Vec4};

use crate::error::{MathError, MathResult};
use crate::stack::{with_scope, StackOffset, ValueStack};
use crate::types::LinearValue;

use super::{matrix, quat};

/// Multiply two tagged values.
pub fn multiply(lhs: &LinearValue, rhs: &LinearValue) -> MathResult<LinearValue> {
    use LinearValue::*;

    let product = match (lhs, rhs) {
        (Matrix4(a), Matrix4(b)) => Matrix4(matrix::mul(a, b)),
        (Matrix4(m), Vector4(v)) => Vector4(matrix::transform(m, v)),
        (Matrix4(m), Vector3(p)) => Vector3(matrix::transform_point(m, p)),
        (Quaternion(a), Quaternion(b)) => Quaternion(quat::mul(a, b)),
        (Quaternion(q), Vector3(v)) => Vector3(quat::rotate(q, v)),
        (Quaternion(q), Vector4(v)) => {
            let r = quat::rotate(q, &[v[0], v[1], v[2]]);
            Vector4([r[0], r[1], r[2], v[3]])
        }
        (Vector3(a), Vector3(b)) => Vector3((Vec3::from_array(*a) * Vec3::from_array(*b)).to_array()),
        (Vector4(a), Vector4(b)) => Vector4((Vec4::from_array(*a) * Vec4::from_array(*b)).to_array()),
        _ => {
            return Err(MathError::UnsupportedOperandTypes {
                left: lhs.tag(),
                right: rhs.tag(),
            })
        }
    };
    Ok(product)
}

/// Push `lhs * rhs`.
pub fn mul_object(
    stack: &mut ValueStack,
    lhs: &LinearValue,
    rhs: &LinearValue,
) -> MathResult<StackOffset> {
    let product = multiply(lhs, rhs)?;
    stack.push_value(&product)
}

/// Push `first * rest[0] * rest[1] * ...`, folding left.
///
/// Intermediate products live on the stack only for the duration of the
/// fold; a failure at any step leaves the stack as it was.
pub fn mul_chain(
    stack: &mut ValueStack,
    first: &LinearValue,
    rest: &[LinearValue],
) -> MathResult<StackOffset> {
    let product = with_scope(stack, |scope| -> MathResult<LinearValue> {
        let mut acc = *first;
        for rhs in rest {
            let offset = mul_object(scope, &acc, rhs)?;
            acc = scope.value(offset)?;
        }
        Ok(acc)
    })?;
    stack.push_value(&product)
}
