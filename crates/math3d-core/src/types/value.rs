//! Linear Value Representation
//!
//! An owned, tagged math value. Each variant carries exactly as many floats
//! as its tag declares, so shape errors are caught once at construction.

use crate::error::{MathError, MathResult};
use super::tag::LinearType;

/// Owned math value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LinearValue {
    Vector3([f32; 3]),
    /// Homogeneous vector; `w` is meaningful for `mul_h` style operations
    Vector4([f32; 4]),
    /// Rotation stored as (x, y, z, w)
    Quaternion([f32; 4]),
    /// 4x4 matrix, column-major
    Matrix4([f32; 16]),
    /// Euler angles in radians (x, y, z)
    Euler([f32; 3]),
}

impl LinearValue {
    /// Build a value from a tag and a flat float block of the tag's width.
    pub fn from_slice(tag: LinearType, data: &[f32]) -> MathResult<Self> {
        if data.len() != tag.slots() {
            return Err(MathError::SlotCountMismatch {
                tag,
                expected: tag.slots(),
                found: data.len(),
            });
        }
        let value = match tag {
            LinearType::Vector3 => LinearValue::Vector3([data[0], data[1], data[2]]),
            LinearType::Vector4 => LinearValue::Vector4([data[0], data[1], data[2], data[3]]),
            LinearType::Quaternion => {
                LinearValue::Quaternion([data[0], data[1], data[2], data[3]])
            }
            LinearType::Matrix4 => {
                let mut m = [0.0; 16];
                m.copy_from_slice(data);
                LinearValue::Matrix4(m)
            }
            LinearType::Euler => LinearValue::Euler([data[0], data[1], data[2]]),
        };
        Ok(value)
    }

    pub fn tag(&self) -> LinearType {
        match self {
            LinearValue::Vector3(_) => LinearType::Vector3,
            LinearValue::Vector4(_) => LinearType::Vector4,
            LinearValue::Quaternion(_) => LinearType::Quaternion,
            LinearValue::Matrix4(_) => LinearType::Matrix4,
            LinearValue::Euler(_) => LinearType::Euler,
        }
    }

    pub fn as_slice(&self) -> &[f32] {
        match self {
            LinearValue::Vector3(v) | LinearValue::Euler(v) => &v[..],
            LinearValue::Vector4(v) | LinearValue::Quaternion(v) => &v[..],
            LinearValue::Matrix4(m) => &m[..],
        }
    }

    pub fn as_matrix(&self) -> MathResult<&[f32; 16]> {
        match self {
            LinearValue::Matrix4(m) => Ok(m),
            other => Err(mismatch("matrix", other)),
        }
    }

    pub fn as_quat(&self) -> MathResult<&[f32; 4]> {
        match self {
            LinearValue::Quaternion(q) => Ok(q),
            other => Err(mismatch("quat", other)),
        }
    }

    pub fn as_vector3(&self) -> MathResult<&[f32; 3]> {
        match self {
            LinearValue::Vector3(v) => Ok(v),
            other => Err(mismatch("vector3", other)),
        }
    }

    pub fn as_vector4(&self) -> MathResult<&[f32; 4]> {
        match self {
            LinearValue::Vector4(v) => Ok(v),
            other => Err(mismatch("vector4", other)),
        }
    }
}

fn mismatch(expected: &'static str, found: &LinearValue) -> MathError {
    MathError::TypeMismatch {
        expected,
        found: found.tag(),
    }
}
