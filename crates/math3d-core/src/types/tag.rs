//! Linear Type Tags
//!
//! Defines the closed set of math value shapes and their float widths.
//! Tag codes are a stable contract with the host binding.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Shape of a math value
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LinearType {
    Vector3    = 0x00,
    Vector4    = 0x01,
    Quaternion = 0x02,
    Matrix4    = 0x03,
    Euler      = 0x04,
}

impl LinearType {
    /// Every tag, in code order
    pub const ALL: [LinearType; 5] = [
        LinearType::Vector3,
        LinearType::Vector4,
        LinearType::Quaternion,
        LinearType::Matrix4,
        LinearType::Euler,
    ];

    /// Convert raw byte to tag
    pub fn from_u8(byte: u8) -> Option<Self> {
        match byte {
            0x00 => Some(LinearType::Vector3),
            0x01 => Some(LinearType::Vector4),
            0x02 => Some(LinearType::Quaternion),
            0x03 => Some(LinearType::Matrix4),
            0x04 => Some(LinearType::Euler),
            _ => None,
        }
    }

    /// Number of f32 slots a value of this shape occupies
    pub const fn slots(self) -> usize {
        match self {
            LinearType::Vector3 => 3,
            LinearType::Vector4 => 4,
            LinearType::Quaternion => 4,
            LinearType::Matrix4 => 16,
            LinearType::Euler => 3,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            LinearType::Vector3 => "vector3",
            LinearType::Vector4 => "vector4",
            LinearType::Quaternion => "quat",
            LinearType::Matrix4 => "matrix",
            LinearType::Euler => "euler",
        }
    }

    pub const fn is_vector(self) -> bool {
        matches!(self, LinearType::Vector3 | LinearType::Vector4)
    }
}

impl fmt::Display for LinearType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
