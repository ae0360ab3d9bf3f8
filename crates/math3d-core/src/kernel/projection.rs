//! View and projection matrices (left-handed).
//!
//! Projection builders take an explicit [`DepthRange`] so that the same
//! volume produces clip-space Z in [0, 1] or [-1, 1] on request.

use glam::{Mat4, Vec3, Vec4};
use tracing::debug;

use crate::config::DepthRange;
use crate::error::{MathError, MathResult};
use crate::stack::{StackOffset, ValueStack};
use crate::types::LinearType;

use super::vector::{normalize_or_zero, sub3};

/// Clip planes of a view volume
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewVolume {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
    pub near: f32,
    pub far: f32,
}

impl ViewVolume {
    pub fn new(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Self {
        ViewVolume { left, right, bottom, top, near, far }
    }

    /// Symmetric volume of the given half extents.
    pub fn symmetric(half_width: f32, half_height: f32, near: f32, far: f32) -> Self {
        Self::new(-half_width, half_width, -half_height, half_height, near, far)
    }

    fn validate(&self) -> MathResult<()> {
        let planes = [self.left, self.right, self.bottom, self.top, self.near, self.far];
        if planes.iter().any(|p| !p.is_finite())
            || self.right == self.left
            || self.top == self.bottom
            || self.far == self.near
        {
            return Err(MathError::DegenerateProjection);
        }
        Ok(())
    }

    /// Perspective projection of this volume.
    pub fn frustum(&self, depth: DepthRange) -> MathResult<[f32; 16]> {
        self.validate()?;
        let (l, r, b, t, n, f) = (self.left, self.right, self.bottom, self.top, self.near, self.far);

        let (z_scale, z_offset) = match depth {
            DepthRange::ZeroToOne => (f / (f - n), -(f * n) / (f - n)),
            DepthRange::NegativeOneToOne => ((f + n) / (f - n), -(2.0 * f * n) / (f - n)),
        };
        let m = Mat4::from_cols(
            Vec4::new(2.0 * n / (r - l), 0.0, 0.0, 0.0),
            Vec4::new(0.0, 2.0 * n / (t - b), 0.0, 0.0),
            Vec4::new(-(r + l) / (r - l), -(t + b) / (t - b), z_scale, 1.0),
            Vec4::new(0.0, 0.0, z_offset, 0.0),
        );
        Ok(m.to_cols_array())
    }

    /// Orthographic projection of this volume.
    pub fn ortho(&self, depth: DepthRange) -> MathResult<[f32; 16]> {
        self.validate()?;
        let (l, r, b, t, n, f) = (self.left, self.right, self.bottom, self.top, self.near, self.far);

        let m = match depth {
            DepthRange::ZeroToOne => Mat4::orthographic_lh(l, r, b, t, n, f),
            DepthRange::NegativeOneToOne => Mat4::from_cols(
                Vec4::new(2.0 / (r - l), 0.0, 0.0, 0.0),
                Vec4::new(0.0, 2.0 / (t - b), 0.0, 0.0),
                Vec4::new(0.0, 0.0, 2.0 / (f - n), 0.0),
                Vec4::new(-(r + l) / (r - l), -(t + b) / (t - b), -(f + n) / (f - n), 1.0),
            ),
        };
        Ok(m.to_cols_array())
    }
}

/// View matrix looking from `eye` along `dir`, up defaulting to +Y.
///
/// Degenerate inputs still give an orthonormal view: a zero `dir` looks
/// along +Z, and an `up` that is zero or parallel to the view direction is
/// replaced by a fixed axis orthogonal to it.
pub fn look_to(eye: &[f32; 3], dir: &[f32; 3], up: Option<&[f32; 3]>) -> [f32; 16] {
    let mut f = normalize_or_zero(Vec3::from_array(*dir));
    if f == Vec3::ZERO {
        debug!("zero view direction, looking along +Z");
        f = Vec3::Z;
    }
    let mut up = up.map_or(Vec3::Y, |u| normalize_or_zero(Vec3::from_array(*u)));
    if up.cross(f).length() <= f32::EPSILON {
        debug!(?up, "up vector parallel to view direction");
        up = f.any_orthonormal_vector();
    }
    Mat4::look_to_lh(Vec3::from_array(*eye), f, up).to_cols_array()
}

/// View matrix looking from `eye` at the point `at`.
pub fn look_at(eye: &[f32; 3], at: &[f32; 3], up: Option<&[f32; 3]>) -> [f32; 16] {
    look_to(eye, &sub3(at, eye), up)
}

pub fn lookat_matrix(
    stack: &mut ValueStack,
    eye: &[f32; 3],
    at: &[f32; 3],
    up: Option<&[f32; 3]>,
) -> MathResult<StackOffset> {
    stack.push(LinearType::Matrix4, &look_at(eye, at, up))
}

pub fn lookto_matrix(
    stack: &mut ValueStack,
    eye: &[f32; 3],
    dir: &[f32; 3],
    up: Option<&[f32; 3]>,
) -> MathResult<StackOffset> {
    stack.push(LinearType::Matrix4, &look_to(eye, dir, up))
}

pub fn frustum_lh(
    stack: &mut ValueStack,
    volume: &ViewVolume,
    depth: DepthRange,
) -> MathResult<StackOffset> {
    let m = volume.frustum(depth)?;
    stack.push(LinearType::Matrix4, &m)
}

pub fn ortho_lh(
    stack: &mut ValueStack,
    volume: &ViewVolume,
    depth: DepthRange,
) -> MathResult<StackOffset> {
    let m = volume.ortho(depth)?;
    stack.push(LinearType::Matrix4, &m)
}
