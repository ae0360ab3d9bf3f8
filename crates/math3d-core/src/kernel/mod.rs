//! Linear Algebra Kernel
//!
//! Pure functions over fixed-width float arrays, plus stack-producing
//! wrappers that push exactly one tagged result (or, for decomposition, one
//! value per extracted component). A wrapper that fails pushes nothing.
//!
//! Conventions: matrices are 16 floats in column-major order
//! (`m[col * 4 + row]`), quaternions are `(x, y, z, w)`.

pub mod matrix;
pub mod mul;
pub mod projection;
pub mod quat;
pub mod vector;

pub use matrix::{decompose_matrix, inverse_matrix, make_srt, mul_h, transpose_matrix};
pub use mul::{mul_chain, mul_object};
pub use projection::{frustum_lh, lookat_matrix, lookto_matrix, ortho_lh, ViewVolume};
pub use quat::{
    inverse_quat, make_quat_from_axis, make_quat_from_euler, matrix_to_quat, normalize_quat,
    quat_to_matrix, quat_to_viewdir, rotmat_to_viewdir, viewdir_to_quat,
};
pub use vector::{ceil, cross, dot, floor, length, normalize_vector, reciprocal};
