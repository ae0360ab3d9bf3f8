//! math3d Error Types
//!
//! Defines every error condition produced by the value stack, the kernel and
//! the handle table. Numeric edge cases (zero-length normalize, singular
//! inverse, zero-scale axis) are not errors; they have defined outputs.

use thiserror::Error;

use crate::refs::RefId;
use crate::types::LinearType;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MathError {
    // Stack discipline
    #[error("stack is empty")]
    EmptyStack,

    #[error("invalid stack cursor: depth {depth} is not at or below top {top}")]
    InvalidCursor { depth: usize, top: usize },

    #[error("stack capacity exceeded: {requested} floats requested, capacity {capacity}")]
    CapacityExceeded { requested: usize, capacity: usize },

    #[error("no live stack value at offset {0}")]
    InvalidOffset(usize),

    // Value shape
    #[error("{tag} expects {expected} floats, got {found}")]
    SlotCountMismatch {
        tag: LinearType,
        expected: usize,
        found: usize,
    },

    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: LinearType,
    },

    // Handle table
    #[error("unknown handle: {0}")]
    UnknownHandle(RefId),

    // Kernel
    #[error("unsupported operand types: {left} * {right}")]
    UnsupportedOperandTypes { left: LinearType, right: LinearType },

    #[error("degenerate projection volume")]
    DegenerateProjection,
}

pub type MathResult<T> = Result<T, MathError>;
