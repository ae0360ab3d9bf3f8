//! math3d Configuration
//!
//! Defines arena limits and the clip-space depth convention of a stack
//! instance. Configuration specifies constraints only; enforcement is handled
//! by the value stack and the projection builders.

use serde::{Deserialize, Serialize};

/// Clip-space Z convention used when building projection matrices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DepthRange {
    /// Non-homogeneous depth: near maps to 0, far maps to 1.
    #[default]
    ZeroToOne,
    /// Homogeneous depth: near maps to -1, far maps to 1.
    NegativeOneToOne,
}

impl DepthRange {
    /// Map the host's `homogeneous_depth` flag to a depth range.
    pub fn from_homogeneous(homogeneous_depth: bool) -> Self {
        if homogeneous_depth {
            DepthRange::NegativeOneToOne
        } else {
            DepthRange::ZeroToOne
        }
    }

    pub fn is_homogeneous(self) -> bool {
        self == DepthRange::NegativeOneToOne
    }
}

/// Stack instance configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackConfig {
    /// Floats reserved in the arena up front
    pub initial_capacity: usize,

    /// Hard arena limit in floats; `None` grows without bound
    pub max_capacity: Option<usize>,

    /// Depth convention threaded through projection construction
    pub depth_range: DepthRange,
}

impl Default for StackConfig {
    fn default() -> Self {
        StackConfig {
            initial_capacity: 1024,
            max_capacity: None,
            depth_range: DepthRange::ZeroToOne,
        }
    }
}

impl StackConfig {
    /// Create a new configuration with default limits
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration for a fixed-size arena of `max_floats` floats.
    pub fn bounded(max_floats: usize) -> Self {
        StackConfig {
            initial_capacity: max_floats,
            max_capacity: Some(max_floats),
            ..Self::default()
        }
    }

    pub fn with_initial_capacity(mut self, floats: usize) -> Self {
        self.initial_capacity = floats;
        self
    }

    pub fn with_max_capacity(mut self, floats: Option<usize>) -> Self {
        self.max_capacity = floats;
        self
    }

    pub fn with_depth_range(mut self, depth_range: DepthRange) -> Self {
        self.depth_range = depth_range;
        self
    }
}
