//! Configuration types for tree building

use crate::error::TreeError;

/// Default number of directory levels to descend.
pub const DEFAULT_DEPTH: i64 = 3;

/// Configuration for tree building behavior.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Maximum recursion depth, -1 for unlimited.
    /// Validated when a build starts.
    pub depth: i64,
    /// Render sizes and timestamps as strings instead of numbers
    pub human_readable: bool,
    /// Glob patterns for child names to leave out
    pub ignore_patterns: Vec<String>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
            human_readable: false,
            ignore_patterns: Vec::new(),
        }
    }
}

/// Remaining recursion budget for a directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Depth {
    Unlimited,
    Limited(u32),
}

impl Depth {
    /// Budget for the children of a directory at this depth.
    pub fn descend(self) -> Depth {
        match self {
            Depth::Unlimited => Depth::Unlimited,
            Depth::Limited(n) => Depth::Limited(n.saturating_sub(1)),
        }
    }

    pub fn is_exhausted(self) -> bool {
        self == Depth::Limited(0)
    }
}

impl TryFrom<i64> for Depth {
    type Error = TreeError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Depth::Unlimited),
            n if n >= 0 => u32::try_from(n)
                .map(Depth::Limited)
                .or(Ok(Depth::Unlimited)),
            n => Err(TreeError::InvalidDepth(n)),
        }
    }
}
