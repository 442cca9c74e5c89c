//! Copy policy.

use crate::CopyError;

/// Policy for a copy call.
///
/// The default is unbounded: the engine grows the stack as needed (see
/// `deep_stack`), so depth is limited only by memory.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct CopyConfig {
    max_depth: Option<u32>,
}

impl CopyConfig {
    /// No depth limit.
    pub const fn unbounded() -> Self {
        Self { max_depth: None }
    }

    /// Fail with [`CopyError::DepthLimitExceeded`] once the traversal nests
    /// deeper than `limit` reference or container steps.
    pub const fn bounded(limit: u32) -> Self {
        Self {
            max_depth: Some(limit),
        }
    }

    /// Maximum nesting depth, or `None` for unlimited.
    #[inline]
    pub const fn max_depth(&self) -> Option<u32> {
        self.max_depth
    }

    /// Check that one more level of nesting below `depth` is allowed.
    #[inline]
    pub(crate) fn check_depth(&self, depth: u32) -> Result<(), CopyError> {
        match self.max_depth {
            Some(limit) if depth >= limit => Err(CopyError::DepthLimitExceeded { limit }),
            _ => Ok(()),
        }
    }
}
