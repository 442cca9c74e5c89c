//! Copy errors.

use std::fmt;

use thiserror::Error;

use crate::Kind;

/// A value reachable from the input has a kind that cannot be copied.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("cannot deep-copy a value of type `{type_name}`: {kind} kind")]
pub struct UnsupportedKindError {
    pub kind: Kind,
    pub type_name: String,
}

impl UnsupportedKindError {
    pub fn new(kind: Kind, type_name: impl Into<String>) -> Self {
        Self {
            kind,
            type_name: type_name.into(),
        }
    }
}

/// Why a copy failed. A failed copy never returns a partial result.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CopyError {
    #[error(transparent)]
    Unsupported(#[from] UnsupportedKindError),

    #[error("copy exceeded the depth limit of {limit}")]
    DepthLimitExceeded { limit: u32 },

    /// A handle names no object in the heap it was read from.
    #[error("dangling handle {handle}")]
    DanglingHandle { handle: String },

    /// The value does not have the shape its type requires.
    #[error("expected a value of type `{type_name}`, found {found}")]
    ShapeMismatch {
        type_name: String,
        found: &'static str,
    },

    /// A shared allocation refers back to itself through a type that has no
    /// interior mutability, so its copy cannot be allocated before its
    /// contents are known.
    #[error("cycle through `{type_name}` cannot be rebuilt")]
    UnbuildableCycle { type_name: String },

    #[error("`{type_name}` is mutably borrowed")]
    Borrowed { type_name: String },
}

impl CopyError {
    /// The unsupported-kind error, if that is what this is.
    pub fn as_unsupported(&self) -> Option<&UnsupportedKindError> {
        match self {
            CopyError::Unsupported(err) => Some(err),
            _ => None,
        }
    }

    pub(crate) fn dangling(handle: impl fmt::Display) -> Self {
        CopyError::DanglingHandle {
            handle: handle.to_string(),
        }
    }

    pub(crate) fn unbuildable(type_name: &str) -> Self {
        CopyError::UnbuildableCycle {
            type_name: type_name.to_owned(),
        }
    }

    pub(crate) fn borrowed(type_name: &str) -> Self {
        CopyError::Borrowed {
            type_name: type_name.to_owned(),
        }
    }
}
