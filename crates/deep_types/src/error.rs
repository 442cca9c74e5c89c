//! Errors raised while building struct definitions.

use thiserror::Error;

use crate::Idx;

/// Misuse of the declare/define protocol for nominal structs, or a type the
/// pool cannot encode.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TypeDefError {
    #[error("{idx} is not a struct type")]
    NotAStruct { idx: Idx },
    #[error("struct `{name}` is already defined")]
    AlreadyDefined { name: String },
    #[error("array length {len} does not fit in 32 bits")]
    ArrayTooLong { len: usize },
}
