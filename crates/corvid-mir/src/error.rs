//! MIR errors
//!
//! Structural operations on MIR nodes never fail: a malformed node is a bug in
//! an earlier pass and panics. The errors here cover the two recoverable
//! boundaries, well-formedness checking of a finished body and decoding a
//! serialized one.

use crate::block::BasicBlockId;
use crate::serial::DecodeError;
use thiserror::Error;

pub type MirResult<T> = Result<T, MirError>;

#[derive(Debug, Error)]
pub enum MirError {
    #[error("Internal compiler error: function body has no blocks")]
    EmptyBody,

    #[error("Internal compiler error: block {block} was never given a terminator")]
    IncompleteTerminator { block: BasicBlockId },

    #[error("Internal compiler error: block {block} jumps to non-existent block {target}")]
    InvalidSuccessor {
        block: BasicBlockId,
        target: BasicBlockId,
    },

    #[error("Internal compiler error: block {block} uses undeclared local {place}")]
    UndeclaredLocal { block: BasicBlockId, place: String },

    #[error("Failed to decode MIR: {0}")]
    Decode(#[from] DecodeError),

    #[error("Failed to read MIR JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl MirError {
    /// Whether this error means the body itself is malformed, as opposed to
    /// the bytes it was read from.
    pub fn is_internal(&self) -> bool {
        !matches!(self, MirError::Decode(_) | MirError::Json(_))
    }
}

/// Abort on a broken MIR invariant.
///
/// A violated invariant means an earlier pass produced a malformed tree, so
/// there is nothing sensible to recover to.
#[macro_export]
macro_rules! mir_bug {
    ($($arg:tt)*) => {
        panic!("internal compiler error: {}", format_args!($($arg)*))
    };
}
