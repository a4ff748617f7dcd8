//! Error types for decode, invoke, and native-type conversion.

use crate::dynamic::TypeTag;
use crate::types::Kind;
use thiserror::Error;

/// Errors that can occur while converting between dynamic and typed values.
///
/// Encoding has no error channel: every well-formed typed value encodes.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The dynamic value's runtime tag cannot be assigned to the target kind.
    #[error("invalid assignment from dynamic type: {tag} to kind: {kind}")]
    KindMismatch { tag: TypeTag, kind: Kind },

    /// The destination passed to `decode_into` is not a settable reference.
    #[error("invalid assignment to kind: {kind} must be a non-nil pointer")]
    InvalidTarget { kind: Kind },

    /// `invoke` was given fewer arguments than the callable declares.
    #[error("expected at least: {expected} arguments but found: {actual}")]
    Arity { expected: usize, actual: usize },

    /// A conversion fault caught mid-traversal: numeric range or precision
    /// loss, or a panic raised by the host collaborator.
    #[error("unexpected fault assigning dynamic type: {tag} to kind: {kind}: {reason}")]
    Fault {
        tag: TypeTag,
        kind: Kind,
        reason: String,
    },

    /// A typed value did not have the shape a native Rust type expects.
    #[error("expected typed value of kind: {expected} but found: {actual}")]
    Conversion { expected: Kind, actual: Kind },
}

impl Error {
    pub(crate) fn mismatch(tag: TypeTag, kind: Kind) -> Self {
        Error::KindMismatch { tag, kind }
    }

    pub(crate) fn fault(tag: TypeTag, kind: Kind, reason: impl Into<String>) -> Self {
        Error::Fault {
            tag,
            kind,
            reason: reason.into(),
        }
    }
}

/// Convenience alias used throughout vert-core.
pub type Result<T> = std::result::Result<T, Error>;
