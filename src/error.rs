//! Error taxonomy for the engine.
//!
//! The engine is a pure function library: it never retries or recovers.
//! Errors signal a caller contract violation (an operation paired with a
//! document or stream from the wrong revision) and are fatal to that call.
//! Recovery - rebasing, refetching, resyncing - belongs to the session
//! layer that owns the operations.

use thiserror::Error;

/// Errors produced by strict construction and by [`apply`](crate::Operation::apply).
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum OtError {
    /// A component violates its kind's length invariant, e.g. `Delete(0)`.
    ///
    /// Only the strict construction paths raise this; lenient
    /// normalization silently drops malformed components instead, since
    /// callers may legitimately build operations incrementally.
    #[error("invalid component: {kind} of length {len}")]
    InvalidComponent {
        /// The component kind, `"retain"`, `"insert"`, or `"delete"`.
        kind: &'static str,
        /// The offending length.
        len: usize,
    },

    /// An operation consumed past the end of the document it was applied to.
    ///
    /// This always means the operation was built against a different
    /// revision of the document than the one supplied.
    #[error("operation consumes {consumed} characters but the document has {available}")]
    LengthMismatch {
        /// Characters of base document the operation consumes.
        consumed: usize,
        /// Characters actually available in the document.
        available: usize,
    },
}
