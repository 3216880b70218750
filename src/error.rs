//! Error types reported by buffer operations.
//!
//! Three conditions cover the whole contract: a violated precondition on
//! caller-supplied sizes or ranges, an allocator that could not satisfy a
//! request, and an operation that needs live storage finding none. Every
//! error is surfaced synchronously to the immediate caller; nothing is
//! swallowed or retried internally.

use thiserror::Error;

/// Errors produced by [`Buffer`](crate::Buffer) operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BufferError {
    /// A precondition on a caller-supplied size, index, or range was
    /// violated before any mutation began.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// The global allocator could not satisfy a sizing request.
    ///
    /// For a failed in-place resize the buffer's prior state remains valid
    /// and unchanged.
    #[error("allocation of {bytes} bytes failed")]
    AllocationFailure {
        /// Total byte size of the request that was refused.
        bytes: usize,
    },

    /// The operation requires live storage, but the buffer owns none.
    #[error("buffer owns no storage")]
    IllegalState,
}

/// Crate-wide result alias for buffer operations.
pub type BufferResult<T> = Result<T, BufferError>;
