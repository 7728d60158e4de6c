use thiserror::Error;

use crate::pool::Handle;

/// Result type alias using the crate's [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Errors reported by the pool allocator and the tree.
///
/// Searching for a missing value and removing a value that is not present are
/// not errors; those operations report their outcome through `bool`/`Option`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
pub enum Error {
    /// The pool could not obtain storage for a new block.
    ///
    /// Returned when the configured block limit is reached, when the handle
    /// space is exhausted, or when the system allocator refuses the request.
    #[error("out of memory: unable to allocate a new pool block")]
    OutOfMemory,

    /// A handle was released that is not a live slot of any block.
    #[error("invalid free: {0:?} is not a live slot of any block")]
    InvalidFree(Handle),

    /// A batch request asked for anything other than a single object.
    #[error("unsupported batch size {0}: only single-object requests are supported")]
    UnsupportedBatchSize(usize),

    /// The minimum or maximum of an empty tree was requested.
    #[error("the tree is empty")]
    EmptyTree,
}
