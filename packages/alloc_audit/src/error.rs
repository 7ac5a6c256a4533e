use std::collections::TryReserveError;

use thiserror::Error;

/// Reasons the allocation registry could not make room for another record.
///
/// These never reach users of the shim functions. They are translated into a null return,
/// the same way the real allocator reports that it is out of memory.
#[derive(Debug, Error)]
pub(crate) enum Error {
    /// Growing the registry would exceed the configured capacity limit.
    #[error("allocation registry capacity limit of {limit} records reached")]
    CapacityLimitReached { limit: usize },

    /// The registry's own backing storage could not be allocated.
    #[error("allocation registry storage could not grow: {0}")]
    OutOfMemory(#[from] TryReserveError),
}

/// A specialized `Result` type for registry operations, returning the crate's
/// [`Error`] type as the error value.
pub(crate) type Result<T> = std::result::Result<T, Error>;
