//! Error types for client code allocation.
//!
//! None of these reach the caller of [`ClientCodeAllocator::allocate`]: every
//! failure collapses into a contingency code. They exist so the allocator can
//! classify what went wrong and log it.
//!
//! [`ClientCodeAllocator::allocate`]: crate::ClientCodeAllocator::allocate

use crate::{ClientCode, ContingencyReason, RawCode};

/// A type-erased collaborator error.
pub type BoxError = Box<dyn core::error::Error + Send + Sync + 'static>;

/// Result alias defaulting to the crate [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Failures observed while allocating a client code.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The record store could not be queried.
    #[error("store query failed: {0}")]
    Store(#[source] BoxError),

    /// The cache could not be read or written.
    ///
    /// Only logged: a failed read counts as a miss and a failed write keeps
    /// the allocated code.
    #[error("cache operation failed: {0}")]
    Cache(#[source] BoxError),

    /// Every code in the range is already in use.
    #[error("all {} client codes are in use", ClientCode::RANGE)]
    Exhausted,

    /// A collaborator panicked mid-allocation.
    #[error("allocation panicked: {0}")]
    Panicked(String),
}

impl From<&Error> for ContingencyReason {
    fn from(err: &Error) -> Self {
        match err {
            Error::Store(_) => Self::StoreUnavailable,
            Error::Exhausted => Self::Exhausted,
            Error::Cache(_) | Error::Panicked(_) => Self::Unexpected,
        }
    }
}

/// A raw value that does not fit the client code range.
#[derive(thiserror::Error, Clone, Copy, Debug, PartialEq, Eq)]
#[error("client code {0} is outside [1, 999]")]
pub struct InvalidCode(pub RawCode);

/// Rejected [`AllocatorConfig`](crate::AllocatorConfig) values.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("cache key must not be empty")]
    EmptyCacheKey,

    #[error("cache TTL must be greater than zero")]
    ZeroTtl,

    #[error("recent code limit must be greater than zero")]
    ZeroRecentLimit,
}
