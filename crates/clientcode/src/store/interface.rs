use core::future::Future;
use std::sync::Arc;

use crate::RawCode;

/// One code-tagged record as returned by a [`CodeStore`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CodeRecord {
    /// The record's client code, if it has one.
    pub code: Option<RawCode>,
    /// Creation time in milliseconds; stores order by this, newest first.
    pub created_at: u64,
}

impl CodeRecord {
    pub const fn new(code: Option<RawCode>, created_at: u64) -> Self {
        Self { code, created_at }
    }
}

/// The persistent record store that seeds a cold cache.
///
/// Implementations return the `limit` most recently created records that
/// carry a code, newest first. The allocator filters empty codes again on its
/// side, so a store that lets a `NULL` or `0` slip through is harmless.
///
/// Connection handling, retries and timeouts belong to the implementation. An
/// `Err` sends the allocator straight to its contingency code.
pub trait CodeStore {
    /// Error reported when the query fails.
    type Error: core::error::Error + Send + Sync + 'static;

    /// Fetches up to `limit` recent records with a code, newest first.
    fn recent_codes(
        &self,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<CodeRecord>, Self::Error>> + Send;
}

impl<S: CodeStore> CodeStore for &S {
    type Error = S::Error;

    fn recent_codes(
        &self,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<CodeRecord>, Self::Error>> + Send {
        (**self).recent_codes(limit)
    }
}

impl<S: CodeStore> CodeStore for Arc<S> {
    type Error = S::Error;

    fn recent_codes(
        &self,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<CodeRecord>, Self::Error>> + Send {
        (**self).recent_codes(limit)
    }
}
