use core::{future::Future, time::Duration};
use std::sync::Arc;

use crate::RawCode;

/// The volatile cache that holds the recent-codes list between allocations.
///
/// The allocator reads one key, computes the next code, and writes the
/// updated list back with a TTL it chooses. Eviction, storage medium and
/// serialization are up to the implementation.
///
/// A failing [`get`](Self::get) is treated like a miss, so the store stays
/// the authoritative fallback. A failing [`set`](Self::set) is logged and
/// does not change the allocated code.
pub trait CodeCache {
    /// Error reported by the cache backend.
    type Error: core::error::Error + Send + Sync + 'static;

    /// Returns the list stored under `key`, or `None` if it is absent or
    /// expired.
    fn get(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<Vec<RawCode>>, Self::Error>> + Send;

    /// Stores `codes` under `key` for `ttl`.
    fn set(
        &self,
        key: &str,
        codes: Vec<RawCode>,
        ttl: Duration,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;
}

impl<C: CodeCache> CodeCache for &C {
    type Error = C::Error;

    fn get(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<Vec<RawCode>>, Self::Error>> + Send {
        (**self).get(key)
    }

    fn set(
        &self,
        key: &str,
        codes: Vec<RawCode>,
        ttl: Duration,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send {
        (**self).set(key, codes, ttl)
    }
}

impl<C: CodeCache> CodeCache for Arc<C> {
    type Error = C::Error;

    fn get(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<Vec<RawCode>>, Self::Error>> + Send {
        (**self).get(key)
    }

    fn set(
        &self,
        key: &str,
        codes: Vec<RawCode>,
        ttl: Duration,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send {
        (**self).set(key, codes, ttl)
    }
}
