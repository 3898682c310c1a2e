use core::{convert::Infallible, future::Future, time::Duration};
use std::collections::HashMap;

use parking_lot::Mutex;

use crate::{CodeCache, RawCode, SystemClock, TimeSource};

#[derive(Debug)]
struct Entry {
    codes: Vec<RawCode>,
    expires_at: u64,
}

/// An in-process [`CodeCache`] with per-entry TTL.
///
/// Expiry is checked against the injected [`TimeSource`] on every read;
/// stale entries read as absent and are removed on the spot. Nothing runs in
/// the background, so call [`purge_expired`](Self::purge_expired) if keys are
/// written once and never read again.
///
/// Only shares state within one process. Allocators in different processes
/// need a shared backend behind the same trait.
///
/// # Example
///
/// ```
/// use clientcode::MemoryCache;
/// use std::time::Duration;
///
/// let cache = MemoryCache::new();
/// cache.insert("recent", vec![3, 2, 1], Duration::from_secs(10));
/// assert_eq!(cache.lookup("recent"), Some(vec![3, 2, 1]));
/// assert_eq!(cache.lookup("other"), None);
/// ```
#[derive(Debug)]
pub struct MemoryCache<T = SystemClock> {
    entries: Mutex<HashMap<String, Entry>>,
    time: T,
}

impl MemoryCache<SystemClock> {
    /// Creates an empty cache driven by the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for MemoryCache<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> MemoryCache<T>
where
    T: TimeSource<u64>,
{
    /// Creates an empty cache that measures TTLs with `time`.
    pub fn with_clock(time: T) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            time,
        }
    }

    /// Returns a copy of the live entry under `key`.
    pub fn lookup(&self, key: &str) -> Option<Vec<RawCode>> {
        let now = self.time.current_millis();
        let mut entries = self.entries.lock();
        let expired = match entries.get(key) {
            Some(entry) if entry.expires_at > now => return Some(entry.codes.clone()),
            Some(_) => true,
            None => false,
        };
        if expired {
            entries.remove(key);
        }
        None
    }

    /// Stores `codes` under `key`, replacing any previous entry.
    pub fn insert(&self, key: &str, codes: Vec<RawCode>, ttl: Duration) {
        let ttl_millis = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX);
        let expires_at = self.time.current_millis().saturating_add(ttl_millis);
        self.entries
            .lock()
            .insert(key.to_owned(), Entry { codes, expires_at });
    }

    /// Removes `key`, returning its codes if the entry was still live.
    pub fn remove(&self, key: &str) -> Option<Vec<RawCode>> {
        let now = self.time.current_millis();
        self.entries
            .lock()
            .remove(key)
            .filter(|entry| entry.expires_at > now)
            .map(|entry| entry.codes)
    }

    /// Drops every expired entry and returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = self.time.current_millis();
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|_, entry| entry.expires_at > now);
        before - entries.len()
    }

    /// Number of stored entries, including expired ones not yet purged.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl<T> CodeCache for MemoryCache<T>
where
    T: TimeSource<u64>,
{
    type Error = Infallible;

    fn get(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<Vec<RawCode>>, Self::Error>> + Send {
        core::future::ready(Ok(self.lookup(key)))
    }

    fn set(
        &self,
        key: &str,
        codes: Vec<RawCode>,
        ttl: Duration,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send {
        self.insert(key, codes, ttl);
        core::future::ready(Ok(()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    };

    #[derive(Clone, Default)]
    struct ManualClock(Arc<AtomicU64>);

    impl ManualClock {
        fn advance(&self, millis: u64) {
            self.0.fetch_add(millis, Ordering::Relaxed);
        }
    }

    impl TimeSource<u64> for ManualClock {
        fn current_millis(&self) -> u64 {
            self.0.load(Ordering::Relaxed)
        }
    }

    const TTL: Duration = Duration::from_secs(10);

    #[test]
    fn entry_is_live_until_ttl_elapses() {
        let clock = ManualClock::default();
        let cache = MemoryCache::with_clock(clock.clone());
        cache.insert("k", vec![1, 2], TTL);

        clock.advance(9_999);
        assert_eq!(cache.lookup("k"), Some(vec![1, 2]));

        clock.advance(1);
        assert_eq!(cache.lookup("k"), None);
        assert!(cache.is_empty(), "expired entry should be evicted on read");
    }

    #[test]
    fn insert_replaces_and_resets_ttl() {
        let clock = ManualClock::default();
        let cache = MemoryCache::with_clock(clock.clone());
        cache.insert("k", vec![1], TTL);
        clock.advance(8_000);
        cache.insert("k", vec![2, 1], TTL);
        clock.advance(8_000);

        assert_eq!(cache.lookup("k"), Some(vec![2, 1]));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn purge_drops_only_expired_entries() {
        let clock = ManualClock::default();
        let cache = MemoryCache::with_clock(clock.clone());
        cache.insert("short", vec![1], Duration::from_secs(1));
        cache.insert("long", vec![2], TTL);

        clock.advance(5_000);

        assert_eq!(cache.purge_expired(), 1);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.remove("long"), Some(vec![2]));
        assert!(cache.is_empty());
    }

    #[test]
    fn zero_ttl_never_reads_back() {
        let cache = MemoryCache::with_clock(ManualClock::default());
        cache.insert("k", vec![1], Duration::ZERO);
        assert_eq!(cache.lookup("k"), None);
    }

    #[tokio::test]
    async fn cache_trait_round_trips_through_lookup() {
        let cache = MemoryCache::new();
        assert_eq!(cache.get("k").await.unwrap(), None);

        cache.set("k", vec![4, 3], TTL).await.unwrap();

        assert_eq!(cache.get("k").await.unwrap(), Some(vec![4, 3]));
    }
}
