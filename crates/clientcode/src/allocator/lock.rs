use core::future::Future;

use futures::lock::Mutex;
#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    Allocation, ClientCode, ClientCodeAllocator, ClientCodeGenerator, CodeCache, CodeStore,
    RandSource, SystemClock, ThreadRandom, TimeSource,
};

/// A [`ClientCodeAllocator`] whose calls are serialized by an async mutex.
///
/// Each allocation holds the lock across its whole read-compute-write cycle,
/// so callers sharing this instance never read the same cached list and
/// never receive the same authoritative code while it is still in the
/// recent list. Exclusion is per instance: allocators in other processes (or
/// other instances over the same cache key) can still race.
///
/// ## Concurrency
/// - ✅ Thread-safe
/// - ✅ No duplicate authoritative codes among callers of one instance
/// - ❌ Calls queue behind each other, including their cache and store I/O
///
/// # Example
///
/// ```
/// use clientcode::{ClientCodeAllocator, LockClientCodeAllocator, MemoryCache, MemoryStore};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let allocator = LockClientCodeAllocator::new(ClientCodeAllocator::new(
///     MemoryCache::new(),
///     MemoryStore::new(),
/// ));
/// assert_eq!(allocator.generate_client_code().await.get(), 1);
/// # }
/// ```
#[derive(Debug)]
pub struct LockClientCodeAllocator<C, S, T = SystemClock, R = ThreadRandom> {
    inner: ClientCodeAllocator<C, S, T, R>,
    lock: Mutex<()>,
}

impl<C, S, T, R> LockClientCodeAllocator<C, S, T, R>
where
    C: CodeCache,
    S: CodeStore,
    T: TimeSource<u64>,
    R: RandSource<u64>,
{
    /// Wraps `inner` so its allocations run one at a time.
    pub fn new(inner: ClientCodeAllocator<C, S, T, R>) -> Self {
        Self {
            inner,
            lock: Mutex::new(()),
        }
    }

    /// Returns the wrapped allocator.
    pub fn inner(&self) -> &ClientCodeAllocator<C, S, T, R> {
        &self.inner
    }

    pub fn into_inner(self) -> ClientCodeAllocator<C, S, T, R> {
        self.inner
    }

    /// Allocates a client code once no other call on this instance is in
    /// flight.
    pub async fn generate_client_code(&self) -> ClientCode {
        self.allocate().await.code()
    }

    /// Like [`ClientCodeAllocator::allocate`], serialized.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub async fn allocate(&self) -> Allocation {
        let _guard = self.lock.lock().await;
        self.inner.allocate().await
    }
}

impl<C, S, T, R> From<ClientCodeAllocator<C, S, T, R>> for LockClientCodeAllocator<C, S, T, R>
where
    C: CodeCache,
    S: CodeStore,
    T: TimeSource<u64>,
    R: RandSource<u64>,
{
    fn from(inner: ClientCodeAllocator<C, S, T, R>) -> Self {
        Self::new(inner)
    }
}

impl<C, S, T, R> ClientCodeGenerator for LockClientCodeAllocator<C, S, T, R>
where
    C: CodeCache + Sync,
    S: CodeStore + Sync,
    T: TimeSource<u64> + Sync,
    R: RandSource<u64> + Sync,
{
    fn next_allocation(&self) -> impl Future<Output = Allocation> + Send {
        self.allocate()
    }

    fn next_code(&self) -> impl Future<Output = ClientCode> + Send {
        self.generate_client_code()
    }
}
