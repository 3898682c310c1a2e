use core::{any::Any, future::Future, panic::AssertUnwindSafe};

use futures::FutureExt;
#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    Allocation, AllocatorConfig, ClientCode, ClientCodeGenerator, CodeCache, CodeSource,
    CodeStore, ConfigError, ContingencyGenerator, ContingencyReason, Error, RandSource,
    RecentCodes, Result, SystemClock, ThreadRandom, TimeSource, next_code,
};

/// Cache-first client code allocator.
///
/// Each call reads the recent-codes list from the cache, falls back to the
/// record store when the cache is cold, picks the next free code, and writes
/// the updated list back. Any failure along the way (store error, exhausted
/// range, panicking collaborator) yields a code from the
/// [`ContingencyGenerator`] instead, and nothing is written to the cache in
/// that case.
///
/// ## Concurrency
/// - ✅ `Send + Sync` when the collaborators are
/// - ❌ No mutual exclusion: two concurrent calls can read the same cached
///   list and return the same code
///
/// Serialize calls with [`LockClientCodeAllocator`] when duplicates within a
/// process are not acceptable.
///
/// # Example
///
/// ```
/// use clientcode::{ClientCodeAllocator, MemoryCache, MemoryStore};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let allocator = ClientCodeAllocator::new(MemoryCache::new(), MemoryStore::new());
///
/// assert_eq!(allocator.generate_client_code().await.get(), 1);
/// assert_eq!(allocator.generate_client_code().await.get(), 2);
/// # }
/// ```
///
/// [`LockClientCodeAllocator`]: crate::LockClientCodeAllocator
#[derive(Debug)]
pub struct ClientCodeAllocator<C, S, T = SystemClock, R = ThreadRandom> {
    cache: C,
    store: S,
    config: AllocatorConfig,
    contingency: ContingencyGenerator<T, R>,
}

impl<C, S> ClientCodeAllocator<C, S>
where
    C: CodeCache,
    S: CodeStore,
{
    /// Creates an allocator with the default [`AllocatorConfig`] and the
    /// system clock and thread RNG for contingency codes.
    pub fn new(cache: C, store: S) -> Self {
        Self {
            cache,
            store,
            config: AllocatorConfig::default(),
            contingency: ContingencyGenerator::default(),
        }
    }

    /// Creates an allocator with explicit settings.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] from [`AllocatorConfig::validate`].
    pub fn with_config(
        cache: C,
        store: S,
        config: AllocatorConfig,
    ) -> Result<Self, ConfigError> {
        Self::from_components(cache, store, config, ContingencyGenerator::default())
    }
}

impl<C, S, T, R> ClientCodeAllocator<C, S, T, R>
where
    C: CodeCache,
    S: CodeStore,
    T: TimeSource<u64>,
    R: RandSource<u64>,
{
    /// Creates an allocator from all of its parts.
    ///
    /// Mostly useful for injecting a deterministic contingency generator.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] from [`AllocatorConfig::validate`]. A zero
    /// recent limit would leave the cached list empty after every write, so
    /// each call would hand out the same code.
    pub fn from_components(
        cache: C,
        store: S,
        config: AllocatorConfig,
        contingency: ContingencyGenerator<T, R>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            cache,
            store,
            config,
            contingency,
        })
    }

    pub fn config(&self) -> &AllocatorConfig {
        &self.config
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Allocates a client code.
    ///
    /// Always returns a code in `[1, 999]`. Use [`Self::allocate`] to also
    /// learn whether the code is authoritative.
    pub async fn generate_client_code(&self) -> ClientCode {
        self.allocate().await.code()
    }

    /// Allocates a client code and reports its provenance.
    ///
    /// Never fails: store errors, range exhaustion and panics inside the
    /// cache or store all end in [`Allocation::Contingency`].
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip(self), fields(key = %self.config.cache_key()))
    )]
    pub async fn allocate(&self) -> Allocation {
        let outcome = match AssertUnwindSafe(self.try_allocate()).catch_unwind().await {
            Ok(outcome) => outcome,
            Err(payload) => Err(Error::Panicked(panic_message(&*payload))),
        };

        match outcome {
            Ok((code, source)) => {
                #[cfg(feature = "tracing")]
                tracing::info!(%code, ?source, "client code allocated");
                Allocation::Authoritative { code, source }
            }
            Err(err) => self.fall_back(&err),
        }
    }

    fn fall_back(&self, err: &Error) -> Allocation {
        let code = self.contingency.next_code();
        let reason = ContingencyReason::from(err);

        #[cfg(feature = "tracing")]
        match reason {
            ContingencyReason::Exhausted => {
                tracing::warn!(%code, error = %err, "using contingency client code");
            }
            ContingencyReason::StoreUnavailable | ContingencyReason::Unexpected => {
                tracing::error!(%code, error = %err, "using contingency client code");
            }
        }

        Allocation::Contingency { code, reason }
    }

    async fn try_allocate(&self) -> Result<(ClientCode, CodeSource)> {
        if let Some(cached) = self.read_cache().await {
            let code = next_code(cached.as_slice()).ok_or(Error::Exhausted)?;
            self.refresh(code, cached).await;
            return Ok((code, CodeSource::Cache));
        }

        let records = self
            .store
            .recent_codes(self.config.recent_limit())
            .await
            .map_err(|err| Error::Store(Box::new(err)))?;
        let recent = RecentCodes::from_records(&records);

        let code = next_code(recent.as_slice()).ok_or(Error::Exhausted)?;
        self.refresh(code, recent).await;
        Ok((code, CodeSource::Store))
    }

    /// Reads the cached list. Errors and empty lists count as a miss.
    async fn read_cache(&self) -> Option<RecentCodes> {
        match self.cache.get(self.config.cache_key()).await {
            Ok(Some(raw)) => {
                let recent = RecentCodes::from_raw(raw);
                if recent.is_empty() {
                    #[cfg(feature = "tracing")]
                    tracing::debug!("cached recent codes empty");
                    None
                } else {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(len = recent.len(), "cache hit");
                    Some(recent)
                }
            }
            Ok(None) => {
                #[cfg(feature = "tracing")]
                tracing::debug!("cache miss");
                None
            }
            Err(err) => {
                let _err = Error::Cache(Box::new(err));
                #[cfg(feature = "tracing")]
                tracing::warn!(error = %_err, "cache read failed, querying store");
                None
            }
        }
    }

    async fn refresh(&self, code: ClientCode, mut recent: RecentCodes) {
        recent.push_front(code, self.config.recent_limit());
        let written = self
            .cache
            .set(self.config.cache_key(), recent.to_raw(), self.config.ttl())
            .await
            .map_err(|err| Error::Cache(Box::new(err)));
        if let Err(_err) = written {
            #[cfg(feature = "tracing")]
            tracing::warn!(error = %_err, "cache write failed");
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_owned()
    }
}

impl<C, S, T, R> ClientCodeGenerator for ClientCodeAllocator<C, S, T, R>
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
