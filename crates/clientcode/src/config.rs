use core::time::Duration;

use crate::{ConfigError, DEFAULT_RECENT_LIMIT};

/// Cache key under which the recent-codes list is stored by default.
pub const DEFAULT_CACHE_KEY: &str = "recent_client_codes";

/// Lifetime of a cached recent-codes list by default.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(10);

/// Allocation settings shared by every call on one allocator.
///
/// Every allocator writing to the same cache key shares one recent-codes
/// list, so the key effectively names a code namespace.
///
/// ```
/// use clientcode::AllocatorConfig;
/// use std::time::Duration;
///
/// let config = AllocatorConfig::default()
///     .with_cache_key("orders:client_codes")
///     .with_ttl(Duration::from_secs(30));
/// assert!(config.validate().is_ok());
/// assert_eq!(config.recent_limit(), 10);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct AllocatorConfig {
    cache_key: String,
    #[cfg_attr(feature = "serde", serde(rename = "ttl_secs", with = "ttl_secs"))]
    ttl: Duration,
    recent_limit: usize,
}

impl Default for AllocatorConfig {
    fn default() -> Self {
        Self {
            cache_key: DEFAULT_CACHE_KEY.to_owned(),
            ttl: DEFAULT_CACHE_TTL,
            recent_limit: DEFAULT_RECENT_LIMIT,
        }
    }
}

impl AllocatorConfig {
    #[must_use]
    pub fn with_cache_key(mut self, cache_key: impl Into<String>) -> Self {
        self.cache_key = cache_key.into();
        self
    }

    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    #[must_use]
    pub fn with_recent_limit(mut self, recent_limit: usize) -> Self {
        self.recent_limit = recent_limit;
        self
    }

    /// Key of the shared recent-codes entry.
    pub fn cache_key(&self) -> &str {
        &self.cache_key
    }

    /// TTL applied on every cache write.
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Number of records fetched from the store and codes kept in the cache.
    pub const fn recent_limit(&self) -> usize {
        self.recent_limit
    }

    /// Checks that the settings can drive an allocator.
    ///
    /// # Errors
    ///
    /// Returns the first offending setting: an empty cache key, a zero TTL,
    /// or a zero recent limit.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache_key.is_empty() {
            return Err(ConfigError::EmptyCacheKey);
        }
        if self.ttl.is_zero() {
            return Err(ConfigError::ZeroTtl);
        }
        if self.recent_limit == 0 {
            return Err(ConfigError::ZeroRecentLimit);
        }
        Ok(())
    }
}

#[cfg(feature = "serde")]
mod ttl_secs {
    use core::time::Duration;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ttl: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(ttl.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}

/// Command-line and environment settings for embedding in a host CLI.
///
/// Flatten into a `clap` parser with `#[command(flatten)]`, then convert with
/// [`AllocatorConfig::try_from`], which validates the values.
#[cfg_attr(docsrs, doc(cfg(feature = "clap")))]
#[cfg(feature = "clap")]
#[derive(clap::Args, Debug, Clone)]
pub struct ConfigArgs {
    /// Cache key holding the recent client codes.
    ///
    /// Environment variable: `CLIENT_CODE_CACHE_KEY`
    #[arg(
        long = "client-code-cache-key",
        env = "CLIENT_CODE_CACHE_KEY",
        default_value_t = String::from(DEFAULT_CACHE_KEY)
    )]
    pub cache_key: String,

    /// Seconds a cached recent-codes list stays valid.
    ///
    /// Environment variable: `CLIENT_CODE_CACHE_TTL_SECS`
    #[arg(
        long = "client-code-cache-ttl-secs",
        env = "CLIENT_CODE_CACHE_TTL_SECS",
        default_value_t = DEFAULT_CACHE_TTL.as_secs()
    )]
    pub cache_ttl_secs: u64,

    /// Number of recent codes read from the store and kept in the cache.
    ///
    /// Environment variable: `CLIENT_CODE_RECENT_LIMIT`
    #[arg(
        long = "client-code-recent-limit",
        env = "CLIENT_CODE_RECENT_LIMIT",
        default_value_t = DEFAULT_RECENT_LIMIT
    )]
    pub recent_limit: usize,
}

#[cfg(feature = "clap")]
impl TryFrom<ConfigArgs> for AllocatorConfig {
    type Error = ConfigError;

    fn try_from(args: ConfigArgs) -> Result<Self, Self::Error> {
        let config = Self::default()
            .with_cache_key(args.cache_key)
            .with_ttl(Duration::from_secs(args.cache_ttl_secs))
            .with_recent_limit(args.recent_limit);
        config.validate()?;
        Ok(config)
    }
}
