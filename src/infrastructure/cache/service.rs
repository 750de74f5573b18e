//! Cache service trait and error types.

use async_trait::async_trait;
use std::fmt;

/// Errors that can occur during cache operations.
#[derive(Debug)]
pub enum CacheError {
    ConnectionError(String),
    OperationError(String),
}

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::ConnectionError(e) => write!(f, "Cache connection error: {}", e),
            Self::OperationError(e) => write!(f, "Cache operation error: {}", e),
        }
    }
}

impl std::error::Error for CacheError {}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Trait for caching short URL mappings on the redirect path.
///
/// Implementations must be thread-safe and fail open: a cache failure
/// degrades to a database lookup, never to a failed redirect. Only active
/// links are ever cached, and entries are invalidated whenever a link's
/// visibility changes or it is deleted.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed cache with TTL support
/// - [`crate::infrastructure::cache::NullCache`] - No-op implementation for disabled caching
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Retrieves the target URL for a short code from cache.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(url))` on cache hit
    /// - `Ok(None)` on cache miss or error (fail-open behavior)
    async fn get_url(&self, short_code: &str) -> CacheResult<Option<String>>;

    /// Stores a URL mapping in cache with optional TTL.
    ///
    /// # Arguments
    ///
    /// - `short_code` - The short code key
    /// - `url` - The redirect target to cache
    /// - `ttl_seconds` - Optional TTL in seconds (implementation default if None)
    ///
    /// # Errors
    ///
    /// Should not propagate errors to callers. Implementations log errors
    /// and return `Ok(())` to avoid disrupting the request flow.
    async fn set_url(
        &self,
        short_code: &str,
        url: &str,
        ttl_seconds: Option<usize>,
    ) -> CacheResult<()>;

    /// Removes a cached URL mapping.
    ///
    /// Used when a link is deleted or its visibility changes.
    async fn invalidate(&self, short_code: &str) -> CacheResult<()>;

    /// Checks if the cache backend is healthy.
    ///
    /// Used by the health check endpoint to report cache status.
    async fn health_check(&self) -> bool;
}
