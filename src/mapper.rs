use crate::types::RemoteCacheRef;

/// Resolves configured cross-site backup relationships. Read-only queries
/// against externally-owned, always-current configuration.
pub trait CacheSiteMapper: Send + Sync {
    /// Remote (site, cache) pairs with an asynchronous backup relationship
    /// sourced from the given local cache.
    fn find_remote_caches_with_async_backup(&self, cache_name: &str) -> Vec<RemoteCacheRef>;

    /// Remote cache names known to replicate to/from the given site.
    fn remote_caches_from_site(&self, site_name: &str) -> Vec<String>;
}
