//! Content-addressed index cache using moka
//!
//! Built indexes are keyed by a Blake3 digest of the raw migration table
//! bytes and the collision policy used to build them. Editing the table
//! changes the digest, so a stale index is never returned for new data.

use moka::sync::Cache;
use reloc_index::{CollisionPolicy, MigrationIndex};
use std::fmt::{self, Display, Formatter};
use std::sync::Arc;

/// Digest of a migration source plus its build policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourceDigest([u8; 32]);

impl SourceDigest {
    /// Compute digest of table bytes built under `policy`
    #[must_use]
    pub fn compute(source: &[u8], policy: CollisionPolicy) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(source);
        hasher.update(&[policy_tag(policy)]);
        Self(*hasher.finalize().as_bytes())
    }

    /// Get reference to the underlying bytes
    #[inline]
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Short string representation (first 16 hex chars)
    #[inline]
    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..8])
    }
}

impl Display for SourceDigest {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

fn policy_tag(policy: CollisionPolicy) -> u8 {
    match policy {
        CollisionPolicy::Reject => 0,
        CollisionPolicy::FirstWins => 1,
        CollisionPolicy::LastWins => 2,
    }
}

/// Statistics for cache monitoring
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of entries in cache
    pub entry_count: u64,
}

/// Cache of built migration indexes
///
/// Cloning is cheap and clones share storage.
#[derive(Debug, Clone)]
pub struct IndexCache {
    inner: Cache<SourceDigest, Arc<MigrationIndex>>,
}

impl IndexCache {
    /// Create new cache holding at most `max_capacity` indexes
    #[inline]
    #[must_use]
    pub fn new(max_capacity: u64) -> Self {
        Self {
            inner: Cache::new(max_capacity),
        }
    }

    /// Get index from cache
    #[inline]
    #[must_use]
    pub fn get(&self, digest: &SourceDigest) -> Option<Arc<MigrationIndex>> {
        self.inner.get(digest)
    }

    /// Insert index into cache
    #[inline]
    pub fn insert(&self, digest: SourceDigest, index: Arc<MigrationIndex>) {
        self.inner.insert(digest, index);
    }

    /// Return the cached index for `source`, building it on a miss
    ///
    /// A failed build caches nothing.
    ///
    /// # Errors
    /// Propagates the error returned by `build`.
    pub fn get_or_build<E, F>(
        &self,
        source: &[u8],
        policy: CollisionPolicy,
        build: F,
    ) -> Result<Arc<MigrationIndex>, E>
    where
        F: FnOnce() -> Result<MigrationIndex, E>,
    {
        let digest = SourceDigest::compute(source, policy);

        if let Some(cached) = self.get(&digest) {
            tracing::debug!(digest = %digest.short(), "index cache hit");
            return Ok(cached);
        }

        let index = Arc::new(build()?);
        tracing::debug!(digest = %digest.short(), records = index.len(), "index cache miss, built");
        self.insert(digest, Arc::clone(&index));

        Ok(index)
    }

    /// Invalidate cache entry
    #[inline]
    pub fn invalidate(&self, digest: &SourceDigest) {
        self.inner.invalidate(digest);
    }

    /// Invalidate all entries
    #[inline]
    pub fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }

    /// Check if cache contains digest
    #[inline]
    #[must_use]
    pub fn contains(&self, digest: &SourceDigest) -> bool {
        self.inner.contains_key(digest)
    }

    /// Get approximate entry count
    #[inline]
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.inner.entry_count()
    }

    /// Get cache statistics
    ///
    /// Flushes pending maintenance first so the count is current.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.inner.run_pending_tasks();
        CacheStats {
            entry_count: self.entry_count(),
        }
    }
}

impl Default for IndexCache {
    /// Create cache with default capacity (16 indexes)
    fn default() -> Self {
        Self::new(16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reloc_index::{IndexError, MigrationRecord};

    fn build() -> Result<MigrationIndex, IndexError> {
        MigrationIndex::build(vec![MigrationRecord::new("a", "b", "c", "d")])
    }

    #[test]
    fn digest_depends_on_bytes_and_policy() {
        let a = SourceDigest::compute(b"table", CollisionPolicy::LastWins);
        assert_eq!(a, SourceDigest::compute(b"table", CollisionPolicy::LastWins));
        assert_ne!(a, SourceDigest::compute(b"table!", CollisionPolicy::LastWins));
        assert_ne!(a, SourceDigest::compute(b"table", CollisionPolicy::Reject));
    }

    #[test]
    fn digest_short_and_display() {
        let digest = SourceDigest::compute(b"x", CollisionPolicy::default());
        assert_eq!(digest.short().len(), 16);
        assert_eq!(digest.to_string().len(), 64);
        assert!(digest.to_string().starts_with(&digest.short()));
    }

    #[test]
    fn second_lookup_hits() {
        let cache = IndexCache::default();
        let mut builds = 0;

        let first = cache
            .get_or_build(b"src", CollisionPolicy::LastWins, || {
                builds += 1;
                build()
            })
            .unwrap();
        let second = cache
            .get_or_build(b"src", CollisionPolicy::LastWins, || {
                builds += 1;
                build()
            })
            .unwrap();

        assert_eq!(builds, 1);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn changed_source_rebuilds() {
        let cache = IndexCache::default();
        let first = cache.get_or_build(b"v1", CollisionPolicy::LastWins, build).unwrap();
        let second = cache.get_or_build(b"v2", CollisionPolicy::LastWins, build).unwrap();

        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(cache.stats().entry_count, 2);
    }

    #[test]
    fn failed_build_is_not_cached() {
        let cache = IndexCache::default();
        let failed: Result<_, IndexError> = cache.get_or_build(b"bad", CollisionPolicy::Reject, || {
            MigrationIndex::build(vec![MigrationRecord::new("", "b", "c", "d")])
        });

        assert!(failed.is_err());
        assert!(!cache.contains(&SourceDigest::compute(b"bad", CollisionPolicy::Reject)));
    }

    #[test]
    fn invalidate_removes_entry() {
        let cache = IndexCache::new(4);
        cache.get_or_build(b"src", CollisionPolicy::LastWins, build).unwrap();
        let digest = SourceDigest::compute(b"src", CollisionPolicy::LastWins);

        assert!(cache.contains(&digest));
        cache.invalidate(&digest);
        assert!(!cache.contains(&digest));

        cache.get_or_build(b"src", CollisionPolicy::LastWins, build).unwrap();
        cache.invalidate_all();
        assert!(!cache.contains(&digest));
    }
}
