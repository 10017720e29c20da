//! Relocator facade
//!
//! Ties configuration, table loading, index caching and passes together.

use crate::cache::IndexCache;
use crate::config::RelocConfig;
use crate::error::{RelocError, RelocResult};
use crate::pass::{worker_pool, Finding, PassSummary, RelocationPass};
use crate::site::CoordinateSite;
use rayon::ThreadPool;
use reloc_index::{MigrationIndex, MigrationRecord};
use reloc_ingest::{read_migrations_csv, IngestError};
use std::path::Path;
use std::sync::Arc;

/// Loaded migration index plus run settings
///
/// The worker pool is started once here and shared by every pass; clones
/// share it too.
#[derive(Debug, Clone)]
pub struct Relocator {
    index: Arc<MigrationIndex>,
    config: RelocConfig,
    pool: Option<Arc<ThreadPool>>,
}

impl Relocator {
    /// Wrap an already built index, starting a pool for `config.workers`
    #[must_use]
    pub fn new(index: Arc<MigrationIndex>, config: RelocConfig) -> Self {
        let pool = worker_pool(config.workers);
        Self { index, config, pool }
    }

    /// Build from in-memory records using the configured collision policy
    ///
    /// # Errors
    /// Returns [`RelocError::Index`] if the records do not form a valid index.
    pub fn from_records<I>(records: I, config: RelocConfig) -> RelocResult<Self>
    where
        I: IntoIterator<Item = MigrationRecord>,
    {
        let index = MigrationIndex::build_with(records, config.collision_policy)?;
        Ok(Self::new(Arc::new(index), config))
    }

    /// Load the table named by `config.table`, reusing a cached index when
    /// the file content is unchanged
    ///
    /// # Errors
    /// Returns [`RelocError::MissingTable`] if no table is configured, or the
    /// error from [`load_table`](Self::load_table).
    pub fn from_config(config: RelocConfig, cache: &IndexCache) -> RelocResult<Self> {
        let table = config.table.clone().ok_or(RelocError::MissingTable)?;
        Self::load_table(&table, config, cache)
    }

    /// Load a migration table file through `cache`
    ///
    /// # Errors
    /// Returns [`RelocError::Ingest`] if the file cannot be read or parsed and
    /// [`RelocError::Index`] if the index cannot be built.
    pub fn load_table(path: &Path, config: RelocConfig, cache: &IndexCache) -> RelocResult<Self> {
        config.validate()?;

        let bytes = std::fs::read(path).map_err(|e| IngestError::io_error(path, e))?;
        let index = cache.get_or_build(&bytes, config.collision_policy, || -> RelocResult<_> {
            let records = read_migrations_csv(bytes.as_slice())?;
            Ok(MigrationIndex::build_with(records, config.collision_policy)?)
        })?;

        let stats = index.stats();
        tracing::info!(
            path = %path.display(),
            records = stats.records,
            coordinates = stats.coordinates,
            group_level = stats.group_level,
            collisions = stats.collisions,
            "migration index ready"
        );

        Ok(Self::new(index, config))
    }

    /// Shared index
    #[inline]
    #[must_use]
    pub fn index(&self) -> &MigrationIndex {
        &self.index
    }

    /// Shared index handle
    #[inline]
    #[must_use]
    pub fn shared_index(&self) -> Arc<MigrationIndex> {
        Arc::clone(&self.index)
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &RelocConfig {
        &self.config
    }

    /// Pass on the shared worker pool
    #[must_use]
    pub fn pass(&self) -> RelocationPass<'_> {
        RelocationPass::new(&self.index).with_pool(self.pool.clone())
    }

    /// Report sites with a known migration
    pub fn scan<S: CoordinateSite>(&self, sites: &[S]) -> Vec<Finding> {
        self.pass().scan(sites)
    }

    /// Rewrite sites with a known migration
    pub fn apply<S: CoordinateSite>(&self, sites: &mut [S]) -> PassSummary {
        self.pass().apply(sites)
    }
}
