//! Relocation passes over coordinate sites
//!
//! A pass borrows an immutable [`MigrationIndex`] and runs every site through
//! it. With more than one worker the sites are split over a rayon pool; the
//! index is shared by reference and results keep site order either way.
//! Pools are reference counted so callers running many passes can build one
//! with [`worker_pool`] and hand it to each pass.

use crate::site::CoordinateSite;
use rayon::prelude::*;
use rayon::ThreadPool;
use reloc_index::{Coordinate, MigrationIndex};
use serde::Serialize;
use std::fmt::{self, Display, Formatter};
use std::sync::Arc;

/// Build a rayon pool with `workers` threads; `None` for 0 or 1
///
/// If the pool cannot be created this logs a warning and returns `None`, so
/// passes run inline.
#[must_use]
pub fn worker_pool(workers: usize) -> Option<Arc<ThreadPool>> {
    if workers <= 1 {
        return None;
    }

    match rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("reloc-worker-{i}"))
        .build()
    {
        Ok(pool) => {
            tracing::debug!(workers, "worker pool started");
            Some(Arc::new(pool))
        }
        Err(e) => {
            tracing::warn!(workers, error = %e, "worker pool unavailable, running inline");
            None
        }
    }
}

/// A site whose coordinate has a known migration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    /// Position of the site in the scanned slice
    pub site: usize,
    /// Site label
    pub label: String,
    /// Declared coordinate
    pub from: Coordinate,
    /// Replacement coordinate
    pub to: Coordinate,
    /// Declared version
    pub version: Option<String>,
    /// Context attached to the migration record
    pub context: Option<String>,
    /// Whether a group-level record produced the match
    pub group_level: bool,
}

impl Finding {
    /// Diagnostic message, `Relocated to group:artifact` or `Relocated to group`
    #[must_use]
    pub fn message(&self) -> String {
        if self.group_level {
            format!("Relocated to {}", self.to.group_id)
        } else {
            format!("Relocated to {}", self.to)
        }
    }
}

impl Display for Finding {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.label, self.from)?;
        if let Some(version) = &self.version {
            write!(f, ":{version}")?;
        }
        write!(f, ": {}", self.message())?;
        if let Some(context) = &self.context {
            write!(f, " ({context})")?;
        }
        Ok(())
    }
}

/// Outcome of [`RelocationPass::apply`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PassSummary {
    /// Sites inspected
    pub scanned: usize,
    /// Sites rewritten
    pub relocated: usize,
    /// One finding per rewritten site, in site order
    pub findings: Vec<Finding>,
}

/// Runs migration lookups over coordinate sites
pub struct RelocationPass<'a> {
    index: &'a MigrationIndex,
    pool: Option<Arc<ThreadPool>>,
}

impl<'a> RelocationPass<'a> {
    /// Create an inline (single-threaded) pass
    #[must_use]
    pub fn new(index: &'a MigrationIndex) -> Self {
        Self { index, pool: None }
    }

    /// Use a fresh pool of `workers` threads; 0 or 1 runs inline
    ///
    /// See [`worker_pool`]. Prefer [`with_pool`](Self::with_pool) when
    /// running more than one pass.
    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.pool = worker_pool(workers);
        self
    }

    /// Run on an existing pool; `None` runs inline
    #[must_use]
    pub fn with_pool(mut self, pool: Option<Arc<ThreadPool>>) -> Self {
        self.pool = pool;
        self
    }

    /// Pool the pass runs on, if any
    #[inline]
    #[must_use]
    pub fn pool(&self) -> Option<&Arc<ThreadPool>> {
        self.pool.as_ref()
    }

    /// Number of threads sites are spread over
    #[must_use]
    pub fn workers(&self) -> usize {
        self.pool.as_ref().map_or(1, |pool| pool.current_num_threads())
    }

    /// Report sites with a known migration without changing them
    pub fn scan<S: CoordinateSite>(&self, sites: &[S]) -> Vec<Finding> {
        let findings: Vec<Finding> = match &self.pool {
            Some(pool) => pool.install(|| {
                sites
                    .par_iter()
                    .enumerate()
                    .filter_map(|(i, site)| self.inspect(i, site))
                    .collect()
            }),
            None => sites
                .iter()
                .enumerate()
                .filter_map(|(i, site)| self.inspect(i, site))
                .collect(),
        };

        tracing::debug!(scanned = sites.len(), findings = findings.len(), "scan complete");
        findings
    }

    /// Rewrite every site with a known migration
    pub fn apply<S: CoordinateSite>(&self, sites: &mut [S]) -> PassSummary {
        let scanned = sites.len();
        let rewrite = |(i, site): (usize, &mut S)| {
            let finding = self.inspect(i, site)?;
            site.relocate(&finding.to);
            Some(finding)
        };

        let findings: Vec<Finding> = match &self.pool {
            Some(pool) => pool.install(|| sites.par_iter_mut().enumerate().filter_map(rewrite).collect()),
            None => sites.iter_mut().enumerate().filter_map(rewrite).collect(),
        };

        for finding in &findings {
            tracing::info!(site = %finding.label, from = %finding.from, to = %finding.to, "relocated");
        }

        PassSummary {
            scanned,
            relocated: findings.len(),
            findings,
        }
    }

    fn inspect<S: CoordinateSite>(&self, i: usize, site: &S) -> Option<Finding> {
        let coordinate = site.coordinate();
        let version = site.version();
        let relocation = self.index.relocate(&coordinate, version)?;

        Some(Finding {
            site: i,
            label: site.label(),
            version: version.map(str::to_string),
            context: relocation.record.context.clone(),
            group_level: relocation.record.is_group_level(),
            from: relocation.from,
            to: relocation.to,
        })
    }
}

impl fmt::Debug for RelocationPass<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelocationPass")
            .field("records", &self.index.len())
            .field("workers", &self.workers())
            .finish()
    }
}
