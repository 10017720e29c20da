//! Reloc Core
//!
//! Runs migration lookups over the dependency declarations of a project.
//!
//! # Architecture
//!
//! ```text
//! migrations.csv ─┬─> IndexCache (content-addressed) ─> Arc<MigrationIndex>
//!                 │                                          │
//! RelocConfig ────┘                                          v
//!                 CoordinateSite[] ─> RelocationPass ─> Finding[] / rewritten sites
//! ```
//!
//! The index never sees the sites: rule logic talks to it only through the
//! [`CoordinateSite`] capability, so any build-descriptor model can plug in.
//!
//! # Example
//!
//! ```rust
//! use reloc_core::{DependencyList, RelocConfig, Relocator};
//! use reloc_index::MigrationRecord;
//!
//! let relocator = Relocator::from_records(
//!     vec![MigrationRecord::new("commons-lang", "commons-lang", "org.apache.commons", "commons-lang3")],
//!     RelocConfig::default(),
//! )
//! .unwrap();
//!
//! let mut deps = DependencyList::parse("commons-lang:commons-lang:2.6\n").unwrap();
//! let summary = relocator.apply(deps.sites_mut());
//! assert_eq!(summary.relocated, 1);
//! assert_eq!(deps.render(), "org.apache.commons:commons-lang3:2.6\n");
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod cache;
pub mod config;
pub mod error;
pub mod pass;
pub mod relocator;
pub mod site;

// Re-exports for convenience
pub use cache::{CacheStats, IndexCache, SourceDigest};
pub use config::RelocConfig;
pub use error::{ConfigError, RelocError, RelocResult};
pub use pass::{worker_pool, Finding, PassSummary, RelocationPass};
pub use relocator::Relocator;
pub use site::{CoordinateSite, DependencyLine, DependencyList};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for running relocation passes
    pub use crate::{
        CoordinateSite, Finding, IndexCache, RelocConfig, RelocError, RelocationPass, Relocator,
    };
    pub use reloc_index::{CollisionPolicy, Coordinate, MigrationIndex, MigrationRecord};
}
