//! Reloc Index
//!
//! Immutable lookup table from deprecated dependency coordinates to their
//! replacements.
//!
//! # Overview
//!
//! - **MigrationRecord**: one relocation rule, optionally scoped to a version pattern
//! - **MigrationIndex**: built once from an ordered record sequence, then queried
//!   concurrently without locks
//! - **IndexError**: load-time failures; "no mapping" is `None`, never an error
//!
//! # Example
//!
//! ```rust
//! use reloc_index::{MigrationIndex, MigrationRecord};
//!
//! let index = MigrationIndex::build(vec![
//!     MigrationRecord::new("commons-lang", "commons-lang", "org.apache.commons", "commons-lang3"),
//! ])
//! .unwrap();
//!
//! let found = index.resolve("commons-lang", "commons-lang", Some("2.6")).unwrap();
//! assert_eq!(found.new_artifact_id, "commons-lang3");
//! assert!(index.resolve("com.unknown", "lib", Some("1.0")).is_none());
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod index;
pub mod record;

// Re-exports
pub use error::{IndexError, RecordField};
pub use index::{CollisionPolicy, IndexStats, MigrationIndex, Relocation};
pub use record::{Coordinate, MigrationRecord, ANY_ARTIFACT};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for index operations
    pub use crate::{
        CollisionPolicy, Coordinate, IndexError, MigrationIndex, MigrationRecord, Relocation,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
