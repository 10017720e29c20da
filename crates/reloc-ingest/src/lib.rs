//! Reloc Ingest
//!
//! Turns upstream relocation data into the ordered record sequence the
//! migration index is built from.
//!
//! # Sources
//!
//! - **Definitions**: `og-definitions.json` and `og-unofficial-definitions.json`
//!   from an oga-maven-plugin checkout
//! - **Migration table**: the generated CSV, read back at index load time
//!
//! Record order always follows the source order; the index relies on it to
//! break ties.
//!
//! # Example
//!
//! ```rust,ignore
//! use reloc_ingest::{parse_definition_migrations, write_migrations_csv_file};
//!
//! let records = parse_definition_migrations("oga-maven-plugin".as_ref())?;
//! write_migrations_csv_file("migrations.csv".as_ref(), &records)?;
//! ```

#![warn(missing_docs)]

pub mod definitions;
pub mod error;
pub mod gav;
pub mod table;

// Re-exports
pub use definitions::{definitions_from_str, parse_definition_migrations};
pub use error::IngestError;
pub use gav::{parse_gav, ParsedGav};
pub use table::{
    read_migrations_csv, read_migrations_csv_file, write_migrations_csv, write_migrations_csv_file,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
