//! Reloc Version
//!
//! Version ordering and version patterns for dependency coordinates.
//!
//! # Overview
//!
//! - **Version**: a parsed version string with static ordering
//!   (`1.0.0-M1` < `1.0.0-rc-1` < `1.0.0` < `1.0.1`)
//! - **VersionPattern**: the version scope of a migration rule; exact version,
//!   Maven range, Gradle prefix, or wildcard
//!
//! # Example
//!
//! ```rust
//! use reloc_version::{PatternClass, Version, VersionPattern};
//!
//! let pattern = VersionPattern::parse(Some("[1.0,2.0)")).unwrap();
//! assert_eq!(pattern.class(), PatternClass::Range);
//! assert!(pattern.matches(&Version::parse("1.5.0")));
//! assert!(!pattern.matches(&Version::parse("2.0")));
//! ```

#![warn(missing_docs)]

pub mod pattern;
pub mod version;

// Re-exports
pub use pattern::{
    is_unresolved_version, is_wildcard_spelling, PatternClass, PatternError, VersionPattern,
    VersionRange,
};
pub use version::{StaticVersionComparator, Version};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
