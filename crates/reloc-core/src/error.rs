//! Error types for relocation runs
//!
//! Provides error handling for:
//! - Configuration loading
//! - Index construction (wrapped from `reloc-index`)
//! - Source ingestion (wrapped from `reloc-ingest`)
//! - Dependency list parsing

use reloc_index::IndexError;
use reloc_ingest::IngestError;
use std::path::PathBuf;

/// Errors while loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error during config read
    #[error("io error reading {path}: {source}")]
    Io {
        /// Config file path
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// TOML syntax or schema error
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// Value out of range
    #[error("invalid configuration value for {key}: {reason}")]
    Invalid {
        /// Offending key
        key: &'static str,
        /// Why the value was rejected
        reason: String,
    },
}

/// Combined relocation error
#[derive(Debug, thiserror::Error)]
pub enum RelocError {
    /// Migration index could not be built
    #[error("index error: {0}")]
    Index(#[from] IndexError),

    /// Migration table could not be read
    #[error("ingest error: {0}")]
    Ingest(#[from] IngestError),

    /// Configuration is invalid
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// No migration table configured
    #[error("no migration table configured")]
    MissingTable,

    /// Dependency list line is not `group:artifact[:version]`
    #[error("invalid dependency on line {line}: {reason}")]
    InvalidDependency {
        /// 1-based line number
        line: usize,
        /// What is wrong with the line
        reason: String,
    },
}

/// Result type alias for relocation operations
pub type RelocResult<T> = Result<T, RelocError>;

#[cfg(test)]
mod tests {
    use super::*;
    use reloc_index::RecordField;

    #[test]
    fn error_conversions() {
        let index_err = IndexError::malformed(0, ":", RecordField::OldGroupId, "is empty");
        let err: RelocError = index_err.into();
        assert!(matches!(err, RelocError::Index(_)));
    }

    #[test]
    fn invalid_dependency_display() {
        let err = RelocError::InvalidDependency {
            line: 4,
            reason: "missing artifact id".to_string(),
        };
        assert_eq!(err.to_string(), "invalid dependency on line 4: missing artifact id");
    }
}
