//! Error types for ingestion

use std::path::PathBuf;

/// Errors while reading or writing relocation sources
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// IO error on a source or output file
    #[error("io error on {path}: {source}")]
    Io {
        /// File being read or written
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Definitions file is not valid JSON of the expected shape
    #[error("invalid definitions in {path}: {source}")]
    Json {
        /// Definitions file
        path: PathBuf,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },

    /// Migration table row could not be read or written
    #[error("migration table error at row {row}: {source}")]
    Csv {
        /// 1-based data row
        row: u64,
        /// Underlying CSV error
        #[source]
        source: csv::Error,
    },

    /// GAV string could not be split into coordinates
    #[error("malformed coordinate '{gav}': {reason}")]
    MalformedGav {
        /// Input text
        gav: String,
        /// What is wrong with it
        reason: String,
    },
}

impl IngestError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create JSON error for path
    pub fn json_error(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.into(),
            source,
        }
    }

    /// Create GAV error
    pub fn malformed_gav(gav: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedGav {
            gav: gav.into(),
            reason: reason.into(),
        }
    }
}
