//! Load-time errors for the migration index
//!
//! Every variant names the offending record by its position in load order so
//! the source data can be fixed. Query misses are not errors.

use std::fmt::{self, Display, Formatter};

/// Record field named in a [`IndexError::MalformedRecord`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordField {
    /// `old_group_id`
    OldGroupId,
    /// `old_artifact_id`
    OldArtifactId,
    /// `new_group_id`
    NewGroupId,
    /// `new_artifact_id`
    NewArtifactId,
    /// `version_pattern`
    VersionPattern,
}

impl RecordField {
    /// Column name of the field
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OldGroupId => "old_group_id",
            Self::OldArtifactId => "old_artifact_id",
            Self::NewGroupId => "new_group_id",
            Self::NewArtifactId => "new_artifact_id",
            Self::VersionPattern => "version_pattern",
        }
    }
}

impl Display for RecordField {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors while building a [`MigrationIndex`](crate::MigrationIndex)
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IndexError {
    /// A record is missing an identity field or has an unparseable pattern
    #[error("malformed migration record #{ordinal} ({coordinate}): {field} {reason}")]
    MalformedRecord {
        /// Position of the record in the input
        ordinal: usize,
        /// Old coordinate as written
        coordinate: String,
        /// Offending field
        field: RecordField,
        /// What is wrong with the field
        reason: String,
    },

    /// Two records share (old group, old artifact, version pattern)
    #[error(
        "ambiguous mapping for {coordinate} version '{version_pattern}': record #{ordinal} duplicates record #{previous}"
    )]
    AmbiguousMapping {
        /// Position of the duplicate record
        ordinal: usize,
        /// Position of the record it duplicates
        previous: usize,
        /// Old coordinate
        coordinate: String,
        /// Canonical version pattern shared by both
        version_pattern: String,
    },
}

impl IndexError {
    /// Create malformed record error
    pub fn malformed(
        ordinal: usize,
        coordinate: impl Into<String>,
        field: RecordField,
        reason: impl Into<String>,
    ) -> Self {
        Self::MalformedRecord {
            ordinal,
            coordinate: coordinate.into(),
            field,
            reason: reason.into(),
        }
    }

    /// Load ordinal of the offending record
    #[inline]
    #[must_use]
    pub fn ordinal(&self) -> usize {
        match self {
            Self::MalformedRecord { ordinal, .. } | Self::AmbiguousMapping { ordinal, .. } => {
                *ordinal
            }
        }
    }
}
