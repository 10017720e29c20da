//! Migration records and dependency coordinates

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Reserved artifact id meaning "every artifact in the group"
///
/// As an old artifact id it makes a group-level record; as a new artifact id
/// it keeps the queried artifact id unchanged.
pub const ANY_ARTIFACT: &str = "*";

/// Dependency identity independent of version
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coordinate {
    /// Publisher group, e.g. `org.apache.commons`
    pub group_id: String,
    /// Artifact within the group, e.g. `commons-lang3`
    pub artifact_id: String,
}

impl Coordinate {
    /// Create a coordinate
    #[inline]
    #[must_use]
    pub fn new(group_id: impl Into<String>, artifact_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
        }
    }

    /// Returns true when the artifact id is [`ANY_ARTIFACT`]
    #[inline]
    #[must_use]
    pub fn is_group_level(&self) -> bool {
        self.artifact_id == ANY_ARTIFACT
    }
}

impl Display for Coordinate {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group_id, self.artifact_id)
    }
}

/// A rule relocating an old coordinate to a new one
///
/// Field names double as the column names of the generated migration table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationRecord {
    /// Deprecated group id
    pub old_group_id: String,
    /// Deprecated artifact id, or [`ANY_ARTIFACT`]
    pub old_artifact_id: String,
    /// Replacement group id
    pub new_group_id: String,
    /// Replacement artifact id, or [`ANY_ARTIFACT`] to keep the old one
    pub new_artifact_id: String,
    /// Versions the rule applies to; `None` means every version
    #[serde(default)]
    pub version_pattern: Option<String>,
    /// Free-form note from the upstream definitions
    #[serde(default)]
    pub context: Option<String>,
}

impl MigrationRecord {
    /// Create an unscoped record
    #[must_use]
    pub fn new(
        old_group_id: impl Into<String>,
        old_artifact_id: impl Into<String>,
        new_group_id: impl Into<String>,
        new_artifact_id: impl Into<String>,
    ) -> Self {
        Self {
            old_group_id: old_group_id.into(),
            old_artifact_id: old_artifact_id.into(),
            new_group_id: new_group_id.into(),
            new_artifact_id: new_artifact_id.into(),
            version_pattern: None,
            context: None,
        }
    }

    /// With version pattern
    #[inline]
    #[must_use]
    pub fn with_version_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.version_pattern = Some(pattern.into());
        self
    }

    /// With context note
    #[inline]
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Old coordinate
    #[must_use]
    pub fn old_coordinate(&self) -> Coordinate {
        Coordinate::new(&self.old_group_id, &self.old_artifact_id)
    }

    /// New coordinate as written, possibly group-level
    #[must_use]
    pub fn new_coordinate(&self) -> Coordinate {
        Coordinate::new(&self.new_group_id, &self.new_artifact_id)
    }

    /// Concrete replacement for `from`
    ///
    /// A new artifact id of [`ANY_ARTIFACT`] keeps `from`'s artifact id.
    #[must_use]
    pub fn target_for(&self, from: &Coordinate) -> Coordinate {
        if self.new_artifact_id == ANY_ARTIFACT {
            Coordinate::new(&self.new_group_id, &from.artifact_id)
        } else {
            self.new_coordinate()
        }
    }

    /// Returns true for records matching every artifact of the old group
    #[inline]
    #[must_use]
    pub fn is_group_level(&self) -> bool {
        self.old_artifact_id == ANY_ARTIFACT
    }

    /// Copy with identity fields trimmed and blank options cleared
    pub(crate) fn normalized(self) -> Self {
        fn blank_to_none(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }

        Self {
            old_group_id: self.old_group_id.trim().to_string(),
            old_artifact_id: self.old_artifact_id.trim().to_string(),
            new_group_id: self.new_group_id.trim().to_string(),
            new_artifact_id: self.new_artifact_id.trim().to_string(),
            version_pattern: blank_to_none(self.version_pattern),
            context: blank_to_none(self.context),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinate_display() {
        let c = Coordinate::new("org.apache.commons", "commons-lang3");
        assert_eq!(c.to_string(), "org.apache.commons:commons-lang3");
    }

    #[test]
    fn target_for_explicit_artifact() {
        let record = MigrationRecord::new("commons-lang", "commons-lang", "org.apache.commons", "commons-lang3");
        let from = Coordinate::new("commons-lang", "commons-lang");
        assert_eq!(
            record.target_for(&from),
            Coordinate::new("org.apache.commons", "commons-lang3")
        );
    }

    #[test]
    fn target_for_group_level_keeps_artifact() {
        let record = MigrationRecord::new("org.codehaus.groovy", ANY_ARTIFACT, "org.apache.groovy", ANY_ARTIFACT);
        let from = Coordinate::new("org.codehaus.groovy", "groovy-eclipse-compiler");

        assert!(record.is_group_level());
        assert_eq!(
            record.target_for(&from),
            Coordinate::new("org.apache.groovy", "groovy-eclipse-compiler")
        );
    }

    #[test]
    fn normalized_trims_and_clears_blanks() {
        let record = MigrationRecord::new(" a ", "b\t", "c", " d")
            .with_version_pattern("  ")
            .with_context(" see notes ")
            .normalized();

        assert_eq!(record.old_group_id, "a");
        assert_eq!(record.old_artifact_id, "b");
        assert_eq!(record.new_artifact_id, "d");
        assert_eq!(record.version_pattern, None);
        assert_eq!(record.context.as_deref(), Some("see notes"));
    }

    #[test]
    fn builder_sets_options() {
        let record = MigrationRecord::new("a", "b", "c", "d")
            .with_version_pattern("[1.0,2.0)")
            .with_context("moved");
        assert_eq!(record.version_pattern.as_deref(), Some("[1.0,2.0)"));
        assert_eq!(record.context.as_deref(), Some("moved"));
        assert!(!record.is_group_level());
    }
}
