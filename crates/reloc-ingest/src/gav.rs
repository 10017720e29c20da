//! `group[:artifact[:version]]` strings

use crate::error::IngestError;
use reloc_index::ANY_ARTIFACT;

/// Split form of a GAV string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedGav {
    /// Group id, never empty
    pub group_id: String,
    /// Artifact id, [`ANY_ARTIFACT`] when the GAV names only a group
    pub artifact_id: String,
    /// Version segment, if present
    pub version: Option<String>,
}

/// Parse `group`, `group:artifact` or `group:artifact:version`
///
/// # Errors
/// Returns [`IngestError::MalformedGav`] for an empty group or more than
/// three segments.
pub fn parse_gav(gav: &str) -> Result<ParsedGav, IngestError> {
    let segments: Vec<&str> = gav.trim().split(':').map(str::trim).collect();

    if segments.len() > 3 {
        return Err(IngestError::malformed_gav(gav, "expected at most group:artifact:version"));
    }

    let group_id = segments[0];
    if group_id.is_empty() {
        return Err(IngestError::malformed_gav(gav, "group id is empty"));
    }

    let artifact_id = segments
        .get(1)
        .copied()
        .filter(|a| !a.is_empty())
        .unwrap_or(ANY_ARTIFACT);

    let version = segments
        .get(2)
        .copied()
        .filter(|v| !v.is_empty())
        .map(str::to_string);

    Ok(ParsedGav {
        group_id: group_id.to_string(),
        artifact_id: artifact_id.to_string(),
        version,
    })
}
