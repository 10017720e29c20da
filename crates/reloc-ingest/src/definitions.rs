//! oga-maven-plugin relocation definitions
//!
//! Reads `uc/og-definitions.json` (official relocations) followed by
//! `uc/og-unofficial-definitions.json` (proposed relocations, first proposal
//! taken). Unknown JSON fields are ignored.

use crate::error::IngestError;
use crate::gav::parse_gav;
use reloc_index::MigrationRecord;
use serde::Deserialize;
use std::path::Path;

const OFFICIAL: &str = "og-definitions.json";
const UNOFFICIAL: &str = "og-unofficial-definitions.json";

#[derive(Debug, Deserialize)]
struct Definitions {
    #[serde(default)]
    migration: Vec<DefinitionMigration>,
}

#[derive(Debug, Deserialize)]
struct DefinitionMigration {
    old: String,
    new: String,
    #[serde(default)]
    context: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UnofficialDefinitions {
    #[serde(default)]
    migration: Vec<ProposedMigration>,
}

#[derive(Debug, Deserialize)]
struct ProposedMigration {
    old: String,
    #[serde(default)]
    proposal: Vec<String>,
    #[serde(default)]
    context: Option<String>,
}

/// Read both definition files of an oga-maven-plugin checkout
///
/// Official definitions come first, then unofficial ones, each in file order.
///
/// # Errors
/// Returns [`IngestError`] if a file is unreadable, is not valid JSON, or
/// contains a malformed GAV.
pub fn parse_definition_migrations(repo: &Path) -> Result<Vec<MigrationRecord>, IngestError> {
    let uc = repo.join("uc");
    let official_path = uc.join(OFFICIAL);
    let unofficial_path = uc.join(UNOFFICIAL);

    let official = std::fs::read_to_string(&official_path)
        .map_err(|e| IngestError::io_error(&official_path, e))?;
    let unofficial = std::fs::read_to_string(&unofficial_path)
        .map_err(|e| IngestError::io_error(&unofficial_path, e))?;

    let official: Definitions =
        serde_json::from_str(&official).map_err(|e| IngestError::json_error(&official_path, e))?;
    let unofficial: UnofficialDefinitions = serde_json::from_str(&unofficial)
        .map_err(|e| IngestError::json_error(&unofficial_path, e))?;

    convert(official, unofficial)
}

/// Parse definitions already held in memory
///
/// # Errors
/// Returns [`IngestError::Json`] (with the conventional file name as path)
/// or [`IngestError::MalformedGav`].
pub fn definitions_from_str(
    official: &str,
    unofficial: &str,
) -> Result<Vec<MigrationRecord>, IngestError> {
    let official: Definitions =
        serde_json::from_str(official).map_err(|e| IngestError::json_error(OFFICIAL, e))?;
    let unofficial: UnofficialDefinitions =
        serde_json::from_str(unofficial).map_err(|e| IngestError::json_error(UNOFFICIAL, e))?;

    convert(official, unofficial)
}

fn convert(
    official: Definitions,
    unofficial: UnofficialDefinitions,
) -> Result<Vec<MigrationRecord>, IngestError> {
    let mut records =
        Vec::with_capacity(official.migration.len() + unofficial.migration.len());

    for d in official.migration {
        records.push(to_record(&d.old, &d.new, d.context)?);
    }

    let official_count = records.len();

    for p in unofficial.migration {
        match p.proposal.first() {
            Some(new) => records.push(to_record(&p.old, new, p.context)?),
            None => tracing::warn!(old = %p.old, "skipping unofficial definition without proposal"),
        }
    }

    tracing::info!(
        official = official_count,
        unofficial = records.len() - official_count,
        "parsed definition migrations"
    );

    Ok(records)
}

fn to_record(old: &str, new: &str, context: Option<String>) -> Result<MigrationRecord, IngestError> {
    let old = parse_gav(old)?;
    let new = parse_gav(new)?;

    let mut record = MigrationRecord::new(old.group_id, old.artifact_id, new.group_id, new.artifact_id);
    record.version_pattern = old.version;
    record.context = context.filter(|c| !c.trim().is_empty());
    Ok(record)
}
