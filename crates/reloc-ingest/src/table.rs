//! Generated migration table (CSV)
//!
//! One row per record with header
//! `old_group_id,old_artifact_id,new_group_id,new_artifact_id,version_pattern,context`.
//! Absent options are empty cells. Row order is record order.

use crate::error::IngestError;
use reloc_index::MigrationRecord;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// Write records as a migration table
///
/// # Errors
/// Returns [`IngestError::Csv`] naming the first row that failed.
pub fn write_migrations_csv<W: Write>(writer: W, records: &[MigrationRecord]) -> Result<(), IngestError> {
    let mut out = csv::Writer::from_writer(writer);

    for (i, record) in records.iter().enumerate() {
        out.serialize(record).map_err(|source| IngestError::Csv {
            row: i as u64 + 1,
            source,
        })?;
    }

    out.flush().map_err(|e| IngestError::Csv {
        row: records.len() as u64,
        source: e.into(),
    })
}

/// Write records to a migration table file, replacing it
///
/// # Errors
/// Returns [`IngestError::Io`] if the file cannot be created.
pub fn write_migrations_csv_file(path: &Path, records: &[MigrationRecord]) -> Result<(), IngestError> {
    let file = File::create(path).map_err(|e| IngestError::io_error(path, e))?;
    write_migrations_csv(file, records)?;
    tracing::info!(path = %path.display(), records = records.len(), "wrote migration table");
    Ok(())
}

/// Read a migration table, preserving row order
///
/// # Errors
/// Returns [`IngestError::Csv`] with the 1-based data row of the first bad row.
pub fn read_migrations_csv<R: Read>(reader: R) -> Result<Vec<MigrationRecord>, IngestError> {
    let mut rows = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    rows.deserialize()
        .enumerate()
        .map(|(i, row)| {
            row.map_err(|source| IngestError::Csv {
                row: i as u64 + 1,
                source,
            })
        })
        .collect()
}

/// Read a migration table file
///
/// # Errors
/// Returns [`IngestError::Io`] if the file cannot be opened.
pub fn read_migrations_csv_file(path: &Path) -> Result<Vec<MigrationRecord>, IngestError> {
    let file = File::open(path).map_err(|e| IngestError::io_error(path, e))?;
    let records = read_migrations_csv(file)?;
    tracing::debug!(path = %path.display(), records = records.len(), "read migration table");
    Ok(records)
}
