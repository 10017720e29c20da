//! Migration index with precedence-ordered resolution
//!
//! Provides [`MigrationIndex`], built once by [`MigrationIndex::build`] and
//! queried with [`MigrationIndex::resolve`].

use crate::error::{IndexError, RecordField};
use crate::record::{Coordinate, MigrationRecord, ANY_ARTIFACT};
use reloc_version::{is_unresolved_version, Version, VersionPattern};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// What to do when two records share (old group, old artifact, version pattern)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CollisionPolicy {
    /// Fail the build with [`IndexError::AmbiguousMapping`]
    Reject,
    /// Keep the earliest record
    FirstWins,
    /// Keep the latest record
    #[default]
    LastWins,
}

/// Immutable migration lookup table
///
/// Records are grouped by old group id and then old artifact id, so a query
/// costs two hash lookups plus a scan of the few version-scoped candidates
/// recorded for that one coordinate.
///
/// Nothing is mutated after [`build`](Self::build); the index is `Send + Sync`
/// and can be shared by reference across rewrite workers.
#[derive(Debug, Clone, Default)]
pub struct MigrationIndex {
    /// Surviving records in load order
    records: Vec<MigrationRecord>,

    /// old group -> old artifact -> candidates
    groups: HashMap<String, HashMap<String, Vec<Candidate>>>,

    /// Records dropped by the collision policy
    collisions: usize,
}

/// Pre-parsed record reference within a group
#[derive(Debug, Clone)]
struct Candidate {
    /// Position in the original input sequence
    ordinal: usize,
    /// Position in `records`
    slot: usize,
    pattern: VersionPattern,
}

/// Summary counts of a built index
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexStats {
    /// Records kept
    pub records: usize,
    /// Distinct old coordinates
    pub coordinates: usize,
    /// Records matching a whole group
    pub group_level: usize,
    /// Records dropped as duplicates
    pub collisions: usize,
}

/// Resolved relocation for a concrete coordinate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relocation<'a> {
    /// Queried coordinate
    pub from: Coordinate,
    /// Concrete replacement coordinate
    pub to: Coordinate,
    /// Record that produced the mapping
    pub record: &'a MigrationRecord,
}

struct Pending {
    ordinal: usize,
    record: MigrationRecord,
    pattern: VersionPattern,
}

impl MigrationIndex {
    /// Build an index with [`CollisionPolicy::LastWins`]
    ///
    /// # Errors
    /// Returns [`IndexError::MalformedRecord`] if any record has a blank
    /// identity field or an unparseable version pattern.
    pub fn build<I>(records: I) -> Result<Self, IndexError>
    where
        I: IntoIterator<Item = MigrationRecord>,
    {
        Self::build_with(records, CollisionPolicy::default())
    }

    /// Build an index with an explicit collision policy
    ///
    /// Input order is significant: it decides which duplicate survives and
    /// breaks ties between equally specific matches.
    ///
    /// # Errors
    /// Returns [`IndexError::MalformedRecord`] for invalid records and
    /// [`IndexError::AmbiguousMapping`] for duplicates under
    /// [`CollisionPolicy::Reject`]. No index is produced on error.
    pub fn build_with<I>(records: I, policy: CollisionPolicy) -> Result<Self, IndexError>
    where
        I: IntoIterator<Item = MigrationRecord>,
    {
        let mut pending: Vec<Option<Pending>> = Vec::new();
        let mut keys: HashMap<(String, String, Option<String>), usize> = HashMap::new();
        let mut collisions = 0;

        for (ordinal, record) in records.into_iter().enumerate() {
            let record = record.normalized();
            validate(ordinal, &record)?;

            let pattern = VersionPattern::parse(record.version_pattern.as_deref()).map_err(|e| {
                IndexError::malformed(
                    ordinal,
                    record.old_coordinate().to_string(),
                    RecordField::VersionPattern,
                    e.to_string(),
                )
            })?;

            let key = (
                record.old_group_id.clone(),
                record.old_artifact_id.clone(),
                pattern.canonical(),
            );

            let entry = Pending {
                ordinal,
                record,
                pattern,
            };

            match keys.get(&key).copied() {
                None => {
                    keys.insert(key, pending.len());
                    pending.push(Some(entry));
                }
                Some(slot) => {
                    let previous = pending[slot].as_ref().map_or(0, |p| p.ordinal);
                    match policy {
                        CollisionPolicy::Reject => {
                            return Err(IndexError::AmbiguousMapping {
                                ordinal,
                                previous,
                                coordinate: entry.record.old_coordinate().to_string(),
                                version_pattern: entry.pattern.to_string(),
                            });
                        }
                        CollisionPolicy::FirstWins => {
                            tracing::debug!(ordinal, previous, "dropping duplicate migration record");
                        }
                        CollisionPolicy::LastWins => {
                            tracing::debug!(ordinal, previous, "replacing duplicate migration record");
                            pending[slot] = None;
                            keys.insert(key, pending.len());
                            pending.push(Some(entry));
                        }
                    }
                    collisions += 1;
                }
            }
        }

        let mut records = Vec::with_capacity(pending.len());
        let mut groups: HashMap<String, HashMap<String, Vec<Candidate>>> = HashMap::new();

        for p in pending.into_iter().flatten() {
            let slot = records.len();
            groups
                .entry(p.record.old_group_id.clone())
                .or_default()
                .entry(p.record.old_artifact_id.clone())
                .or_default()
                .push(Candidate {
                    ordinal: p.ordinal,
                    slot,
                    pattern: p.pattern,
                });
            records.push(p.record);
        }

        let index = Self {
            records,
            groups,
            collisions,
        };

        tracing::debug!(
            records = index.records.len(),
            coordinates = index.coordinate_count(),
            collisions,
            ?policy,
            "built migration index"
        );

        Ok(index)
    }

    /// Find the migration for a coordinate and optional version
    ///
    /// Candidates for the coordinate are tried by class: exact pattern equal
    /// to `version`, then ranges containing it, then wildcards. Within a class
    /// the most recently defined record wins. With `version` absent, blank or
    /// not a concrete version (`+`, `RELEASE`, `latest.release`, a range, an
    /// unexpanded `${...}` property) only wildcard records are eligible.
    ///
    /// When nothing under the exact coordinate matches, group-level records
    /// (old artifact id `*`) for the same group are tried with the same rules.
    ///
    /// Returns `None` when no migration is known.
    #[must_use]
    pub fn resolve(
        &self,
        group_id: &str,
        artifact_id: &str,
        version: Option<&str>,
    ) -> Option<&MigrationRecord> {
        let version = version
            .map(str::trim)
            .filter(|v| !is_unresolved_version(v))
            .map(Version::parse);

        self.resolve_exact(group_id, artifact_id, version.as_ref())
            .or_else(|| {
                if artifact_id == ANY_ARTIFACT {
                    None
                } else {
                    self.resolve_exact(group_id, ANY_ARTIFACT, version.as_ref())
                }
            })
    }

    /// [`resolve`](Self::resolve) for a [`Coordinate`]
    #[inline]
    #[must_use]
    pub fn resolve_coordinate(
        &self,
        coordinate: &Coordinate,
        version: Option<&str>,
    ) -> Option<&MigrationRecord> {
        self.resolve(&coordinate.group_id, &coordinate.artifact_id, version)
    }

    /// Resolve and compute the concrete replacement coordinate
    #[must_use]
    pub fn relocate(&self, coordinate: &Coordinate, version: Option<&str>) -> Option<Relocation<'_>> {
        self.resolve_coordinate(coordinate, version)
            .map(|record| Relocation {
                from: coordinate.clone(),
                to: record.target_for(coordinate),
                record,
            })
    }

    fn resolve_exact(
        &self,
        group_id: &str,
        artifact_id: &str,
        version: Option<&Version>,
    ) -> Option<&MigrationRecord> {
        let candidates = self.groups.get(group_id)?.get(artifact_id)?;

        candidates
            .iter()
            .filter(|c| match version {
                Some(v) => c.pattern.matches(v),
                None => c.pattern.is_wildcard(),
            })
            .min_by(|a, b| {
                a.pattern
                    .class()
                    .cmp(&b.pattern.class())
                    .then_with(|| b.ordinal.cmp(&a.ordinal))
            })
            .map(|c| &self.records[c.slot])
    }

    /// Check if any record exists for the exact old coordinate
    #[must_use]
    pub fn contains_coordinate(&self, group_id: &str, artifact_id: &str) -> bool {
        self.groups
            .get(group_id)
            .is_some_and(|artifacts| artifacts.contains_key(artifact_id))
    }

    /// Records kept by the build, in load order
    #[inline]
    pub fn records(&self) -> impl Iterator<Item = &MigrationRecord> {
        self.records.iter()
    }

    /// Number of records kept
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if index is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of distinct old coordinates
    #[must_use]
    pub fn coordinate_count(&self) -> usize {
        self.groups.values().map(HashMap::len).sum()
    }

    /// Number of records dropped by the collision policy
    #[inline]
    #[must_use]
    pub fn collisions(&self) -> usize {
        self.collisions
    }

    /// Get index statistics
    #[must_use]
    pub fn stats(&self) -> IndexStats {
        IndexStats {
            records: self.records.len(),
            coordinates: self.coordinate_count(),
            group_level: self.records.iter().filter(|r| r.is_group_level()).count(),
            collisions: self.collisions,
        }
    }
}

fn validate(ordinal: usize, record: &MigrationRecord) -> Result<(), IndexError> {
    let fields = [
        (RecordField::OldGroupId, &record.old_group_id),
        (RecordField::OldArtifactId, &record.old_artifact_id),
        (RecordField::NewGroupId, &record.new_group_id),
        (RecordField::NewArtifactId, &record.new_artifact_id),
    ];

    for (field, value) in fields {
        if value.is_empty() {
            return Err(IndexError::malformed(
                ordinal,
                record.old_coordinate().to_string(),
                field,
                "is empty",
            ));
        }
    }

    if record.old_group_id == ANY_ARTIFACT || record.new_group_id == ANY_ARTIFACT {
        return Err(IndexError::malformed(
            ordinal,
            record.old_coordinate().to_string(),
            if record.old_group_id == ANY_ARTIFACT {
                RecordField::OldGroupId
            } else {
                RecordField::NewGroupId
            },
            "cannot be a wildcard",
        ));
    }

    Ok(())
}
