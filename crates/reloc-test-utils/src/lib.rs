//! Testing utilities for reloc workspace
//!
//! Shared record fixtures and upstream definition files.

#![allow(missing_docs)]

use reloc_index::{MigrationRecord, ANY_ARTIFACT};
use std::path::{Path, PathBuf};

pub fn record(old_group: &str, old_artifact: &str, new_group: &str, new_artifact: &str) -> MigrationRecord {
    MigrationRecord::new(old_group, old_artifact, new_group, new_artifact)
}

/// Exact, range and wildcard records for one coordinate, in that load order
pub fn precedence_records(group: &str, artifact: &str) -> Vec<MigrationRecord> {
    vec![
        record(group, artifact, "org.exact", artifact).with_version_pattern("1.2.3"),
        record(group, artifact, "org.range", artifact).with_version_pattern("[1.0,2.0)"),
        record(group, artifact, "org.wildcard", artifact),
    ]
}

/// A handful of real-world relocations
pub fn known_relocations() -> Vec<MigrationRecord> {
    vec![
        record("acegisecurity", ANY_ARTIFACT, "org.acegisecurity", ANY_ARTIFACT),
        record("activation", "activation", "javax.activation", "activation"),
        record("com.jcraft", "jsch", "com.github.mwiede", "jsch")
            .with_context("See https://www.matez.de/index.php/2020/06/22/the-future-of-jsch-without-ssh-rsa/"),
        record("commons-lang", "commons-lang", "org.apache.commons", "commons-lang3"),
        record("org.codehaus.groovy", ANY_ARTIFACT, "org.apache.groovy", ANY_ARTIFACT),
    ]
}

/// Official oga definitions matching the first entries of [`known_relocations`]
pub const OG_DEFINITIONS_JSON: &str = r#"{
  "migration": [
    { "old": "acegisecurity", "new": "org.acegisecurity" },
    { "old": "activation:activation", "new": "javax.activation:activation" }
  ]
}"#;

/// Unofficial oga definitions with a proposal list
pub const OG_UNOFFICIAL_DEFINITIONS_JSON: &str = r#"{
  "migration": [
    {
      "old": "com.jcraft:jsch",
      "proposal": ["com.github.mwiede:jsch"],
      "context": "See https://www.matez.de/index.php/2020/06/22/the-future-of-jsch-without-ssh-rsa/"
    }
  ]
}"#;

/// Write an oga-maven-plugin style checkout under `root` and return its path
pub fn write_oga_repo(root: &Path, official: &str, unofficial: &str) -> PathBuf {
    let uc = root.join("uc");
    std::fs::create_dir_all(&uc).unwrap();
    std::fs::write(uc.join("og-definitions.json"), official).unwrap();
    std::fs::write(uc.join("og-unofficial-definitions.json"), unofficial).unwrap();
    root.to_path_buf()
}
