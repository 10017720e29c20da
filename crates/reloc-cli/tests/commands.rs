use pretty_assertions::assert_eq;
use reloc_ingest::write_migrations_csv_file;
use reloc_test_utils::{known_relocations, write_oga_repo, OG_DEFINITIONS_JSON, OG_UNOFFICIAL_DEFINITIONS_JSON};
use std::path::{Path, PathBuf};

fn run(args: &[&str]) -> anyhow::Result<String> {
    let matches = reloc_cli::cli().try_get_matches_from(std::iter::once("reloc").chain(args.iter().copied()))?;
    let mut out = Vec::new();
    reloc_cli::run(&matches, &mut out)?;
    Ok(String::from_utf8(out)?)
}

fn table(dir: &Path) -> PathBuf {
    let path = dir.join("migrations.csv");
    write_migrations_csv_file(&path, &known_relocations()).unwrap();
    path
}

fn s(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn parse_definitions_writes_table() {
    let dir = tempfile::tempdir().unwrap();
    let repo = write_oga_repo(&dir.path().join("oga"), OG_DEFINITIONS_JSON, OG_UNOFFICIAL_DEFINITIONS_JSON);
    let csv = dir.path().join("out.csv");

    let output = run(&["parse-definitions", s(&repo), s(&csv)]).unwrap();

    assert!(output.starts_with("wrote 3 migrations"));
    assert!(std::fs::read_to_string(&csv).unwrap().contains("com.jcraft,jsch,com.github.mwiede,jsch"));
}

#[test]
fn resolve_prints_target_or_no_mapping() {
    let dir = tempfile::tempdir().unwrap();
    let table = table(dir.path());

    assert_eq!(
        run(&["resolve", "--table", s(&table), "commons-lang", "commons-lang", "2.6"]).unwrap(),
        "org.apache.commons:commons-lang3\n"
    );
    assert_eq!(
        run(&["resolve", "--table", s(&table), "org.codehaus.groovy", "groovy-json"]).unwrap(),
        "org.apache.groovy:groovy-json\n"
    );
    assert_eq!(
        run(&["resolve", "--table", s(&table), "org.slf4j", "slf4j-api"]).unwrap(),
        "no mapping\n"
    );
}

#[test]
fn resolve_json() {
    let dir = tempfile::tempdir().unwrap();
    let table = table(dir.path());

    let output = run(&["resolve", "--json", "--table", s(&table), "com.jcraft", "jsch"]).unwrap();
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();

    assert_eq!(value["to"]["group_id"], "com.github.mwiede");
    assert_eq!(value["record"]["old_artifact_id"], "jsch");
}

#[test]
fn check_lists_findings() {
    let dir = tempfile::tempdir().unwrap();
    let table = table(dir.path());
    let deps = dir.path().join("deps.txt");
    std::fs::write(&deps, "# libs\nactivation:activation:1.1\norg.slf4j:slf4j-api:2.0.9\n").unwrap();

    let output = run(&["check", "--table", s(&table), s(&deps)]).unwrap();

    assert_eq!(
        output,
        "line 2: activation:activation:1.1: Relocated to javax.activation:activation\n"
    );
}

#[test]
fn rewrite_to_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let table = table(dir.path());
    let deps = dir.path().join("deps.txt");
    let rewritten = dir.path().join("deps.new.txt");
    std::fs::write(&deps, "commons-lang:commons-lang:2.6\n\norg.slf4j:slf4j-api\n").unwrap();

    let stdout = run(&["rewrite", "--table", s(&table), s(&deps), "--output", s(&rewritten)]).unwrap();

    assert_eq!(stdout, "");
    assert_eq!(
        std::fs::read_to_string(&rewritten).unwrap(),
        "org.apache.commons:commons-lang3:2.6\n\norg.slf4j:slf4j-api\n"
    );
}

#[test]
fn config_file_supplies_table_and_workers() {
    let dir = tempfile::tempdir().unwrap();
    table(dir.path());
    let config = dir.path().join("reloc.toml");
    std::fs::write(&config, "table = \"migrations.csv\"\nworkers = 2\n").unwrap();
    let deps = dir.path().join("deps.txt");
    std::fs::write(&deps, "com.jcraft:jsch:0.1.55\n").unwrap();

    let output = run(&["rewrite", "--config", s(&config), s(&deps)]).unwrap();
    assert_eq!(output, "com.github.mwiede:jsch:0.1.55\n");
}

#[test]
fn missing_table_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let deps = dir.path().join("deps.txt");
    std::fs::write(&deps, "a:b\n").unwrap();

    let err = run(&["check", s(&deps)]).unwrap_err();
    assert!(err.to_string().contains("no migration table"));
}

#[test]
fn ambiguous_table_fails_under_reject() {
    let dir = tempfile::tempdir().unwrap();
    let table = dir.path().join("dupes.csv");
    std::fs::write(
        &table,
        "old_group_id,old_artifact_id,new_group_id,new_artifact_id\na,b,c,d\na,b,e,f\n",
    )
    .unwrap();

    assert_eq!(run(&["resolve", "--table", s(&table), "a", "b"]).unwrap(), "e:f\n");

    let err = run(&["resolve", "--collision-policy", "reject", "--table", s(&table), "a", "b"]).unwrap_err();
    assert!(format!("{err:#}").contains("ambiguous"));
}
