//! `reloc` command line
//!
//! Argument definitions and command handlers live here so they can be
//! driven from tests; `main.rs` only parses, installs logging and maps the
//! result to an exit code.

use anyhow::{bail, Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use reloc_core::{DependencyList, IndexCache, RelocConfig, Relocator};
use reloc_index::{CollisionPolicy, Coordinate};
use reloc_ingest::{parse_definition_migrations, write_migrations_csv_file};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Build the `reloc` command definition
#[must_use]
pub fn cli() -> Command {
    Command::new("reloc")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Look up and apply dependency coordinate relocations")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("collision-policy")
                .long("collision-policy")
                .global(true)
                .value_parser(["reject", "first-wins", "last-wins"])
                .help("How duplicate migration records are handled"),
        )
        .arg(
            Arg::new("workers")
                .long("workers")
                .global(true)
                .value_parser(value_parser!(usize))
                .help("Worker threads for check and rewrite"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::Count)
                .help("More log output (-v debug, -vv trace)"),
        )
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON lines"),
        )
        .subcommand(
            Command::new("parse-definitions")
                .about("Convert oga-maven-plugin definitions into a migration table")
                .arg(
                    Arg::new("repo")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("oga-maven-plugin checkout (contains uc/)"),
                )
                .arg(
                    Arg::new("csv")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Migration table to write"),
                ),
        )
        .subcommand(
            Command::new("resolve")
                .about("Look up the replacement for one coordinate")
                .arg(table_arg())
                .arg(Arg::new("group").required(true).help("Group id"))
                .arg(Arg::new("artifact").required(true).help("Artifact id"))
                .arg(
                    Arg::new("declared-version")
                        .value_name("VERSION")
                        .help("Declared version"),
                )
                .arg(json_arg()),
        )
        .subcommand(
            Command::new("check")
                .about("Report relocated dependencies in a dependency list")
                .arg(table_arg())
                .arg(deps_arg())
                .arg(json_arg()),
        )
        .subcommand(
            Command::new("rewrite")
                .about("Replace relocated dependencies in a dependency list")
                .arg(table_arg())
                .arg(deps_arg())
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .value_parser(value_parser!(PathBuf))
                        .help("Write here instead of stdout"),
                ),
        )
}

fn table_arg() -> Arg {
    Arg::new("table")
        .long("table")
        .value_parser(value_parser!(PathBuf))
        .help("Migration table (CSV); overrides the config file")
}

fn deps_arg() -> Arg {
    Arg::new("deps")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Dependency list, one group:artifact[:version] per line")
}

fn json_arg() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Output as JSON")
}

/// Install the stderr tracing subscriber
///
/// `RUST_LOG` applies unless `-v` was given.
pub fn init_logging(matches: &ArgMatches) {
    let args = matches.subcommand().map_or(matches, |(_, sub)| sub);
    let filter = match args.get_count("verbose") {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    // A subscriber may already be installed (tests)
    let _ = if args.get_flag("log-json") {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}

/// Run the selected subcommand, writing command output to `out`
///
/// # Errors
/// Returns an error for unreadable inputs, invalid tables or configuration.
pub fn run<W: Write>(matches: &ArgMatches, out: &mut W) -> Result<()> {
    match matches.subcommand() {
        Some(("parse-definitions", args)) => parse_definitions(args, out),
        Some(("resolve", args)) => resolve(args, out),
        Some(("check", args)) => check(args, out),
        Some(("rewrite", args)) => rewrite(args, out),
        Some((other, _)) => bail!("unknown command '{other}'"),
        None => bail!("no command given"),
    }
}

fn parse_definitions<W: Write>(args: &ArgMatches, out: &mut W) -> Result<()> {
    let repo = required::<PathBuf>(args, "repo")?;
    let csv = required::<PathBuf>(args, "csv")?;

    let records = parse_definition_migrations(repo)
        .with_context(|| format!("reading definitions from {}", repo.display()))?;
    write_migrations_csv_file(csv, &records)
        .with_context(|| format!("writing {}", csv.display()))?;

    writeln!(out, "wrote {} migrations to {}", records.len(), csv.display())?;
    Ok(())
}

fn resolve<W: Write>(args: &ArgMatches, out: &mut W) -> Result<()> {
    let group = required::<String>(args, "group")?;
    let artifact = required::<String>(args, "artifact")?;
    let version = args.get_one::<String>("declared-version").map(String::as_str);

    let relocator = load_relocator(args)?;
    let coordinate = Coordinate::new(group.as_str(), artifact.as_str());
    let relocation = relocator.index().relocate(&coordinate, version);

    if args.get_flag("json") {
        let value = relocation.map(|r| {
            serde_json::json!({
                "from": r.from,
                "to": r.to,
                "record": r.record,
            })
        });
        serde_json::to_writer_pretty(&mut *out, &value)?;
        writeln!(out)?;
        return Ok(());
    }

    match relocation {
        Some(r) => {
            writeln!(out, "{}", r.to)?;
            if let Some(context) = &r.record.context {
                writeln!(out, "  {context}")?;
            }
        }
        None => writeln!(out, "no mapping")?,
    }
    Ok(())
}

fn check<W: Write>(args: &ArgMatches, out: &mut W) -> Result<()> {
    let deps = required::<PathBuf>(args, "deps")?;
    let list = read_dependency_list(deps)?;
    let relocator = load_relocator(args)?;

    let findings = relocator.scan(list.sites());
    tracing::info!(
        dependencies = list.sites().len(),
        relocated = findings.len(),
        "checked {}",
        deps.display()
    );

    if args.get_flag("json") {
        serde_json::to_writer_pretty(&mut *out, &findings)?;
        writeln!(out)?;
    } else {
        for finding in &findings {
            writeln!(out, "{finding}")?;
        }
    }
    Ok(())
}

fn rewrite<W: Write>(args: &ArgMatches, out: &mut W) -> Result<()> {
    let deps = required::<PathBuf>(args, "deps")?;
    let mut list = read_dependency_list(deps)?;
    let relocator = load_relocator(args)?;

    let summary = relocator.apply(list.sites_mut());
    tracing::info!(
        scanned = summary.scanned,
        relocated = summary.relocated,
        "rewrote {}",
        deps.display()
    );

    let text = list.render();
    match args.get_one::<PathBuf>("output") {
        Some(path) => {
            std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
        }
        None => out.write_all(text.as_bytes())?,
    }
    Ok(())
}

fn required<'a, T>(args: &'a ArgMatches, id: &str) -> Result<&'a T>
where
    T: Clone + Send + Sync + 'static,
{
    args.get_one::<T>(id)
        .with_context(|| format!("missing argument <{id}>"))
}

fn read_dependency_list(path: &Path) -> Result<DependencyList> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading dependency list {}", path.display()))?;
    DependencyList::parse(&text).with_context(|| format!("parsing {}", path.display()))
}

fn load_config(args: &ArgMatches) -> Result<RelocConfig> {
    let mut config = match args.get_one::<PathBuf>("config") {
        Some(path) => RelocConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => RelocConfig::default(),
    };

    if let Some(table) = args.get_one::<PathBuf>("table") {
        config.table = Some(table.clone());
    }
    if let Some(policy) = args.get_one::<String>("collision-policy") {
        config.collision_policy = parse_policy(policy)?;
    }
    if let Some(workers) = args.get_one::<usize>("workers") {
        config.workers = *workers;
    }

    config.validate()?;
    Ok(config)
}

fn parse_policy(name: &str) -> Result<CollisionPolicy> {
    Ok(match name {
        "reject" => CollisionPolicy::Reject,
        "first-wins" => CollisionPolicy::FirstWins,
        "last-wins" => CollisionPolicy::LastWins,
        other => bail!("unknown collision policy '{other}'"),
    })
}

fn load_relocator(args: &ArgMatches) -> Result<Relocator> {
    let config = load_config(args)?;
    let table = config
        .table
        .clone()
        .context("no migration table: pass --table or set `table` in the config file")?;
    let cache = IndexCache::new(config.cache_capacity);

    Relocator::load_table(&table, config, &cache)
        .with_context(|| format!("loading migration table {}", table.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_definition_is_valid() {
        cli().debug_assert();
    }

    #[test]
    fn policy_names() {
        assert_eq!(parse_policy("reject").unwrap(), CollisionPolicy::Reject);
        assert_eq!(parse_policy("first-wins").unwrap(), CollisionPolicy::FirstWins);
        assert_eq!(parse_policy("last-wins").unwrap(), CollisionPolicy::LastWins);
        assert!(parse_policy("newest").is_err());
    }

    #[test]
    fn global_options_after_subcommand() {
        let matches = cli()
            .try_get_matches_from([
                "reloc",
                "resolve",
                "--table",
                "t.csv",
                "--collision-policy",
                "reject",
                "--workers",
                "3",
                "g",
                "a",
            ])
            .unwrap();
        let (_, args) = matches.subcommand().unwrap();

        let config = load_config(args).unwrap();
        assert_eq!(config.table, Some(PathBuf::from("t.csv")));
        assert_eq!(config.collision_policy, CollisionPolicy::Reject);
        assert_eq!(config.workers, 3);
    }

    #[test]
    fn zero_workers_rejected() {
        let matches = cli()
            .try_get_matches_from(["reloc", "check", "--workers", "0", "deps.txt"])
            .unwrap();
        let (_, args) = matches.subcommand().unwrap();
        assert!(load_config(args).is_err());
    }
}
