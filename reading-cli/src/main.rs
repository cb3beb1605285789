//! Command-line interface for reading logs
//! Parses a reading log into items and prints them, or answers a statistics query about them.
//!
//! Usage:
//!   reading `<path|->` [--config `<file>`] [--set `<key=value>`]... [--format json|yaml]
//!   reading `<path|->` --stats `<query>`               - e.g. --stats "count status=done by year"

use anyhow::{anyhow, bail, Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Arg, ArgAction, ArgMatches, Command};
use reading_config::Loader;
use reading_parser::reading::item::Item;
use reading_parser::reading::loader::{ErrorPolicy, LogParser, ParseOutcome};
use serde::Serialize;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() {
    let matches = Command::new("reading")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for parsing and querying reading logs")
        .arg_required_else_help(true)
        .arg(
            Arg::new("path")
                .help("Path to the reading log, or - for standard input")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("TOML file layered over the default settings"),
        )
        .arg(
            Arg::new("set")
                .long("set")
                .help("Override one setting (e.g. pages_per_hour=40)")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .short('f')
                .help("Output format")
                .value_parser(["json", "yaml"])
                .default_value("json"),
        )
        .arg(
            Arg::new("stats")
                .long("stats")
                .short('s')
                .help("Answer a statistics query instead of printing items"),
        )
        .arg(
            Arg::new("skip-errors")
                .long("skip-errors")
                .help("Report failing rows and keep going instead of stopping")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("today")
                .long("today")
                .help("Date (yyyy-mm-dd) that open ranges run until; defaults to the current date"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log every row")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    init_logging(matches.get_flag("verbose"));

    if let Err(error) = execute(&matches) {
        eprintln!("Error: {:#}", error);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn execute(matches: &ArgMatches) -> Result<()> {
    let config = load_config(matches)?;
    let pages_per_hour = config.pages_per_hour();
    let today = match matches.get_one::<String>("today") {
        Some(text) => NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .with_context(|| format!("--today expects yyyy-mm-dd, got \"{}\"", text))?,
        None => Local::now().date_naive(),
    };
    let policy = if matches.get_flag("skip-errors") {
        ErrorPolicy::Skip
    } else {
        ErrorPolicy::Abort
    };

    let parser = LogParser::new(Arc::new(config), today);
    let path = matches
        .get_one::<String>("path")
        .ok_or_else(|| anyhow!("missing path"))?;
    let outcome = parse(&parser, path, policy)?;
    for error in &outcome.errors {
        eprintln!("skipped {}", error);
    }

    let format = matches
        .get_one::<String>("format")
        .map(String::as_str)
        .unwrap_or("json");
    let output = match matches.get_one::<String>("stats") {
        Some(query) => {
            let result = reading_stats::run(query, &outcome.items, pages_per_hour)?;
            render(&result, format)?
        }
        None => {
            let items = outcome
                .items
                .iter()
                .map(Item::to_json)
                .collect::<serde_json::Result<Vec<_>>>()?;
            render(&items, format)?
        }
    };
    println!("{}", output);
    Ok(())
}

fn load_config(matches: &ArgMatches) -> Result<reading_parser::reading::config::Config> {
    let mut loader = Loader::new();
    if let Some(file) = matches.get_one::<String>("config") {
        debug!(file, "layering config file");
        loader = loader.with_file(file);
    }
    for assignment in matches.get_many::<String>("set").into_iter().flatten() {
        let Some((key, value)) = assignment.split_once('=') else {
            bail!("--set expects key=value, got \"{}\"", assignment);
        };
        loader = loader.set_override(key.trim(), value.trim())?;
    }
    loader.build_config().context("invalid configuration")
}

fn parse(parser: &LogParser, path: &str, policy: ErrorPolicy) -> Result<ParseOutcome> {
    if path == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("could not read standard input")?;
        return Ok(parser.parse_str(&text, policy)?);
    }
    Ok(parser.parse_path(Path::new(path), policy)?)
}

fn render<T: Serialize>(value: &T, format: &str) -> Result<String> {
    match format {
        "yaml" => Ok(serde_yaml::to_string(value)?),
        _ => Ok(serde_json::to_string_pretty(value)?),
    }
}
