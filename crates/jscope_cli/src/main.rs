//! jscope: scope analysis for JavaScript files.
//!
//! Usage:
//!   jscope [options] [file...]
//!
//! Prints parse errors, scope warnings and lint hints for each file, or the
//! occurrences and rename spans of the name at a given location.

use clap::Parser as ClapParser;
use jscope_core::text::SourcePosition;
use jscope_diagnostics::{Marker, MarkerKind};
use jscope_ls::{LanguageService, RenamePositions, RowColumn, ServiceError, Snapshot};
use jscope_options::{find_config, load_config, ConfigError, Features, JscopeConfig, FEATURE_NAMES};
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process;
use thiserror::Error;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(ClapParser, Debug)]
#[command(name = "jscope", about = "jscope - scope analysis and lint hints for JavaScript", version)]
struct Cli {
    /// JavaScript files to analyze.
    #[arg(value_name = "FILE")]
    files: Vec<PathBuf>,

    /// Path to jscope.json. Searched for from the current directory when absent.
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Print results as JSON.
    #[arg(long)]
    json: bool,

    /// Show every occurrence of the name at LINE:COL (1-based).
    #[arg(long, value_name = "LINE:COL", value_parser = parse_location, conflicts_with = "rename")]
    occurrences: Option<Location>,

    /// Show the spans a rename of the name at LINE:COL (1-based) would touch.
    #[arg(long, value_name = "LINE:COL", value_parser = parse_location)]
    rename: Option<Location>,

    /// Enable a feature (unusedFunctionArgs, instanceHighlight).
    #[arg(long = "feature", value_name = "NAME")]
    enable: Vec<String>,

    /// Disable a feature.
    #[arg(long = "no-feature", value_name = "NAME")]
    disable: Vec<String>,

    /// Exit with status 1 when any marker is reported.
    #[arg(long = "deny-warnings")]
    deny_warnings: bool,
}

/// A 1-based line and column given on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Location {
    line: u32,
    column: u32,
}

fn parse_location(s: &str) -> Result<Location, String> {
    let (line, column) = s
        .split_once(':')
        .ok_or_else(|| format!("expected LINE:COL, got '{}'", s))?;
    let parse = |part: &str| -> Result<u32, String> {
        match part.trim().parse::<u32>() {
            Ok(0) | Err(_) => Err(format!("'{}' is not a positive number", part)),
            Ok(n) => Ok(n),
        }
    };
    Ok(Location {
        line: parse(line)?,
        column: parse(column)?,
    })
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("unknown feature '{0}' (known features: {known})", known = FEATURE_NAMES.join(", "))]
    UnknownFeature(String),

    #[error("No input files found.")]
    NoInput,

    #[error("--occurrences and --rename take exactly one file")]
    SingleFileRequired,

    #[error("{path}({line},{column}) is outside the file")]
    OutOfRange {
        path: String,
        line: u32,
        column: u32,
    },

    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write JSON: {0}")]
    Json(#[from] serde_json::Error),
}

// ANSI color codes
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";
const GRAY: &str = "\x1b[90m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

fn main() {
    let cli = Cli::parse();
    init_logging();

    let exit_code = match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            print_error(&e.to_string());
            2
        }
    };
    process::exit(exit_code);
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("JSCOPE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(stderr_is_terminal())
        .init();
}

fn run(cli: &Cli) -> Result<i32, CliError> {
    let (config, config_dir) = resolve_config(cli)?;
    let features = resolve_features(&config, cli)?;
    debug!(?features, "resolved features");

    let files = if cli.files.is_empty() {
        discover_files(&config, &config_dir)
    } else {
        cli.files.clone()
    };
    if files.is_empty() {
        return Err(CliError::NoInput);
    }

    if let Some(location) = cli.occurrences {
        return run_occurrences(cli, &files, location, features);
    }
    if let Some(location) = cli.rename {
        return run_rename(cli, &files, location, features);
    }
    run_check(cli, &files, features)
}

/// The explicit `--config`, else the nearest `jscope.json`, else defaults.
fn resolve_config(cli: &Cli) -> Result<(JscopeConfig, PathBuf), CliError> {
    let cwd = std::env::current_dir().map_err(|source| CliError::Io {
        path: PathBuf::from("."),
        source,
    })?;
    let path = match &cli.config {
        Some(path) => Some(path.clone()),
        None => find_config(&cwd),
    };
    match path {
        Some(path) => {
            debug!(path = %path.display(), "loading config");
            let config = load_config(&path)?;
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(Path::to_path_buf)
                .unwrap_or(cwd);
            Ok((config, dir))
        }
        None => Ok((JscopeConfig::default(), cwd)),
    }
}

/// Config features with the command-line overrides applied on top.
fn resolve_features(config: &JscopeConfig, cli: &Cli) -> Result<Features, CliError> {
    let mut features = config.features;
    for name in &cli.enable {
        if !features.set(name, true) {
            return Err(CliError::UnknownFeature(name.clone()));
        }
    }
    for name in &cli.disable {
        if !features.set(name, false) {
            return Err(CliError::UnknownFeature(name.clone()));
        }
    }
    Ok(features)
}

/// Expand the config's `include` entries (files or directories, relative to
/// the config file) into `.js` files. Directory entries named in `exclude`
/// are skipped.
fn discover_files(config: &JscopeConfig, root: &Path) -> Vec<PathBuf> {
    let Some(include) = config.include.as_deref() else {
        return Vec::new();
    };
    let default_exclude = vec!["node_modules".to_string()];
    let exclude = config.exclude.as_deref().unwrap_or(&default_exclude);

    let mut files = Vec::new();
    for entry in include {
        let path = root.join(entry);
        if path.is_file() {
            files.push(path);
        } else if path.is_dir() {
            collect_js_files(&path, exclude, &mut files);
        }
    }
    files.sort();
    files.dedup();
    files
}

fn collect_js_files(dir: &Path, exclude: &[String], out: &mut Vec<PathBuf>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if exclude.iter().any(|e| e.as_str() == name) {
            continue;
        }
        if path.is_dir() {
            collect_js_files(&path, exclude, out);
        } else if path.extension().is_some_and(|ext| ext == "js") {
            out.push(path);
        }
    }
}

// ============================================================================
// Checking
// ============================================================================

#[derive(Debug, Serialize)]
struct FileReport {
    file: String,
    markers: Vec<Marker>,
}

fn analyze_file(path: &Path, features: &Features) -> Result<FileReport, CliError> {
    let text = std::fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let snapshot = Snapshot::analyze(text, 0, features);
    Ok(FileReport {
        file: path.display().to_string(),
        markers: snapshot.markers(),
    })
}

fn run_check(cli: &Cli, files: &[PathBuf], features: Features) -> Result<i32, CliError> {
    let results: Vec<Result<FileReport, CliError>> = files
        .par_iter()
        .map(|path| analyze_file(path, &features))
        .collect();

    let mut reports = Vec::with_capacity(results.len());
    let mut failed = false;
    for result in results {
        match result {
            Ok(report) => reports.push(report),
            Err(e) => {
                print_error(&e.to_string());
                failed = true;
            }
        }
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        let use_color = stderr_is_terminal();
        for report in &reports {
            for marker in &report.markers {
                print_marker(&report.file, marker, use_color);
            }
        }
        print_summary(&reports, use_color);
    }

    if failed {
        return Ok(2);
    }
    let any_markers = reports.iter().any(|r| !r.markers.is_empty());
    Ok(if cli.deny_warnings && any_markers { 1 } else { 0 })
}

fn print_marker(file: &str, marker: &Marker, use_color: bool) {
    if use_color {
        let color = match marker.kind {
            MarkerKind::Error => RED,
            MarkerKind::Warning => YELLOW,
            _ => GRAY,
        };
        eprint!("{}{}{}({}): ", CYAN, file, RESET, marker.pos);
        eprint!("{}{}{}{}", BOLD, color, marker.kind, RESET);
        if let Some(code) = marker.code {
            eprint!(" {}JS{}{}", GRAY, code, RESET);
        }
        match &marker.message {
            Some(message) => eprintln!(": {}", message),
            None => eprintln!(),
        }
    } else {
        eprintln!("{}{}", file, marker);
    }
}

fn print_summary(reports: &[FileReport], use_color: bool) {
    let markers = || reports.iter().flat_map(|r| &r.markers);
    let errors = markers().filter(|m| m.is_error()).count();
    let warnings = markers().filter(|m| !m.is_error()).count();
    if errors == 0 && warnings == 0 {
        return;
    }
    let plural = |n: usize| if n == 1 { "" } else { "s" };
    let text = format!(
        "Found {} error{} and {} warning{}.",
        errors,
        plural(errors),
        warnings,
        plural(warnings)
    );
    if use_color {
        let color = if errors > 0 { RED } else { YELLOW };
        eprintln!("\n{}{}{}", color, text, RESET);
    } else {
        eprintln!("\n{}", text);
    }
}

// ============================================================================
// Cursor queries
// ============================================================================

/// Open the single input file and convert a 1-based location to an offset.
fn open_at(
    files: &[PathBuf],
    location: Location,
    features: Features,
) -> Result<(LanguageService, String, u32), CliError> {
    let [path] = files else {
        return Err(CliError::SingleFileRequired);
    };
    let mut service = LanguageService::with_features(features);
    let uri = service.open_file(path)?;
    let offset = service
        .offset_of(&uri, location.line - 1, location.column - 1)?
        .ok_or_else(|| CliError::OutOfRange {
            path: uri.clone(),
            line: location.line,
            column: location.column,
        })?;
    Ok((service, uri, offset))
}

fn run_occurrences(
    cli: &Cli,
    files: &[PathBuf],
    location: Location,
    features: Features,
) -> Result<i32, CliError> {
    let (service, uri, offset) = open_at(files, location, features)?;
    let context = service.get_cursor_context(&uri, offset)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&context)?);
        return Ok(0);
    }
    for marker in context.markers.iter().flatten() {
        println!("{}({}): {}", uri, marker.pos, marker.kind);
    }
    if !context.enabled_refactorings.is_empty() {
        println!("refactorings: {}", context.enabled_refactorings.join(", "));
    }
    Ok(0)
}

fn run_rename(
    cli: &Cli,
    files: &[PathBuf],
    location: Location,
    features: Features,
) -> Result<i32, CliError> {
    let (service, uri, offset) = open_at(files, location, features)?;
    let rename = service.get_rename_positions(&uri, offset)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&rename)?);
        return Ok(0);
    }
    match rename {
        Some(rename) => print_rename(&uri, &rename),
        None => println!("{}({},{}): nothing to rename", uri, location.line, location.column),
    }
    Ok(0)
}

fn print_rename(uri: &str, rename: &RenamePositions) {
    let span = |at: RowColumn| {
        SourcePosition {
            start_line: at.row,
            start_column: at.column,
            end_line: at.row,
            end_column: at.column + rename.length,
        }
    };
    println!("{}({}): rename {} characters", uri, span(rename.pos), rename.length);
    for &other in &rename.others {
        println!("{}({})", uri, span(other));
    }
}

fn print_error(msg: &str) {
    if stderr_is_terminal() {
        eprintln!("{}{}error{}: {}", BOLD, RED, RESET, msg);
    } else {
        eprintln!("error: {}", msg);
    }
}

fn stderr_is_terminal() -> bool {
    #[cfg(unix)]
    {
        unsafe { libc::isatty(2) != 0 }
    }
    #[cfg(not(unix))]
    {
        false
    }
}
