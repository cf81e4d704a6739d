//! keysort CLI
//!
//! Rewrites Python source files in place so that the keys of eligible
//! dictionary literals are sorted, preserving every other byte of the file.

mod output;

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgAction, Parser, ValueEnum};
use keysort_core::{
    FileOutcome, KeysortError, SortMode, WriteMode, collect_python_files, init_tracing,
    is_python_file, parse_checked, process_file, transform_tree,
};
use similar::TextDiff;
use tracing::debug;

use output::{FileReport, Reporter};

#[derive(Parser)]
#[command(name = "keysort")]
#[command(about = "Sort the keys of Python dictionary literals in place")]
#[command(version = keysort_core::VERSION)]
#[command(
    long_about = "keysort rewrites Python files so that every dictionary literal whose keys\n\
are all plain string constants has its entries in sorted order. Formatting,\n\
comments, and everything outside those dictionaries is preserved verbatim.\n\
\n\
Examples:\n  \
keysort src/settings.py        # Rewrite one file\n  \
keysort --check src/           # Report what would change, touch nothing\n  \
keysort --diff src/app.py      # Show the proposed rewrite as a diff"
)]
struct Cli {
    /// Files or directories to process; directories are walked for *.py
    paths: Vec<PathBuf>,

    /// Key ordering applied to eligible dictionaries
    #[arg(long, value_enum, default_value_t = SortingArg::Alpha)]
    sorting: SortingArg,

    /// Report files that would change without rewriting them
    #[arg(long)]
    check: bool,

    /// Print a unified diff of the proposed rewrite instead of writing
    #[arg(long)]
    diff: bool,

    /// Output format for per-file results
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    output_format: OutputFormat,

    /// Verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum SortingArg {
    /// Lexicographic (codepoint) order over the extracted key text
    Alpha,
}

impl From<SortingArg> for SortMode {
    fn from(arg: SortingArg) -> Self {
        match arg {
            SortingArg::Alpha => SortMode::Alpha,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Per-file lines plus a summary
    Human,
    /// Machine-readable report for programmatic consumption
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if !cli.no_color && std::env::var("NO_COLOR").is_err() {
        colored::control::set_override(true);
    } else {
        colored::control::set_override(false);
    }

    let log_level = match cli.verbose {
        0 => "keysort=error,keysort_core=error",
        1 => "keysort=warn,keysort_core=warn",
        2 => "keysort=info,keysort_core=info",
        3 => "keysort=debug,keysort_core=debug",
        _ => "keysort=trace,keysort_core=trace",
    };
    unsafe {
        std::env::set_var("RUST_LOG", log_level);
    }
    init_tracing();

    run(cli)
}

fn run(cli: Cli) -> ExitCode {
    if cli.paths.is_empty() {
        return ExitCode::SUCCESS;
    }

    let mode = SortMode::from(cli.sorting);
    let write = if cli.check || cli.diff {
        WriteMode::Check
    } else {
        WriteMode::Write
    };
    let reporter = Reporter::new(cli.output_format, cli.check || cli.diff, cli.diff);

    let mut reports = Vec::new();
    for path in expand_paths(&cli.paths) {
        let report = match process_one(&path, mode, write, cli.diff) {
            Ok((outcome, rendered_diff)) => {
                if let Some(rendered_diff) = rendered_diff {
                    print!("{rendered_diff}");
                }
                FileReport::from_outcome(&path, &outcome)
            }
            Err(err) => FileReport::from_error(&path, &err),
        };
        reporter.file(&report);
        reports.push(report);
    }
    reporter.finish(&reports);

    let errors = reports.iter().filter(|r| r.is_error()).count();
    let changed = reports.iter().filter(|r| r.is_changed()).count();
    if errors > 0 {
        ExitCode::from(2)
    } else if changed > 0 {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}

/// Expand directory arguments into the Python files beneath them; explicit
/// file arguments pass through unchanged (non-`.py` files are skipped later)
fn expand_paths(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut targets = Vec::new();
    for path in paths {
        if path.is_dir() {
            targets.extend(collect_python_files(path));
        } else {
            targets.push(path.clone());
        }
    }
    targets
}

/// Process one file, additionally rendering a unified diff in diff mode
/// (which never writes)
fn process_one(
    path: &Path,
    mode: SortMode,
    write: WriteMode,
    diff: bool,
) -> keysort_core::Result<(FileOutcome, Option<String>)> {
    if !diff {
        return process_file(path, mode, write).map(|outcome| (outcome, None));
    }

    if !is_python_file(path) {
        debug!(path = %path.display(), "skipping non-Python file");
        return Ok((FileOutcome::Skipped, None));
    }
    let source = fs::read_to_string(path).map_err(|err| KeysortError::io(path, err))?;
    let root = parse_checked(path, &source)?;
    let (tree, dicts_reordered) = transform_tree(&root, mode);
    if dicts_reordered == 0 {
        return Ok((FileOutcome::Unchanged, None));
    }
    let rendered = render_diff(path, &source, &tree.text().to_string());
    Ok((FileOutcome::Changed { dicts_reordered }, Some(rendered)))
}

fn render_diff(path: &Path, before: &str, after: &str) -> String {
    let display = path.display().to_string();
    let diff = TextDiff::from_lines(before, after);
    let mut unified = diff.unified_diff();
    unified
        .context_radius(3)
        .header(&format!("a/{display}"), &format!("b/{display}"));
    unified.to_string()
}
