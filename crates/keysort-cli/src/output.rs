//! Per-file outcome reporting in human and JSON formats

use std::path::{Path, PathBuf};

use colored::Colorize;
use keysort_core::{FileOutcome, KeysortError};
use serde::Serialize;

use crate::OutputFormat;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Skipped,
    Unchanged,
    Changed,
    Error,
}

/// What happened to one file, in a shape both output formats can use
#[derive(Debug, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub status: ReportStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dicts_reordered: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileReport {
    pub fn from_outcome(path: &Path, outcome: &FileOutcome) -> Self {
        let (status, dicts_reordered) = match outcome {
            FileOutcome::Skipped => (ReportStatus::Skipped, None),
            FileOutcome::Unchanged => (ReportStatus::Unchanged, None),
            FileOutcome::Changed { dicts_reordered } => {
                (ReportStatus::Changed, Some(*dicts_reordered))
            }
        };
        Self {
            path: path.to_path_buf(),
            status,
            dicts_reordered,
            error: None,
        }
    }

    pub fn from_error(path: &Path, err: &KeysortError) -> Self {
        Self {
            path: path.to_path_buf(),
            status: ReportStatus::Error,
            dicts_reordered: None,
            error: Some(err.to_string()),
        }
    }

    pub fn is_changed(&self) -> bool {
        self.status == ReportStatus::Changed
    }

    pub fn is_error(&self) -> bool {
        self.status == ReportStatus::Error
    }
}

/// Streams per-file lines as processing goes, then prints the final summary
pub struct Reporter {
    format: OutputFormat,
    dry_run: bool,
    diff: bool,
}

impl Reporter {
    pub fn new(format: OutputFormat, dry_run: bool, diff: bool) -> Self {
        Self {
            format,
            dry_run,
            diff,
        }
    }

    /// Report one file as soon as it has been processed
    ///
    /// Errors always go to stderr so they survive JSON mode and diff piping.
    pub fn file(&self, report: &FileReport) {
        if let Some(message) = &report.error {
            eprintln!("{}", message.red());
        }
        if self.format != OutputFormat::Human || self.diff {
            return;
        }
        if report.is_changed() {
            let path = report.path.display();
            if self.dry_run {
                println!("{}", format!("Would fix {path}").yellow());
            } else {
                println!("{}", format!("Fixed {path}").green());
            }
        }
    }

    /// Print the end-of-run summary line or the JSON report
    pub fn finish(&self, reports: &[FileReport]) {
        let changed = reports.iter().filter(|r| r.is_changed()).count();
        let errors = reports.iter().filter(|r| r.is_error()).count();
        match self.format {
            OutputFormat::Human => {
                let verb = if self.dry_run { "would change" } else { "changed" };
                println!(
                    "{changed} of {} files {verb}, {errors} errors",
                    reports.len()
                );
            }
            OutputFormat::Json => {
                let report = RunReport {
                    files: reports,
                    changed,
                    errors,
                };
                match serde_json::to_string_pretty(&report) {
                    Ok(json) => println!("{json}"),
                    Err(err) => {
                        eprintln!("{}", format!("failed to render JSON report: {err}").red())
                    }
                }
            }
        }
    }
}

#[derive(Serialize)]
struct RunReport<'a> {
    files: &'a [FileReport],
    changed: usize,
    errors: usize,
}
