//! Per-file orchestration: read, transform, and conditionally write back
//!
//! An unchanged file is never rewritten, not even with identical bytes, so
//! a no-op run leaves mtimes and diffs alone. When a write does happen the
//! whole output string is serialized in memory first and written in a
//! single call.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::discovery::is_python_file;
use crate::error::KeysortError;
use crate::result::Result;
use crate::sorting::SortMode;
use crate::transform::{parse_checked, transform_tree};

/// Whether changed files are rewritten in place or only reported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Rewrite changed files in place
    Write,
    /// Report what would change without touching the file
    Check,
}

/// Per-file outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// The path does not name a Python source file; it was never opened
    Skipped,
    /// Every dictionary was already sorted (or ineligible)
    Unchanged,
    /// At least one dictionary was reordered
    Changed { dicts_reordered: usize },
}

/// Process one file: parse, reorder eligible dictionaries, and write the
/// result back iff anything changed
///
/// Errors are attributed to the file and never abort a multi-file run; the
/// caller decides how to aggregate per-file outcomes.
pub fn process_file(path: &Path, mode: SortMode, write: WriteMode) -> Result<FileOutcome> {
    if !is_python_file(path) {
        debug!(path = %path.display(), "skipping non-Python file");
        return Ok(FileOutcome::Skipped);
    }

    let source = fs::read_to_string(path).map_err(|err| KeysortError::io(path, err))?;
    let root = parse_checked(path, &source)?;
    let (tree, dicts_reordered) = transform_tree(&root, mode);

    if dicts_reordered == 0 {
        debug!(path = %path.display(), "already sorted");
        return Ok(FileOutcome::Unchanged);
    }

    if write == WriteMode::Write {
        // Serialize fully before touching the file
        let output = tree.text().to_string();
        fs::write(path, output).map_err(|err| KeysortError::io(path, err))?;
        debug!(path = %path.display(), dicts_reordered, "rewrote file");
    }

    Ok(FileOutcome::Changed { dicts_reordered })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn temp_py(content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("module.py");
        fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn rewrites_unsorted_file() {
        let (_dir, path) = temp_py("x = {\"b\": 1, \"a\": 2}\n");
        let outcome = process_file(&path, SortMode::Alpha, WriteMode::Write).unwrap();
        assert_eq!(outcome, FileOutcome::Changed { dicts_reordered: 1 });
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "x = {\"a\": 2, \"b\": 1}\n"
        );
    }

    #[test]
    fn check_mode_reports_without_writing() {
        let src = "x = {\"b\": 1, \"a\": 2}\n";
        let (_dir, path) = temp_py(src);
        let outcome = process_file(&path, SortMode::Alpha, WriteMode::Check).unwrap();
        assert_eq!(outcome, FileOutcome::Changed { dicts_reordered: 1 });
        assert_eq!(fs::read_to_string(&path).unwrap(), src);
    }

    #[test]
    fn sorted_file_is_not_rewritten() {
        let src = "x = {\"a\": 1, \"b\": 2}\n";
        let (_dir, path) = temp_py(src);
        let before = fs::metadata(&path).unwrap().modified().unwrap();
        let outcome = process_file(&path, SortMode::Alpha, WriteMode::Write).unwrap();
        assert_eq!(outcome, FileOutcome::Unchanged);
        let after = fs::metadata(&path).unwrap().modified().unwrap();
        assert_eq!(before, after, "no-op runs must not touch the file");
    }

    #[test]
    fn non_python_path_is_skipped_unopened() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        // never created on disk: a skip must not require opening the file
        let outcome = process_file(&path, SortMode::Alpha, WriteMode::Write).unwrap();
        assert_eq!(outcome, FileOutcome::Skipped);
    }

    #[test]
    fn parse_error_leaves_file_untouched() {
        let src = "x = {'a': 1\n";
        let (_dir, path) = temp_py(src);
        let err = process_file(&path, SortMode::Alpha, WriteMode::Write).unwrap_err();
        assert!(matches!(err, KeysortError::Parse { .. }));
        assert_eq!(fs::read_to_string(&path).unwrap(), src);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = process_file(
            Path::new("/nonexistent/missing.py"),
            SortMode::Alpha,
            WriteMode::Write,
        )
        .unwrap_err();
        assert!(matches!(err, KeysortError::Io { .. }));
    }
}
