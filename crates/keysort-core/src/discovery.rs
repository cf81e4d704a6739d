//! File discovery for Python sources
//!
//! The transform only ever touches `.py` files; anything else passed by a
//! caller is skipped without being opened for write.

use std::path::{Path, PathBuf};

use tracing::warn;
use walkdir::{DirEntry, WalkDir};

/// Whether a path names a Python source file
pub fn is_python_file(path: &Path) -> bool {
    path.extension().and_then(|ext| ext.to_str()) == Some("py")
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .map(|name| name.starts_with('.'))
            .unwrap_or(false)
}

/// Recursively collect `*.py` files under `root`, skipping hidden
/// directories. Results are sorted for deterministic processing order.
pub fn collect_python_files(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_entry(|entry| !is_hidden(entry))
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!("skipping unreadable directory entry: {err}");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file() && is_python_file(entry.path()))
        .map(|entry| entry.into_path())
        .collect();
    files.sort();
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn python_file_detection() {
        assert!(is_python_file(Path::new("a.py")));
        assert!(is_python_file(Path::new("pkg/mod.py")));
        assert!(!is_python_file(Path::new("a.pyi")));
        assert!(!is_python_file(Path::new("a.txt")));
        assert!(!is_python_file(Path::new("py")));
    }

    #[test]
    fn collects_recursively_and_skips_hidden() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("pkg")).unwrap();
        fs::create_dir(dir.path().join(".venv")).unwrap();
        fs::write(dir.path().join("a.py"), "x = 1\n").unwrap();
        fs::write(dir.path().join("pkg/b.py"), "y = 2\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();
        fs::write(dir.path().join(".venv/c.py"), "z = 3\n").unwrap();

        let files = collect_python_files(dir.path());
        let names: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["a.py", "pkg/b.py"]);
    }
}
