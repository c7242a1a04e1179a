//! DEX log discovery and loading.
//!
//! Expands command-line inputs (files, directories, glob patterns) into an
//! ordered list of log paths and reads each log fully into memory.

use std::path::{Path, PathBuf};

use dex_core::error::{DexError, Result};
use tracing::{debug, warn};

/// Extension of DEX logs picked up when scanning a directory.
pub const LOG_EXTENSION: &str = "log";

// ── Public API ────────────────────────────────────────────────────────────────

/// Find all `.log` files recursively under `dir`, sorted by path.
pub fn find_log_files(dir: &Path) -> Vec<PathBuf> {
    if !dir.exists() {
        warn!("Directory does not exist: {}", dir.display());
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.file_type().is_file()
                && entry
                    .path()
                    .extension()
                    .map(|ext| ext.eq_ignore_ascii_case(LOG_EXTENSION))
                    .unwrap_or(false)
        })
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    files
}

/// Expand inputs into the list of files to process, preserving input order.
///
/// * an existing directory is scanned with [`find_log_files`];
/// * anything containing glob metacharacters that is not an existing path is
///   expanded as a pattern (matches come back sorted);
/// * everything else is passed through unchanged, even when it does not
///   exist, so the batch can report it as a failed file.
///
/// Fails only when a pattern cannot be compiled.
pub fn expand_inputs(inputs: &[String]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();

    for input in inputs {
        let path = Path::new(input);

        if path.is_dir() {
            let found = find_log_files(path);
            debug!("Directory {} holds {} log files", input, found.len());
            paths.extend(found);
        } else if !path.exists() && is_glob_pattern(input) {
            let matches = expand_pattern(input)?;
            if matches.is_empty() {
                warn!("No files match pattern: {}", input);
            }
            paths.extend(matches);
        } else {
            paths.push(path.to_path_buf());
        }
    }

    Ok(paths)
}

/// Read a whole DEX log into memory as UTF-8 text.
pub fn read_dex_file(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|source| DexError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    String::from_utf8(bytes).map_err(|source| DexError::Unreadable {
        path: path.to_path_buf(),
        source,
    })
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn is_glob_pattern(input: &str) -> bool {
    input.contains(['*', '?', '['])
}

/// Expand one glob pattern into matching files.
///
/// Entries that cannot be read (e.g. permission denied) are logged and skipped.
fn expand_pattern(pattern: &str) -> Result<Vec<PathBuf>> {
    let entries = glob::glob(pattern).map_err(|source| DexError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) if path.is_file() => files.push(path),
            Ok(path) => debug!("Skipping non-file match {}", path.display()),
            Err(e) => warn!("Could not read path matched by {}: {}", pattern, e),
        }
    }
    Ok(files)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn write_log(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    fn names(paths: &[PathBuf]) -> Vec<String> {
        paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    // ── find_log_files ────────────────────────────────────────────────────────

    #[test]
    fn test_find_log_files_recursive_and_sorted() {
        let dir = TempDir::new().unwrap();
        let sub = dir.path().join("site-3");
        std::fs::create_dir_all(&sub).unwrap();
        write_log(dir.path(), "c.log", "ID1*C");
        write_log(dir.path(), "a.log", "ID1*A");
        write_log(&sub, "b.log", "ID1*B");
        write_log(dir.path(), "notes.txt", "not a log");

        let files = find_log_files(dir.path());
        assert_eq!(names(&files), vec!["a.log", "c.log", "b.log"]);
    }

    #[test]
    fn test_find_log_files_uppercase_extension() {
        let dir = TempDir::new().unwrap();
        write_log(dir.path(), "MACHINE.LOG", "ID1*M");
        assert_eq!(find_log_files(dir.path()).len(), 1);
    }

    #[test]
    fn test_find_log_files_nonexistent_dir() {
        let files = find_log_files(Path::new("/tmp/does-not-exist-dex-reader-xyz"));
        assert!(files.is_empty());
    }

    // ── expand_inputs ─────────────────────────────────────────────────────────

    #[test]
    fn test_expand_inputs_glob_pattern() {
        let dir = TempDir::new().unwrap();
        write_log(dir.path(), "m2.log", "ID1*2");
        write_log(dir.path(), "m1.log", "ID1*1");
        write_log(dir.path(), "m1.txt", "ID1*x");

        let pattern = dir.path().join("*.log").to_string_lossy().into_owned();
        let files = expand_inputs(&[pattern]).unwrap();
        assert_eq!(names(&files), vec!["m1.log", "m2.log"]);
    }

    #[test]
    fn test_expand_inputs_keeps_argument_order() {
        let dir = TempDir::new().unwrap();
        let b = write_log(dir.path(), "b.log", "ID1*B");
        let a = write_log(dir.path(), "a.log", "ID1*A");

        let inputs = vec![
            b.to_string_lossy().into_owned(),
            a.to_string_lossy().into_owned(),
        ];
        let files = expand_inputs(&inputs).unwrap();
        assert_eq!(files, vec![b, a]);
    }

    #[test]
    fn test_expand_inputs_passes_missing_files_through() {
        let files = expand_inputs(&["missing-machine.log".to_string()]).unwrap();
        assert_eq!(files, vec![PathBuf::from("missing-machine.log")]);
    }

    #[test]
    fn test_expand_inputs_directory() {
        let dir = TempDir::new().unwrap();
        write_log(dir.path(), "x.log", "ID1*X");
        let files = expand_inputs(&[dir.path().to_string_lossy().into_owned()]).unwrap();
        assert_eq!(names(&files), vec!["x.log"]);
    }

    #[test]
    fn test_expand_inputs_unmatched_pattern_is_empty() {
        let dir = TempDir::new().unwrap();
        let pattern = dir.path().join("*.log").to_string_lossy().into_owned();
        assert!(expand_inputs(&[pattern]).unwrap().is_empty());
    }

    #[test]
    fn test_expand_inputs_invalid_pattern() {
        let err = expand_inputs(&["logs/[*.log".to_string()]).unwrap_err();
        assert!(matches!(err, DexError::InvalidPattern { .. }));
    }

    // ── read_dex_file ─────────────────────────────────────────────────────────

    #[test]
    fn test_read_dex_file_text() {
        let dir = TempDir::new().unwrap();
        let path = write_log(dir.path(), "m.log", "ID1*M001\n");
        assert_eq!(read_dex_file(&path).unwrap(), "ID1*M001\n");
    }

    #[test]
    fn test_read_dex_file_missing() {
        let err = read_dex_file(Path::new("/tmp/does-not-exist-dex-reader.log")).unwrap_err();
        assert!(matches!(err, DexError::FileRead { .. }));
    }

    #[test]
    fn test_read_dex_file_not_utf8() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.log");
        std::fs::write(&path, [0x49, 0x44, 0x31, 0x2a, 0xff, 0xfe]).unwrap();

        let err = read_dex_file(&path).unwrap_err();
        assert!(matches!(err, DexError::Unreadable { .. }));
    }
}
