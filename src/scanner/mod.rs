//! Submission directory scanner.
//!
//! Enumerates the regular files directly inside a submissions directory,
//! honoring the configured exclusion list.

use crate::error::{GradebookError, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Configuration for submission scanning.
#[derive(Debug, Clone, Default)]
pub struct ScanConfig {
    /// File names to skip (exact match, e.g. `["README.md"]`).
    pub excludes: Vec<String>,
}

impl From<&crate::config::DataConfig> for ScanConfig {
    fn from(config: &crate::config::DataConfig) -> Self {
        Self {
            excludes: config.excludes.clone(),
        }
    }
}

/// Scanned submission file.
#[derive(Debug, Clone)]
pub struct ScannedFile {
    /// Absolute or caller-relative path to the file.
    pub path: PathBuf,
    /// File size in bytes.
    pub size: u64,
}

/// Scanner for the files of one submissions directory.
pub struct SubmissionScanner {
    config: ScanConfig,
    root: PathBuf,
}

impl SubmissionScanner {
    pub fn new(root: PathBuf, config: ScanConfig) -> Self {
        Self { config, root }
    }

    /// List every regular file in the directory (non-recursive).
    ///
    /// Symlinks to files are followed. Results are sorted by file name so
    /// runs are reproducible, though nothing downstream relies on order.
    pub fn scan(&self) -> Result<Vec<ScannedFile>> {
        if !self.root.is_dir() {
            return Err(GradebookError::io(
                &self.root,
                std::io::Error::new(std::io::ErrorKind::NotFound, "not a directory"),
            ));
        }

        let mut files = Vec::new();
        let walker = WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() > 0 && is_not_found(&e) => {
                    // Dangling symlink: there is no regular file behind it.
                    warn!("Skipping broken link {}", e.path().unwrap_or(&self.root).display());
                    continue;
                }
                Err(e) => {
                    let path = e
                        .path()
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|| self.root.clone());
                    let source = e
                        .into_io_error()
                        .unwrap_or_else(|| std::io::Error::other("filesystem loop"));
                    return Err(GradebookError::io(path, source));
                }
            };

            if !entry.file_type().is_file() {
                debug!("Skipping non-file entry {}", entry.path().display());
                continue;
            }

            let name = entry.file_name().to_string_lossy();
            if self.is_excluded(&name) {
                debug!("Skipping excluded file {}", entry.path().display());
                continue;
            }

            let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
            files.push(ScannedFile {
                path: entry.into_path(),
                size,
            });
        }

        Ok(files)
    }

    fn is_excluded(&self, name: &str) -> bool {
        self.config.excludes.iter().any(|pattern| name == pattern)
    }
}

fn is_not_found(err: &walkdir::Error) -> bool {
    err.io_error()
        .is_some_and(|e| e.kind() == std::io::ErrorKind::NotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_scan_lists_regular_files_only() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("b.txt"), "S01|A01|80").unwrap();
        std::fs::write(temp_dir.path().join("a.txt"), "S02|A01|90").unwrap();
        std::fs::create_dir(temp_dir.path().join("nested")).unwrap();
        std::fs::write(temp_dir.path().join("nested").join("c.txt"), "S03|A01|70").unwrap();

        let scanner = SubmissionScanner::new(temp_dir.path().to_path_buf(), ScanConfig::default());
        let files = scanner.scan().unwrap();

        let names: Vec<_> = files
            .iter()
            .map(|f| f.path.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.txt", "b.txt"]);
        assert_eq!(files[0].size, 10);
    }

    #[test]
    fn test_scan_honors_excludes() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("keep.txt"), "").unwrap();
        std::fs::write(temp_dir.path().join("README"), "").unwrap();

        let config = ScanConfig {
            excludes: vec!["README".to_string()],
        };
        let files = SubmissionScanner::new(temp_dir.path().to_path_buf(), config)
            .scan()
            .unwrap();

        assert_eq!(files.len(), 1);
        assert!(files[0].path.ends_with("keep.txt"));
    }

    #[cfg(unix)]
    #[test]
    fn test_scan_skips_dangling_symlink() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("real.txt"), "S01|A01|80").unwrap();
        std::fs::write(temp_dir.path().join("target.txt"), "").unwrap();
        std::os::unix::fs::symlink(
            temp_dir.path().join("target.txt"),
            temp_dir.path().join("linked.txt"),
        )
        .unwrap();
        std::os::unix::fs::symlink(temp_dir.path().join("gone.txt"), temp_dir.path().join("stale"))
            .unwrap();

        let scanner = SubmissionScanner::new(temp_dir.path().to_path_buf(), ScanConfig::default());
        let files = scanner.scan().unwrap();

        let names: Vec<_> = files
            .iter()
            .map(|f| f.path.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["linked.txt", "real.txt", "target.txt"]);
    }

    #[test]
    fn test_scan_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let scanner = SubmissionScanner::new(temp_dir.path().join("nope"), ScanConfig::default());
        assert!(matches!(scanner.scan(), Err(GradebookError::Io { .. })));
    }
}
