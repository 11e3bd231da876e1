//! Archive summary reporting
//!
//! Aggregates file count, total size, a MIME-type histogram, and the
//! largest files under a directory tree, and writes a plain-text summary
//! to a caller-specified path. Presentation glue around the core scans;
//! per-file errors are counted but never abort the walk.

use crate::core::error::{ArchiveError, Result};
use crate::core::metadata::{self, format_file_size};
use log::{debug, info};
use serde_json::json;
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Number of largest files listed by default
pub const DEFAULT_TOP_N: usize = 5;

/// Aggregated statistics for one directory tree
#[derive(Debug, Default)]
pub struct ArchiveReport {
    /// Root the report was built from
    pub root: PathBuf,
    /// Number of regular files seen
    pub total_files: usize,
    /// Sum of their sizes in bytes
    pub total_bytes: u64,
    /// Files per MIME type, sorted by type name
    pub type_counts: BTreeMap<String, usize>,
    /// The N largest files, biggest first
    pub largest_files: Vec<(u64, PathBuf)>,
    /// Files that could not be read while aggregating
    pub errors: usize,
}

impl ArchiveReport {
    /// Walk `root` and aggregate its statistics, keeping the `top_n`
    /// largest files
    pub fn build(root: &Path, top_n: usize) -> Result<Self> {
        if !root.exists() {
            return Err(ArchiveError::NotFound(root.to_path_buf()));
        }
        if !root.is_dir() {
            return Err(ArchiveError::NotADirectory(root.to_path_buf()));
        }

        let mut report = ArchiveReport {
            root: root.to_path_buf(),
            ..Default::default()
        };
        let mut sizes: Vec<(u64, PathBuf)> = Vec::new();

        let walker = WalkDir::new(root).follow_links(false).sort_by_file_name();
        for entry in walker {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    debug!("Skipping unreadable entry: {}", e);
                    report.errors += 1;
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let meta = match metadata::extract(path) {
                Ok(m) => m,
                Err(e) => {
                    debug!("Skipping {}: {}", path.display(), e);
                    report.errors += 1;
                    continue;
                }
            };

            report.total_files += 1;
            report.total_bytes += meta.size_bytes;
            *report.type_counts.entry(meta.mime_type).or_insert(0) += 1;
            sizes.push((meta.size_bytes, path.to_path_buf()));
        }

        // Biggest first; path as tie-breaker keeps the order stable
        sizes.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
        sizes.truncate(top_n);
        report.largest_files = sizes;

        info!(
            "Report for {}: {} files, {}",
            root.display(),
            report.total_files,
            format_file_size(report.total_bytes)
        );

        Ok(report)
    }

    /// Render the plain-text summary
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("Archive report for {}\n\n", self.root.display()));
        out.push_str(&format!("Total Files: {}\n", self.total_files));
        out.push_str(&format!(
            "Total Size: {}\n\n",
            format_file_size(self.total_bytes)
        ));

        out.push_str("Files by Type:\n");
        for (mime, count) in &self.type_counts {
            out.push_str(&format!("  {}: {}\n", mime, count));
        }

        out.push_str(&format!(
            "\nTop {} Largest Files:\n",
            self.largest_files.len()
        ));
        for (size, path) in &self.largest_files {
            out.push_str(&format!(
                "  {} ({})\n",
                path.display(),
                format_file_size(*size)
            ));
        }
        out
    }

    /// Write the plain-text summary to `output`
    pub fn write_text(&self, output: &Path) -> Result<()> {
        let mut file = fs::File::create(output)?;
        file.write_all(self.to_text().as_bytes())?;
        info!("Report written to {}", output.display());
        Ok(())
    }

    /// JSON rendering of the same statistics
    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "root": self.root.display().to_string(),
            "total_files": self.total_files,
            "total_bytes": self.total_bytes,
            "total_size": format_file_size(self.total_bytes),
            "type_counts": &self.type_counts,
            "largest_files": self.largest_files.iter().map(|(size, path)| {
                json!({
                    "path": path.display().to_string(),
                    "size_bytes": size,
                })
            }).collect::<Vec<_>>(),
            "errors": self.errors,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    fn write_file(dir: &Path, name: &str, contents: &[u8]) -> PathBuf {
        let path = dir.join(name);
        File::create(&path).unwrap().write_all(contents).unwrap();
        path
    }

    #[test]
    fn test_report_aggregates_counts_and_sizes() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "a.txt", b"hello");
        write_file(dir.path(), "b.txt", b"hi");
        write_file(dir.path(), "c.png", &[0u8; 100]);

        let report = ArchiveReport::build(dir.path(), DEFAULT_TOP_N).unwrap();
        assert_eq!(report.total_files, 3);
        assert_eq!(report.total_bytes, 107);
        assert_eq!(report.type_counts.get("text/plain"), Some(&2));
        assert_eq!(report.type_counts.get("image/png"), Some(&1));
    }

    #[test]
    fn test_largest_files_biggest_first_and_truncated() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "small.bin", &[0u8; 10]);
        write_file(dir.path(), "medium.bin", &[0u8; 50]);
        write_file(dir.path(), "large.bin", &[0u8; 200]);

        let report = ArchiveReport::build(dir.path(), 2).unwrap();
        assert_eq!(report.largest_files.len(), 2);
        assert_eq!(report.largest_files[0].0, 200);
        assert_eq!(report.largest_files[1].0, 50);
    }

    #[test]
    fn test_text_summary_contents() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "a.txt", b"hello");

        let report = ArchiveReport::build(dir.path(), DEFAULT_TOP_N).unwrap();
        let text = report.to_text();
        assert!(text.contains("Total Files: 1"));
        assert!(text.contains("Total Size: 5.00 B"));
        assert!(text.contains("text/plain: 1"));
        assert!(text.contains("a.txt"));
    }

    #[test]
    fn test_write_text_creates_output_file() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "a.txt", b"hello");
        let output = dir.path().join("report.txt");

        let report = ArchiveReport::build(dir.path(), DEFAULT_TOP_N).unwrap();
        report.write_text(&output).unwrap();

        let written = fs::read_to_string(&output).unwrap();
        assert!(written.contains("Total Files:"));
    }

    #[test]
    fn test_json_shape() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "a.txt", b"hello");

        let report = ArchiveReport::build(dir.path(), DEFAULT_TOP_N).unwrap();
        let value = report.to_json();
        assert_eq!(value["total_files"], 1);
        assert_eq!(value["total_bytes"], 5);
        assert_eq!(value["type_counts"]["text/plain"], 1);
    }

    #[test]
    fn test_missing_root_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            ArchiveReport::build(&dir.path().join("nope"), 5),
            Err(ArchiveError::NotFound(_))
        ));
    }
}
