//! File metadata extraction
//!
//! Provides [`extract`], which turns a file path into an immutable
//! [`FileMetadata`] snapshot (name, size, MIME type, timestamps, extension).
//! The snapshot is taken from a single `stat` call at extraction time and is
//! not kept in sync with the filesystem afterward.
//!
//! MIME types are resolved from the file extension first, so results are
//! stable across machines; files without a recognized extension fall back to
//! content sniffing via `tree_magic_mini`, and finally to `"unknown"`.

use crate::core::error::{ArchiveError, Result};
use chrono::{DateTime, Local};
use std::fs;
use std::path::Path;

/// MIME type reported when neither the extension nor content sniffing
/// yields an answer
pub const UNKNOWN_MIME: &str = "unknown";

/// Metadata snapshot for a single file
#[derive(Debug, Clone, PartialEq)]
pub struct FileMetadata {
    /// File name (final path component)
    pub name: String,
    /// File size in bytes
    pub size_bytes: u64,
    /// MIME type, or `"unknown"`
    pub mime_type: String,
    /// File extension, lowercased, without the leading dot; empty if none
    pub extension: String,
    /// Creation time; falls back to the modification time on filesystems
    /// that do not record birth time
    pub created_at: DateTime<Local>,
    /// Last modification time
    pub modified_at: DateTime<Local>,
}

impl FileMetadata {
    /// Human-readable size of this file, e.g. `"2.34 MB"`
    pub fn display_size(&self) -> String {
        format_file_size(self.size_bytes)
    }
}

/// Extract a metadata snapshot for the file at `path`.
///
/// Fails with [`ArchiveError::NotFound`] if the path does not exist at call
/// time. Side-effect-free.
pub fn extract(path: &Path) -> Result<FileMetadata> {
    if !path.exists() {
        return Err(ArchiveError::NotFound(path.to_path_buf()));
    }

    let metadata = fs::metadata(path)?;

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    let modified_at = metadata.modified().map(DateTime::<Local>::from)?;
    // Birth time is unsupported on some Linux filesystems
    let created_at = metadata
        .created()
        .map(DateTime::<Local>::from)
        .unwrap_or(modified_at);

    Ok(FileMetadata {
        name,
        size_bytes: metadata.len(),
        mime_type: mime_type_for(path),
        extension,
        created_at,
        modified_at,
    })
}

/// Resolve the MIME type for a path.
///
/// Extension lookup first, content sniffing second, `"unknown"` last.
/// The extension lookup does not touch the filesystem.
pub fn mime_type_for(path: &Path) -> String {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    if let Some(ref ext) = extension {
        if let Some(mime) = mime_from_extension(ext) {
            return mime.to_string();
        }
    }

    match tree_magic_mini::from_filepath(path) {
        Some(mime) => mime.to_string(),
        None => UNKNOWN_MIME.to_string(),
    }
}

/// Extension → MIME mapping for the formats commonly found in an archive
fn mime_from_extension(ext: &str) -> Option<&'static str> {
    let mime = match ext {
        "txt" | "log" => "text/plain",
        "md" => "text/markdown",
        "html" | "htm" => "text/html",
        "css" => "text/css",
        "csv" => "text/csv",
        "xml" => "application/xml",
        "json" => "application/json",
        "toml" => "application/toml",
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "ppt" => "application/vnd.ms-powerpoint",
        "pptx" => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        "rtf" => "application/rtf",
        "zip" => "application/zip",
        "gz" => "application/gzip",
        "tar" => "application/x-tar",
        "7z" => "application/x-7z-compressed",
        "rar" => "application/vnd.rar",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "tiff" | "tif" => "image/tiff",
        "svg" => "image/svg+xml",
        "heic" => "image/heic",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "flac" => "audio/flac",
        "ogg" => "audio/ogg",
        "m4a" => "audio/mp4",
        "mp4" => "video/mp4",
        "mov" => "video/quicktime",
        "avi" => "video/x-msvideo",
        "mkv" => "video/x-matroska",
        "webm" => "video/webm",
        _ => return None,
    };
    Some(mime)
}

/// Format a byte count as a human-readable string.
///
/// Divides by 1024 across B → KB → MB → GB → TB, stopping at the first unit
/// where the value drops below 1024. TB is the ceiling: values of 1024 TB and
/// up still print in TB.
pub fn format_file_size(size_bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

    let mut value = size_bytes as f64;
    for unit in &UNITS[..UNITS.len() - 1] {
        if value < 1024.0 {
            return format!("{:.2} {}", value, unit);
        }
        value /= 1024.0;
    }
    format!("{:.2} {}", value, UNITS[UNITS.len() - 1])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;

    #[test]
    fn test_extract_basic_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        File::create(&path)
            .unwrap()
            .write_all(b"hello world")
            .unwrap();

        let meta = extract(&path).unwrap();
        assert_eq!(meta.name, "notes.txt");
        assert_eq!(meta.size_bytes, 11);
        assert_eq!(meta.extension, "txt");
        assert_eq!(meta.mime_type, "text/plain");
        assert_eq!(meta.display_size(), "11.00 B");
    }

    #[test]
    fn test_extract_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("does_not_exist.pdf");

        match extract(&path) {
            Err(ArchiveError::NotFound(p)) => assert_eq!(p, path),
            other => panic!("Expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_extract_uppercase_extension_lowercased() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("REPORT.PDF");
        File::create(&path).unwrap().write_all(b"%PDF-1.4").unwrap();

        let meta = extract(&path).unwrap();
        assert_eq!(meta.extension, "pdf");
        assert_eq!(meta.mime_type, "application/pdf");
    }

    #[test]
    fn test_mime_from_extension_does_not_need_the_file() {
        // Pure lookup: the path is never touched for a known extension
        assert_eq!(mime_type_for(Path::new("/no/such/file.png")), "image/png");
        assert_eq!(mime_type_for(Path::new("/no/such/file.csv")), "text/csv");
    }

    #[test]
    fn test_mime_unknown_for_unrecognized_missing_file() {
        // Unknown extension and nothing to sniff
        assert_eq!(mime_type_for(Path::new("/no/such/file")), UNKNOWN_MIME);
    }

    #[test]
    fn test_format_file_size_unit_ladder() {
        assert_eq!(format_file_size(0), "0.00 B");
        assert_eq!(format_file_size(500), "500.00 B");
        assert_eq!(format_file_size(1024), "1.00 KB");
        assert_eq!(format_file_size(1536), "1.50 KB");
        assert_eq!(format_file_size(2 * 1024 * 1024), "2.00 MB");
        assert_eq!(format_file_size(3 * 1024 * 1024 * 1024), "3.00 GB");
        assert_eq!(format_file_size(1024_u64.pow(4)), "1.00 TB");
    }

    #[test]
    fn test_format_file_size_tb_is_the_ceiling() {
        // No PB unit: 1024 TB and beyond stay in TB
        assert_eq!(format_file_size(1024_u64.pow(5)), "1024.00 TB");
        assert_eq!(format_file_size(2 * 1024_u64.pow(5)), "2048.00 TB");
    }

    #[test]
    fn test_created_at_not_after_now() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stamp.txt");
        File::create(&path).unwrap().write_all(b"x").unwrap();

        let meta = extract(&path).unwrap();
        assert!(meta.created_at <= Local::now());
        assert!(meta.modified_at <= Local::now());
    }
}
