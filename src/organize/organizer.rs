//! Metadata-driven file organizer
//!
//! Groups the regular files under a root directory into subfolders named
//! after a metadata field. The whole tree is enumerated before the first
//! move so that files landing in freshly created group folders are never
//! re-visited. Name collisions at the destination are resolved with a
//! numeric suffix; nothing is ever overwritten.

use crate::core::error::{ArchiveError, Result};
use crate::core::metadata::{self, FileMetadata};
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use walkdir::WalkDir;

/// Collision-suffix attempts before giving up on a file. Exhausting this
/// bound signals a filesystem problem, not a normal name clash.
const MAX_COLLISION_ATTEMPTS: u32 = 10_000;

/// Group key used when the requested field value is empty
const UNKNOWN_GROUP: &str = "Unknown";

/// Metadata field a file can be grouped by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupField {
    Name,
    SizeBytes,
    #[default]
    MimeType,
    Extension,
    CreatedAt,
    ModifiedAt,
}

impl FromStr for GroupField {
    type Err = ArchiveError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "name" => Ok(GroupField::Name),
            "size_bytes" | "size" => Ok(GroupField::SizeBytes),
            "mime_type" | "type" => Ok(GroupField::MimeType),
            "extension" => Ok(GroupField::Extension),
            "created_at" | "created" => Ok(GroupField::CreatedAt),
            "modified_at" | "modified" => Ok(GroupField::ModifiedAt),
            "" => Err(ArchiveError::InvalidArgument(
                "Grouping field must not be empty".to_string(),
            )),
            other => Err(ArchiveError::InvalidArgument(format!(
                "Unknown grouping field: '{}' (expected name, size_bytes, mime_type, \
                 extension, created_at, or modified_at)",
                other
            ))),
        }
    }
}

impl std::fmt::Display for GroupField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            GroupField::Name => "name",
            GroupField::SizeBytes => "size_bytes",
            GroupField::MimeType => "mime_type",
            GroupField::Extension => "extension",
            GroupField::CreatedAt => "created_at",
            GroupField::ModifiedAt => "modified_at",
        };
        write!(f, "{}", s)
    }
}

impl GroupField {
    /// Raw field value for a file, before sanitizing.
    ///
    /// Timestamps group by calendar day; a full timestamp is unique per
    /// file and would defeat grouping. Sizes group by the human-readable
    /// size string.
    fn value_for(&self, meta: &FileMetadata) -> String {
        match self {
            GroupField::Name => meta.name.clone(),
            GroupField::SizeBytes => meta.display_size(),
            GroupField::MimeType => meta.mime_type.clone(),
            GroupField::Extension => meta.extension.clone(),
            GroupField::CreatedAt => meta.created_at.format("%Y-%m-%d").to_string(),
            GroupField::ModifiedAt => meta.modified_at.format("%Y-%m-%d").to_string(),
        }
    }
}

/// One completed move
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizerMove {
    pub source: PathBuf,
    pub destination: PathBuf,
}

/// One file that could not be moved, with the reason
#[derive(Debug, Clone)]
pub struct MoveFailure {
    pub path: PathBuf,
    pub reason: String,
}

/// Result of one organize pass
#[derive(Debug, Default)]
pub struct OrganizeOutcome {
    /// Moves that succeeded, in processing order
    pub moves: Vec<OrganizerMove>,
    /// Files that could not be processed; the pass continued past them
    pub failures: Vec<MoveFailure>,
    /// Files that were already in place and needed no move
    pub already_in_place: usize,
    /// True if the pass stopped early on a cancellation request
    pub interrupted: bool,
}

/// A configured organize pass over one directory tree
#[derive(Debug, Clone)]
pub struct Organizer {
    root: PathBuf,
    field: GroupField,
    cancel_flag: Option<Arc<AtomicBool>>,
}

impl Organizer {
    /// Create an organize pass grouping files under `root` by `field`
    pub fn new<P: Into<PathBuf>>(root: P, field: GroupField) -> Self {
        Self {
            root: root.into(),
            field,
            cancel_flag: None,
        }
    }

    /// Attach a cooperative cancellation flag, checked once per file
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel_flag = Some(flag);
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancel_flag
            .as_ref()
            .map(|f| f.load(Ordering::SeqCst))
            .unwrap_or(false)
    }

    /// Move every eligible file into `root/<group key>/`.
    ///
    /// Hidden files (leading-dot names), symbolic links, and non-regular
    /// files are left untouched. A file already at its destination is
    /// counted but not moved, so a second pass over an organized tree is a
    /// no-op. Per-file failures are recorded and do not halt the pass.
    pub fn run(&self) -> Result<OrganizeOutcome> {
        if !self.root.exists() {
            return Err(ArchiveError::NotFound(self.root.clone()));
        }
        if !self.root.is_dir() {
            return Err(ArchiveError::NotADirectory(self.root.clone()));
        }

        info!(
            "Organizing {} by {}",
            self.root.display(),
            self.field
        );

        // Enumerate everything up front so moves never perturb the walk
        let files = self.enumerate_files();

        let mut outcome = OrganizeOutcome::default();
        for path in files {
            if self.is_cancelled() {
                warn!("Organize pass cancelled, returning partial results");
                outcome.interrupted = true;
                break;
            }
            self.process_file(&path, &mut outcome);
        }

        info!(
            "Organize pass complete: {} moved, {} already in place, {} failures",
            outcome.moves.len(),
            outcome.already_in_place,
            outcome.failures.len()
        );

        Ok(outcome)
    }

    /// Collect the regular, non-hidden files under the root in a stable
    /// (file-name-sorted) order
    fn enumerate_files(&self) -> Vec<PathBuf> {
        WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| !is_hidden(entry.path()))
            .map(|entry| entry.path().to_path_buf())
            .collect()
    }

    fn process_file(&self, path: &Path, outcome: &mut OrganizeOutcome) {
        let meta = match metadata::extract(path) {
            Ok(m) => m,
            Err(e) => {
                debug!("Skipping {}: {}", path.display(), e);
                outcome.failures.push(MoveFailure {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                });
                return;
            }
        };

        let group_key = sanitize_group_key(&self.field.value_for(&meta));
        let group_dir = self.root.join(&group_key);

        let file_name = match path.file_name() {
            Some(n) => n.to_os_string(),
            None => return,
        };
        let preferred = group_dir.join(&file_name);

        // Already organized: nothing to do
        if preferred == path {
            outcome.already_in_place += 1;
            return;
        }

        if let Err(e) = fs::create_dir_all(&group_dir) {
            warn!("Failed to create {}: {}", group_dir.display(), e);
            outcome.failures.push(MoveFailure {
                path: path.to_path_buf(),
                reason: format!("Failed to create group folder: {}", e),
            });
            return;
        }

        let destination = match free_destination(&preferred) {
            Ok(d) => d,
            Err(e) => {
                warn!("{}", e);
                outcome.failures.push(MoveFailure {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                });
                return;
            }
        };

        match move_file(path, &destination) {
            Ok(()) => {
                debug!(
                    "Moved {} -> {}",
                    path.display(),
                    destination.display()
                );
                outcome.moves.push(OrganizerMove {
                    source: path.to_path_buf(),
                    destination,
                });
            }
            Err(e) => {
                warn!("Failed to move {}: {}", path.display(), e);
                outcome.failures.push(MoveFailure {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                });
            }
        }
    }
}

/// Convenience wrapper matching the common call shape: group files under
/// `root` by the named metadata field.
pub fn organize(root: &Path, group_by_field: &str) -> Result<OrganizeOutcome> {
    let field = GroupField::from_str(group_by_field)?;
    Organizer::new(root, field).run()
}

/// True for names the organizer leaves untouched (leading-dot files)
fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.starts_with('.'))
        .unwrap_or(false)
}

/// Turn a raw field value into a filesystem-safe folder name: spaces become
/// underscores, path separators become dashes, empty values become
/// `Unknown`
fn sanitize_group_key(value: &str) -> String {
    if value.is_empty() {
        return UNKNOWN_GROUP.to_string();
    }
    value.replace(' ', "_").replace(['/', '\\'], "-")
}

/// Find an unused destination path, appending `_1`, `_2`, … before the
/// extension until a free name turns up
fn free_destination(preferred: &Path) -> Result<PathBuf> {
    if !preferred.exists() {
        return Ok(preferred.to_path_buf());
    }

    let stem = preferred
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("file");
    let extension = preferred
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("");
    let parent = preferred.parent().unwrap_or(Path::new("."));

    for counter in 1..=MAX_COLLISION_ATTEMPTS {
        let candidate = if extension.is_empty() {
            format!("{}_{}", stem, counter)
        } else {
            format!("{}_{}.{}", stem, counter, extension)
        };
        let candidate = parent.join(candidate);
        if !candidate.exists() {
            return Ok(candidate);
        }
    }

    Err(ArchiveError::MoveConflict(preferred.to_path_buf()))
}

/// Same-filesystem rename, falling back to copy+delete across devices
fn move_file(source: &Path, destination: &Path) -> std::io::Result<()> {
    match fs::rename(source, destination) {
        Ok(()) => Ok(()),
        Err(_) => {
            fs::copy(source, destination)?;
            fs::remove_file(source)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;

    fn write_file(dir: &Path, name: &str, contents: &[u8]) -> PathBuf {
        let path = dir.join(name);
        File::create(&path).unwrap().write_all(contents).unwrap();
        path
    }

    #[test]
    fn test_group_field_parsing() {
        assert_eq!(
            "mime_type".parse::<GroupField>().unwrap(),
            GroupField::MimeType
        );
        assert_eq!(
            "Extension".parse::<GroupField>().unwrap(),
            GroupField::Extension
        );
        assert!(matches!(
            "author".parse::<GroupField>(),
            Err(ArchiveError::InvalidArgument(_))
        ));
        assert!(matches!(
            "".parse::<GroupField>(),
            Err(ArchiveError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_sanitize_group_key() {
        assert_eq!(sanitize_group_key("text/plain"), "text-plain");
        assert_eq!(sanitize_group_key("My Documents"), "My_Documents");
        assert_eq!(sanitize_group_key("a b/c\\d"), "a_b-c-d");
        assert_eq!(sanitize_group_key(""), "Unknown");
    }

    #[test]
    fn test_organize_by_mime_type() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "a.txt", b"hello");
        write_file(dir.path(), "b.txt", b"hello");
        write_file(dir.path(), "c.txt", b"world");

        let outcome = organize(dir.path(), "mime_type").unwrap();
        assert_eq!(outcome.moves.len(), 3);
        assert!(outcome.failures.is_empty());

        // All three land in the sanitized text/plain folder, names intact
        let group = dir.path().join("text-plain");
        assert!(group.join("a.txt").exists());
        assert!(group.join("b.txt").exists());
        assert!(group.join("c.txt").exists());
    }

    #[test]
    fn test_organize_by_extension_mixed() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "report.pdf", b"%PDF");
        write_file(dir.path(), "notes.txt", b"text");

        let outcome = organize(dir.path(), "extension").unwrap();
        assert_eq!(outcome.moves.len(), 2);
        assert!(dir.path().join("pdf").join("report.pdf").exists());
        assert!(dir.path().join("txt").join("notes.txt").exists());
    }

    #[test]
    fn test_collision_appends_suffix_and_preserves_original() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        write_file(dir.path(), "data.txt", b"first");
        write_file(&dir.path().join("sub"), "data.txt", b"second");

        let outcome = organize(dir.path(), "mime_type").unwrap();
        assert_eq!(outcome.moves.len(), 2);

        let group = dir.path().join("text-plain");
        assert!(group.join("data.txt").exists());
        assert!(group.join("data_1.txt").exists());

        // Neither file's bytes were touched
        let mut contents = vec![
            fs::read(group.join("data.txt")).unwrap(),
            fs::read(group.join("data_1.txt")).unwrap(),
        ];
        contents.sort();
        assert_eq!(contents, vec![b"first".to_vec(), b"second".to_vec()]);
    }

    #[test]
    fn test_second_pass_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "a.txt", b"hello");
        write_file(dir.path(), "b.md", b"# title");

        let first = organize(dir.path(), "extension").unwrap();
        assert_eq!(first.moves.len(), 2);

        let second = organize(dir.path(), "extension").unwrap();
        assert!(second.moves.is_empty());
        assert!(second.failures.is_empty());
        assert_eq!(second.already_in_place, 2);
    }

    #[test]
    fn test_hidden_files_are_left_alone() {
        let dir = tempfile::tempdir().unwrap();
        let hidden = write_file(dir.path(), ".hidden_notes", b"secret");
        write_file(dir.path(), "visible.txt", b"open");

        let outcome = organize(dir.path(), "mime_type").unwrap();
        assert_eq!(outcome.moves.len(), 1);
        assert!(hidden.exists());
    }

    #[test]
    fn test_unknown_group_for_files_without_extension() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "README", b"plain");

        let outcome = organize(dir.path(), "extension").unwrap();
        assert_eq!(outcome.moves.len(), 1);
        assert!(dir.path().join("Unknown").join("README").exists());
    }

    #[test]
    fn test_moves_record_source_and_destination() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_file(dir.path(), "a.txt", b"hello");

        let outcome = organize(dir.path(), "mime_type").unwrap();
        assert_eq!(outcome.moves.len(), 1);
        assert_eq!(outcome.moves[0].source, source);
        assert_eq!(
            outcome.moves[0].destination,
            dir.path().join("text-plain").join("a.txt")
        );
        assert!(!source.exists());
    }

    #[test]
    fn test_missing_root_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            organize(&dir.path().join("nope"), "mime_type"),
            Err(ArchiveError::NotFound(_))
        ));
    }

    #[test]
    fn test_file_root_fails() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_file(dir.path(), "f.txt", b"x");
        assert!(matches!(
            organize(&file, "mime_type"),
            Err(ArchiveError::NotADirectory(_))
        ));
    }

    #[test]
    fn test_free_destination_counts_upward() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "doc.txt", b"0");
        write_file(dir.path(), "doc_1.txt", b"1");

        let next = free_destination(&dir.path().join("doc.txt")).unwrap();
        assert_eq!(next, dir.path().join("doc_2.txt"));
    }

    #[test]
    fn test_cancel_flag_stops_pass() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "a.txt", b"one");

        let flag = Arc::new(AtomicBool::new(true));
        let outcome = Organizer::new(dir.path(), GroupField::MimeType)
            .with_cancel_flag(flag)
            .run()
            .unwrap();
        assert!(outcome.interrupted);
        assert!(outcome.moves.is_empty());
        assert!(dir.path().join("a.txt").exists());
    }
}
