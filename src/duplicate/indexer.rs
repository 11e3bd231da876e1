//! Duplicate file detection using streaming content checksums
//!
//! A scan walks a directory tree in a fixed order, computes a cryptographic
//! digest per regular file, and keeps a mapping from digest to the first path
//! seen with that content. Every later file with the same digest is reported
//! as a duplicate of that first path, and optionally deleted.
//!
//! Hashing streams the file in fixed-size chunks, so peak memory is bounded
//! by the chunk size regardless of file size. The index lives only for the
//! duration of one scan; nothing is persisted.

use crate::core::error::{ArchiveError, Result};
use log::{debug, info, warn};
use sha2::{Digest, Sha256, Sha512};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use walkdir::WalkDir;

/// Chunk size for streaming hash computation (64 KiB)
pub const HASH_CHUNK_SIZE: usize = 64 * 1024;

/// Supported checksum algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HashAlgorithm {
    /// SHA-256 (default)
    #[default]
    Sha256,
    /// SHA-512
    Sha512,
}

impl FromStr for HashAlgorithm {
    type Err = ArchiveError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "sha256" | "sha-256" => Ok(HashAlgorithm::Sha256),
            "sha512" | "sha-512" => Ok(HashAlgorithm::Sha512),
            other => Err(ArchiveError::InvalidArgument(format!(
                "Unsupported hash algorithm: '{}' (expected sha256 or sha512)",
                other
            ))),
        }
    }
}

impl std::fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HashAlgorithm::Sha256 => write!(f, "sha256"),
            HashAlgorithm::Sha512 => write!(f, "sha512"),
        }
    }
}

/// A pair of byte-identical files.
///
/// `original` is always the path encountered first in traversal order;
/// `duplicate` came later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicatePair {
    pub original: PathBuf,
    pub duplicate: PathBuf,
}

/// A file the scan could not process, with the reason it was skipped
#[derive(Debug, Clone)]
pub struct ScanFailure {
    pub path: PathBuf,
    pub reason: String,
}

/// Result of one duplicate scan
#[derive(Debug, Default)]
pub struct DuplicateScanOutcome {
    /// Duplicate pairs in traversal order
    pub pairs: Vec<DuplicatePair>,
    /// Files skipped because they could not be read (or deleted)
    pub failures: Vec<ScanFailure>,
    /// Number of files successfully hashed
    pub files_hashed: usize,
    /// Total bytes fed through the hasher
    pub bytes_hashed: u64,
    /// Number of duplicate files removed (`delete_duplicates` only)
    pub files_deleted: usize,
    /// True if the scan stopped early on a cancellation request
    pub interrupted: bool,
}

/// A configured duplicate scan over one directory tree
#[derive(Debug, Clone)]
pub struct DuplicateScan {
    root: PathBuf,
    algorithm: HashAlgorithm,
    delete_duplicates: bool,
    chunk_size: usize,
    cancel_flag: Option<Arc<AtomicBool>>,
}

impl DuplicateScan {
    /// Create a scan of `root` with default settings (SHA-256, no deletion)
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self {
            root: root.into(),
            algorithm: HashAlgorithm::default(),
            delete_duplicates: false,
            chunk_size: HASH_CHUNK_SIZE,
            cancel_flag: None,
        }
    }

    /// Select the checksum algorithm
    pub fn with_algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Delete each duplicate immediately after it is recorded. The
    /// first-seen copy of any content is never deleted.
    pub fn with_delete_duplicates(mut self, delete: bool) -> Self {
        self.delete_duplicates = delete;
        self
    }

    /// Override the streaming chunk size
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
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

    /// Walk the tree and report every duplicate pair.
    ///
    /// The walk visits directory entries sorted by file name, so pair order
    /// is reproducible on an unchanged tree. Symbolic links and non-regular
    /// files are skipped without following. A file that cannot be read is
    /// recorded as a failure and the walk continues.
    pub fn run(&self) -> Result<DuplicateScanOutcome> {
        self.run_with_progress(|_| {})
    }

    /// Like [`run`](Self::run), calling `progress` with each file path
    /// after it has been hashed
    pub fn run_with_progress<F>(&self, mut progress: F) -> Result<DuplicateScanOutcome>
    where
        F: FnMut(&Path),
    {
        if !self.root.exists() {
            return Err(ArchiveError::NotFound(self.root.clone()));
        }
        if !self.root.is_dir() {
            return Err(ArchiveError::NotADirectory(self.root.clone()));
        }

        info!(
            "Scanning {} for duplicates ({})",
            self.root.display(),
            self.algorithm
        );

        let mut index: HashMap<String, PathBuf> = HashMap::new();
        let mut outcome = DuplicateScanOutcome::default();

        let walker = WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name();

        for entry in walker {
            if self.is_cancelled() {
                warn!("Duplicate scan cancelled, returning partial results");
                outcome.interrupted = true;
                break;
            }

            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    let path = e
                        .path()
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|| self.root.clone());
                    debug!("Skipping unreadable entry {}: {}", path.display(), e);
                    outcome.failures.push(ScanFailure {
                        path,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            // Regular files only: directories, symlinks, and special files
            // are never hashed
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path().to_path_buf();
            let (digest, bytes) = match hash_file(&path, self.algorithm, self.chunk_size) {
                Ok(result) => result,
                Err(e) => {
                    debug!("Skipping {}: {}", path.display(), e);
                    outcome.failures.push(ScanFailure {
                        path,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            outcome.files_hashed += 1;
            outcome.bytes_hashed += bytes;
            progress(&path);

            match index.get(&digest) {
                Some(original) => {
                    debug!(
                        "Duplicate: {} matches {}",
                        path.display(),
                        original.display()
                    );
                    outcome.pairs.push(DuplicatePair {
                        original: original.clone(),
                        duplicate: path.clone(),
                    });

                    if self.delete_duplicates {
                        match fs::remove_file(&path) {
                            Ok(()) => {
                                info!("Deleted duplicate: {}", path.display());
                                outcome.files_deleted += 1;
                            }
                            Err(e) => {
                                warn!("Failed to delete {}: {}", path.display(), e);
                                outcome.failures.push(ScanFailure {
                                    path,
                                    reason: format!("Failed to delete: {}", e),
                                });
                            }
                        }
                    }
                }
                None => {
                    index.insert(digest, path);
                }
            }
        }

        info!(
            "Duplicate scan complete: {} files hashed, {} pairs, {} failures",
            outcome.files_hashed,
            outcome.pairs.len(),
            outcome.failures.len()
        );

        Ok(outcome)
    }
}

/// Convenience wrapper matching the common call shape: scan `root` with the
/// default algorithm, optionally deleting duplicates.
pub fn find_duplicates(root: &Path, delete_duplicates: bool) -> Result<DuplicateScanOutcome> {
    DuplicateScan::new(root)
        .with_delete_duplicates(delete_duplicates)
        .run()
}

/// Compute the hex digest of a file by streaming it in `chunk_size` reads.
///
/// Returns the digest and the number of bytes hashed. Open and read errors
/// surface as [`ArchiveError::UnreadableFile`].
pub fn hash_file(
    path: &Path,
    algorithm: HashAlgorithm,
    chunk_size: usize,
) -> Result<(String, u64)> {
    let file = File::open(path).map_err(|e| ArchiveError::UnreadableFile {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let reader = BufReader::with_capacity(chunk_size, file);
    hash_reader(reader, algorithm, chunk_size).map_err(|e| ArchiveError::UnreadableFile {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Compute the hex digest of everything `reader` yields, reading at most
/// `chunk_size` bytes at a time
pub fn hash_reader<R: Read>(
    reader: R,
    algorithm: HashAlgorithm,
    chunk_size: usize,
) -> std::io::Result<(String, u64)> {
    match algorithm {
        HashAlgorithm::Sha256 => digest_reader::<Sha256, R>(reader, chunk_size),
        HashAlgorithm::Sha512 => digest_reader::<Sha512, R>(reader, chunk_size),
    }
}

fn digest_reader<D: Digest, R: Read>(
    mut reader: R,
    chunk_size: usize,
) -> std::io::Result<(String, u64)> {
    let mut hasher = D::new();
    let mut buffer = vec![0u8; chunk_size];
    let mut total: u64 = 0;

    loop {
        let bytes_read = reader.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
        total += bytes_read as u64;
    }

    let digest = hasher
        .finalize()
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect();
    Ok((digest, total))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;

    /// SHA-256 of the empty input
    const EMPTY_SHA256: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

    fn write_file(dir: &Path, name: &str, contents: &[u8]) -> PathBuf {
        let path = dir.join(name);
        File::create(&path).unwrap().write_all(contents).unwrap();
        path
    }

    #[test]
    fn test_hash_known_digest() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "empty.bin", b"");

        let (digest, bytes) = hash_file(&path, HashAlgorithm::Sha256, HASH_CHUNK_SIZE).unwrap();
        assert_eq!(digest, EMPTY_SHA256);
        assert_eq!(bytes, 0);
    }

    #[test]
    fn test_hash_file_missing_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gone.bin");

        match hash_file(&path, HashAlgorithm::Sha256, HASH_CHUNK_SIZE) {
            Err(ArchiveError::UnreadableFile { path: p, .. }) => assert_eq!(p, path),
            other => panic!("Expected UnreadableFile, got {:?}", other),
        }
    }

    #[test]
    fn test_algorithm_parsing() {
        assert_eq!(
            "sha256".parse::<HashAlgorithm>().unwrap(),
            HashAlgorithm::Sha256
        );
        assert_eq!(
            "SHA-512".parse::<HashAlgorithm>().unwrap(),
            HashAlgorithm::Sha512
        );
        assert!(matches!(
            "md5".parse::<HashAlgorithm>(),
            Err(ArchiveError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_example_scenario() {
        // a.txt and b.txt share content, c.txt differs: exactly one pair,
        // with a.txt first by traversal order
        let dir = tempfile::tempdir().unwrap();
        let a = write_file(dir.path(), "a.txt", b"hello");
        let b = write_file(dir.path(), "b.txt", b"hello");
        write_file(dir.path(), "c.txt", b"world");

        let outcome = find_duplicates(dir.path(), false).unwrap();
        assert_eq!(outcome.pairs.len(), 1);
        assert_eq!(outcome.pairs[0].original, a);
        assert_eq!(outcome.pairs[0].duplicate, b);
        assert_eq!(outcome.files_hashed, 3);
        assert!(outcome.failures.is_empty());
    }

    #[test]
    fn test_no_pair_without_identical_content() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "one.txt", b"alpha");
        write_file(dir.path(), "two.txt", b"beta");
        write_file(dir.path(), "three.txt", b"gamma");

        let outcome = find_duplicates(dir.path(), false).unwrap();
        assert!(outcome.pairs.is_empty());
    }

    #[test]
    fn test_empty_files_are_duplicates_of_each_other() {
        let dir = tempfile::tempdir().unwrap();
        let first = write_file(dir.path(), "empty_a", b"");
        let second = write_file(dir.path(), "empty_b", b"");

        let outcome = find_duplicates(dir.path(), false).unwrap();
        assert_eq!(outcome.pairs.len(), 1);
        assert_eq!(outcome.pairs[0].original, first);
        assert_eq!(outcome.pairs[0].duplicate, second);
    }

    #[test]
    fn test_duplicates_found_across_subdirectories() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        let original = write_file(dir.path(), "keep.bin", b"same bytes");
        let copy = write_file(&dir.path().join("sub"), "copy.bin", b"same bytes");

        let outcome = find_duplicates(dir.path(), false).unwrap();
        assert_eq!(outcome.pairs.len(), 1);
        assert_eq!(outcome.pairs[0].original, original);
        assert_eq!(outcome.pairs[0].duplicate, copy);
    }

    #[test]
    fn test_delete_keeps_first_seen_copy() {
        let dir = tempfile::tempdir().unwrap();
        let x1 = write_file(dir.path(), "x1.dat", b"payload");
        let x2 = write_file(dir.path(), "x2.dat", b"payload");
        let x3 = write_file(dir.path(), "x3.dat", b"payload");
        let y = write_file(dir.path(), "y.dat", b"other");

        let outcome = find_duplicates(dir.path(), true).unwrap();
        assert_eq!(outcome.pairs.len(), 2);
        assert_eq!(outcome.files_deleted, 2);

        // First-seen copy of each distinct content survives, nothing else
        assert!(x1.exists());
        assert!(!x2.exists());
        assert!(!x3.exists());
        assert!(y.exists());
    }

    #[test]
    fn test_deterministic_pair_order() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "d.txt", b"dup");
        write_file(dir.path(), "b.txt", b"dup");
        write_file(dir.path(), "c.txt", b"dup");

        let first = find_duplicates(dir.path(), false).unwrap();
        let second = find_duplicates(dir.path(), false).unwrap();

        // Sorted traversal: b.txt is the original both times
        let names: Vec<_> = first
            .pairs
            .iter()
            .map(|p| p.duplicate.file_name().unwrap().to_os_string())
            .collect();
        assert_eq!(names, vec!["c.txt", "d.txt"]);
        assert_eq!(first.pairs, second.pairs);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let target = write_file(dir.path(), "target.txt", b"linked content");
        std::os::unix::fs::symlink(&target, dir.path().join("alias.txt")).unwrap();

        let outcome = find_duplicates(dir.path(), false).unwrap();
        assert!(outcome.pairs.is_empty());
        assert_eq!(outcome.files_hashed, 1);
    }

    #[test]
    fn test_missing_root_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(
            find_duplicates(&missing, false),
            Err(ArchiveError::NotFound(_))
        ));
    }

    #[test]
    fn test_file_root_fails() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_file(dir.path(), "plain.txt", b"not a dir");
        assert!(matches!(
            find_duplicates(&file, false),
            Err(ArchiveError::NotADirectory(_))
        ));
    }

    #[test]
    fn test_cancel_flag_stops_scan() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "a.txt", b"one");
        write_file(dir.path(), "b.txt", b"two");

        let flag = Arc::new(AtomicBool::new(true));
        let outcome = DuplicateScan::new(dir.path())
            .with_cancel_flag(flag)
            .run()
            .unwrap();
        assert!(outcome.interrupted);
        assert_eq!(outcome.files_hashed, 0);
    }

    /// Reader that records the largest buffer it was ever asked to fill
    struct ChunkRecorder {
        remaining: usize,
        max_requested: usize,
    }

    impl Read for ChunkRecorder {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            self.max_requested = self.max_requested.max(buf.len());
            let n = self.remaining.min(buf.len());
            for b in &mut buf[..n] {
                *b = 0xAB;
            }
            self.remaining -= n;
            Ok(n)
        }
    }

    #[test]
    fn test_hashing_reads_in_bounded_chunks() {
        let chunk = 4096;
        let mut recorder = ChunkRecorder {
            remaining: 1024 * 1024,
            max_requested: 0,
        };

        let (_, bytes) =
            hash_reader(&mut recorder, HashAlgorithm::Sha256, chunk).unwrap();
        assert_eq!(bytes, 1024 * 1024);
        assert!(recorder.max_requested <= chunk);
        assert!(recorder.max_requested > 0);
    }

    #[test]
    fn test_sha512_differs_from_sha256() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "data.bin", b"content");

        let (d256, _) = hash_file(&path, HashAlgorithm::Sha256, HASH_CHUNK_SIZE).unwrap();
        let (d512, _) = hash_file(&path, HashAlgorithm::Sha512, HASH_CHUNK_SIZE).unwrap();
        assert_eq!(d256.len(), 64);
        assert_eq!(d512.len(), 128);
    }
}
