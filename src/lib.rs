//! Archive Tool Library
//!
//! A small digital-archive utility: scan a directory tree, extract per-file
//! metadata, group files into subfolders by a metadata field, and find
//! duplicate files by streaming content checksums.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - [`core`] - Core functionality including configuration, error handling,
//!   metadata extraction, and reporting
//! - [`duplicate`] - Duplicate detection using streaming SHA-2 checksums
//! - [`organize`] - Metadata-driven file organization with conflict-safe moves
//! - [`catalog`] - Records, collections, and users composed over metadata
//!   snapshots
//! - [`cli`] - Command-line interface (only used by the binary)
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use archive_tool::duplicate::find_duplicates;
//! use archive_tool::organize::organize;
//! use std::path::Path;
//!
//! fn main() -> anyhow::Result<()> {
//!     let root = Path::new("/data/archive");
//!
//!     // Report duplicate pairs without deleting anything
//!     let outcome = find_duplicates(root, false)?;
//!     for pair in &outcome.pairs {
//!         println!("{} duplicates {}",
//!             pair.duplicate.display(), pair.original.display());
//!     }
//!
//!     // Group the files into subfolders by MIME type
//!     let moved = organize(root, "mime_type")?;
//!     println!("{} files moved", moved.moves.len());
//!
//!     Ok(())
//! }
//! ```
//!
//! # Concurrency
//!
//! Everything is single-threaded, synchronous, blocking I/O. The two scans
//! each walk the tree independently; callers must serialize them against a
//! given directory, and running either while another process mutates the
//! tree is unsupported. Both scans accept a cooperative cancellation flag
//! checked once per file.

pub mod catalog;
pub mod cli;
pub mod core;
pub mod duplicate;
pub mod organize;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
