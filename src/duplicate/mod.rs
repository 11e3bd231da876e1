//! Duplicate detection module
//!
//! Finds byte-identical files under a directory tree using streaming
//! content checksums.
//!
//! # Submodules
//!
//! - `indexer` - Checksum index and duplicate scan logic

pub mod indexer;

pub use indexer::{
    find_duplicates, DuplicatePair, DuplicateScan, DuplicateScanOutcome, HashAlgorithm,
    ScanFailure,
};
