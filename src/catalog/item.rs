//! Archive records and collections
//!
//! An [`ArchiveRecord`] is a single cataloged file: a metadata snapshot
//! plus authorship and tags. An [`ArchiveCollection`] owns records.
//! [`ArchiveItem`] is the variant over both for code that works with
//! either — describing an item and sizing it in KB work the same way
//! regardless of which it is.

use crate::core::error::{ArchiveError, Result};
use crate::core::metadata::{self, FileMetadata};
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// A single cataloged file with its metadata snapshot
#[derive(Debug, Clone)]
pub struct ArchiveRecord {
    id: String,
    path: PathBuf,
    author: String,
    tags: Vec<String>,
    metadata: FileMetadata,
}

impl ArchiveRecord {
    /// Catalog the file at `path`.
    ///
    /// Fails with [`ArchiveError::NotFound`] if the file does not exist;
    /// the metadata snapshot is taken here and never refreshed.
    pub fn new(path: &Path, author: &str, tags: Vec<String>) -> Result<Self> {
        let metadata = metadata::extract(path)?;
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            path: path.to_path_buf(),
            author: if author.is_empty() {
                "Unknown".to_string()
            } else {
                author.to_string()
            },
            tags,
            metadata,
        })
    }

    /// Unique identifier for this record
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// The metadata snapshot taken when the record was created
    pub fn metadata(&self) -> &FileMetadata {
        &self.metadata
    }

    /// Update the author and/or replace the tags
    pub fn edit(&mut self, author: Option<&str>, tags: Option<Vec<String>>) {
        if let Some(author) = author {
            self.author = author.to_string();
        }
        if let Some(tags) = tags {
            self.tags = tags;
        }
    }

    /// Case-insensitive keyword search over name, author, and tags
    pub fn matches_keyword(&self, keyword: &str) -> bool {
        let keyword = keyword.to_lowercase();
        self.metadata.name.to_lowercase().contains(&keyword)
            || self.author.to_lowercase().contains(&keyword)
            || self
                .tags
                .iter()
                .any(|tag| tag.to_lowercase().contains(&keyword))
    }

    /// File size in KB
    pub fn size_in_kb(&self) -> f64 {
        self.metadata.size_bytes as f64 / 1024.0
    }

    /// One-paragraph description of the record
    pub fn describe(&self) -> String {
        let tags = if self.tags.is_empty() {
            "None".to_string()
        } else {
            self.tags.join(", ")
        };
        format!(
            "File: {}\nAuthor: {}\nTags: {}\nSize: {:.2} KB\nType: {}\nCreated: {}\nModified: {}",
            self.metadata.name,
            self.author,
            tags,
            self.size_in_kb(),
            self.metadata.mime_type,
            self.metadata.created_at.format("%Y-%m-%d %H:%M:%S"),
            self.metadata.modified_at.format("%Y-%m-%d %H:%M:%S"),
        )
    }
}

/// A named collection of archive records
#[derive(Debug, Clone)]
pub struct ArchiveCollection {
    name: String,
    records: Vec<ArchiveRecord>,
    created: DateTime<Local>,
}

impl ArchiveCollection {
    /// Create an empty collection; the name must not be empty
    pub fn new(name: &str) -> Result<Self> {
        if name.trim().is_empty() {
            return Err(ArchiveError::InvalidArgument(
                "Collection name must not be empty".to_string(),
            ));
        }
        Ok(Self {
            name: name.to_string(),
            records: Vec::new(),
            created: Local::now(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn records(&self) -> &[ArchiveRecord] {
        &self.records
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    pub fn created(&self) -> DateTime<Local> {
        self.created
    }

    /// Add a record to the collection
    pub fn add_record(&mut self, record: ArchiveRecord) {
        self.records.push(record);
    }

    /// Remove every record with the given file name; returns how many
    /// were removed
    pub fn remove_record(&mut self, record_name: &str) -> usize {
        let before = self.records.len();
        self.records.retain(|r| r.metadata().name != record_name);
        before - self.records.len()
    }

    /// Records whose author matches `author` (case-insensitive substring)
    pub fn records_by_author(&self, author: &str) -> Vec<&ArchiveRecord> {
        let author = author.to_lowercase();
        self.records
            .iter()
            .filter(|r| r.author().to_lowercase().contains(&author))
            .collect()
    }

    /// Total size of all records in KB
    pub fn size_in_kb(&self) -> f64 {
        self.records.iter().map(ArchiveRecord::size_in_kb).sum()
    }

    /// One-paragraph description of the collection and its records
    pub fn describe(&self) -> String {
        let mut out = format!(
            "Collection: {}\nRecords: {}\nCreated: {}",
            self.name,
            self.records.len(),
            self.created.format("%Y-%m-%d %H:%M:%S"),
        );
        for record in &self.records {
            out.push_str(&format!(
                "\n  - {} ({})",
                record.metadata().name,
                record.author()
            ));
        }
        out
    }
}

/// Either a single record or a whole collection
#[derive(Debug, Clone)]
pub enum ArchiveItem {
    Record(ArchiveRecord),
    Collection(ArchiveCollection),
}

impl ArchiveItem {
    /// Describe the item, whichever variant it is
    pub fn describe(&self) -> String {
        match self {
            ArchiveItem::Record(record) => record.describe(),
            ArchiveItem::Collection(collection) => collection.describe(),
        }
    }

    /// Size of the item in KB; a collection's size is the sum of its
    /// records
    pub fn size_in_kb(&self) -> f64 {
        match self {
            ArchiveItem::Record(record) => record.size_in_kb(),
            ArchiveItem::Collection(collection) => collection.size_in_kb(),
        }
    }
}
