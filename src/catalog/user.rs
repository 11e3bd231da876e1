//! Users of the archive system
//!
//! A [`User`] owns archive collections and keeps a timestamped activity
//! log. The log is plain data returned to callers; printing it is the
//! CLI's business, not this module's.

use crate::catalog::item::ArchiveCollection;
use crate::core::error::{ArchiveError, Result};
use chrono::Local;
use uuid::Uuid;

/// A user interacting with the archive system
#[derive(Debug, Clone)]
pub struct User {
    name: String,
    role: String,
    user_id: String,
    collections: Vec<ArchiveCollection>,
    activity_log: Vec<String>,
}

impl User {
    /// Create a user; the name must not be empty
    pub fn new(name: &str, role: &str) -> Result<Self> {
        if name.trim().is_empty() {
            return Err(ArchiveError::InvalidArgument(
                "User name must not be empty".to_string(),
            ));
        }
        Ok(Self {
            name: name.to_string(),
            role: if role.is_empty() {
                "Viewer".to_string()
            } else {
                role.to_string()
            },
            user_id: Uuid::new_v4().to_string(),
            collections: Vec::new(),
            activity_log: Vec::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn collections(&self) -> &[ArchiveCollection] {
        &self.collections
    }

    /// Take ownership of a collection
    pub fn add_collection(&mut self, collection: ArchiveCollection) {
        self.log_action(&format!("Added collection '{}'", collection.name()));
        self.collections.push(collection);
    }

    /// Remove a collection by name; returns whether one was removed
    pub fn remove_collection(&mut self, collection_name: &str) -> bool {
        let before = self.collections.len();
        self.collections.retain(|c| c.name() != collection_name);

        let removed = self.collections.len() < before;
        if removed {
            self.log_action(&format!("Removed collection '{}'", collection_name));
        }
        removed
    }

    /// One line per owned collection, for display by the caller
    pub fn collection_summaries(&self) -> Vec<String> {
        self.collections
            .iter()
            .map(|c| format!("{} ({} records)", c.name(), c.record_count()))
            .collect()
    }

    /// The user's activity log, oldest entry first
    pub fn activity_log(&self) -> &[String] {
        &self.activity_log
    }

    fn log_action(&mut self, message: &str) {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        self.activity_log.push(format!("[{}] {}", timestamp, message));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_defaults() {
        let user = User::new("Manasa", "").unwrap();
        assert_eq!(user.name(), "Manasa");
        assert_eq!(user.role(), "Viewer");
        assert!(!user.user_id().is_empty());
        assert!(user.collections().is_empty());
        assert!(user.activity_log().is_empty());
    }

    #[test]
    fn test_empty_name_rejected() {
        assert!(matches!(
            User::new("", "Archivist"),
            Err(ArchiveError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_add_and_remove_collections_logged() {
        let mut user = User::new("Manasa", "Archivist").unwrap();
        user.add_collection(ArchiveCollection::new("Papers").unwrap());
        user.add_collection(ArchiveCollection::new("Photos").unwrap());
        assert_eq!(user.collections().len(), 2);
        assert_eq!(user.activity_log().len(), 2);

        assert!(user.remove_collection("Papers"));
        assert_eq!(user.collections().len(), 1);
        assert_eq!(user.activity_log().len(), 3);
        assert!(user.activity_log()[2].contains("Removed collection 'Papers'"));
    }

    #[test]
    fn test_remove_missing_collection_not_logged() {
        let mut user = User::new("Manasa", "Archivist").unwrap();
        assert!(!user.remove_collection("Nope"));
        assert!(user.activity_log().is_empty());
    }

    #[test]
    fn test_collection_summaries() {
        let mut user = User::new("Manasa", "Archivist").unwrap();
        user.add_collection(ArchiveCollection::new("Papers").unwrap());

        let summaries = user.collection_summaries();
        assert_eq!(summaries, vec!["Papers (0 records)".to_string()]);
    }
}
