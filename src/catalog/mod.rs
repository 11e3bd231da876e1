//! Archive catalog module
//!
//! Simple composed objects modeling the contents of an archive: file
//! records, collections of records, and the users that own collections.
//! Peripheral to the directory scans; nothing here touches the filesystem
//! after the initial metadata snapshot.
//!
//! # Submodules
//!
//! - `item` - Records, collections, and the `ArchiveItem` variant over both
//! - `user` - Users owning collections, with an activity log

pub mod item;
pub mod user;

pub use item::{ArchiveCollection, ArchiveItem, ArchiveRecord};
pub use user::User;
