//! Metadata-driven file organization module
//!
//! Moves files into subfolders derived from a metadata field, with
//! conflict-safe destination naming.
//!
//! # Submodules
//!
//! - `organizer` - Grouping key derivation and the move pass

pub mod organizer;

pub use organizer::{
    organize, GroupField, MoveFailure, OrganizeOutcome, Organizer, OrganizerMove,
};
