//! Domain types for the anime list.
//!
//! - Entry: one tracked title with catalog metadata and personal state
//! - Status / Feeling: the closed value sets an entry may carry
//! - Recorded: a stored closed-set value, kept verbatim when unrecognized

pub mod entry;

// Re-export commonly used types
pub use entry::{Entry, Feeling, Recorded, Status, UnknownValue};
