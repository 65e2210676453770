//! anilog - personal anime list backed by year-sharded JSON files
//!
//! Entries (catalog metadata plus a personal feeling, status and progress)
//! live in JSON shard files, one per release year after 2018 and one
//! catch-all for everything older or undated. New entries are imported
//! from the AniList GraphQL API.
//!
//! # Modules
//!
//! - `domain`: Entry, Status, Feeling
//! - `catalog`: Metadata catalog seam and the AniList client
//! - `format`: Pure field formatters (title, description, episodes, progress)
//! - `store`: Shard files, shard selection, cross-shard lookup
//! - `commands`: add / update / remove / list
//! - `report`: Grouped list output
//! - `config`: Data directory and endpoint resolution
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Add a title, rated and half watched
//! anime add 9253 loved watching 12
//!
//! # Mark it completed (progress jumps to the episode total)
//! anime update 9253 "" completed
//!
//! # Show everything grouped by feeling
//! anime list
//! ```

pub mod catalog;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod format;
pub mod report;
pub mod store;

// Re-export main types at crate root for convenience
pub use catalog::{AniListClient, CatalogError, CatalogRecord, MetadataCatalog, TitleVariants};
pub use commands::{CommandError, EntryArgs};
pub use domain::{Entry, Feeling, Status};
pub use report::ListedEntry;
pub use store::{ShardKey, ShardStore};
