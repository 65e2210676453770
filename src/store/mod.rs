//! Year-sharded JSON storage for anime entries.
//!
//! # Storage Layout
//!
//! ```text
//! src/data/anime/
//! ├── 2024.json      # entries released in 2024
//! ├── 2019.json      # one file per year after the cutoff
//! └── older.json     # cutoff year and earlier, or unknown year
//! ```
//!
//! Each file is a tab-indented JSON array of entries. Shards are read whole
//! and rewritten whole; a shard left with no entries is deleted.

pub mod shard;

pub use shard::{
    render_shard, resolve_shard_for, shard_name, LocatedEntry, ShardKey, ShardStore, ShardWrite,
    CUTOFF_YEAR,
};
