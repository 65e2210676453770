//! Shard files and cross-shard lookup.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use regex::{Captures, Regex};
use serde::Serialize;
use tokio::fs;
use tracing::{debug, instrument, warn};

use crate::domain::Entry;

/// Entries released in this year or earlier share the catch-all shard
pub const CUTOFF_YEAR: i32 = 2018;

/// File name of the catch-all shard
const CATCH_ALL_FILE: &str = "older.json";

static GENRE_ARRAY: OnceLock<Regex> = OnceLock::new();
static ARRAY_BREAK: OnceLock<Regex> = OnceLock::new();

fn genre_array() -> &'static Regex {
    GENRE_ARRAY.get_or_init(|| Regex::new(r#""genre": \[\s+([^\]]+?)\s+\]"#).expect("static pattern"))
}

fn array_break() -> &'static Regex {
    ARRAY_BREAK.get_or_init(|| Regex::new(r"\n\s+").expect("static pattern"))
}

/// Which shard an entry belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShardKey {
    /// Cutoff year and earlier, or unknown year
    Older,
    /// A single year after the cutoff
    Year(i32),
}

impl ShardKey {
    pub fn file_name(&self) -> String {
        match self {
            ShardKey::Older => CATCH_ALL_FILE.to_string(),
            ShardKey::Year(year) => format!("{}.json", year),
        }
    }
}

impl fmt::Display for ShardKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.file_name())
    }
}

/// Pick the shard for a release year. The cutoff itself is in the catch-all.
pub fn resolve_shard_for(year: Option<i32>) -> ShardKey {
    match year {
        Some(year) if year > CUTOFF_YEAR => ShardKey::Year(year),
        _ => ShardKey::Older,
    }
}

/// Serialize a shard: tab indentation, genre arrays on one line, trailing newline
pub fn render_shard(entries: &[Entry]) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    entries
        .serialize(&mut serializer)
        .context("Failed to serialize shard")?;

    let json = String::from_utf8(buf).context("Shard serialization produced invalid UTF-8")?;
    let compact = genre_array().replace_all(&json, |caps: &Captures| {
        format!("\"genre\": [{}]", array_break().replace_all(&caps[1], " "))
    });

    Ok(format!("{}\n", compact))
}

/// An entry found by id, with everything needed to rewrite its shard
#[derive(Debug, Clone)]
pub struct LocatedEntry {
    /// Shard file holding the entry
    pub path: PathBuf,
    /// Every entry in that shard, in file order
    pub entries: Vec<Entry>,
    /// Position of the match within `entries`
    pub index: usize,
    /// Copy of the matched entry
    pub entry: Entry,
}

impl LocatedEntry {
    /// File name of the shard, for messages
    pub fn shard_name(&self) -> String {
        shard_name(&self.path)
    }
}

/// Outcome of writing a shard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShardWrite {
    Written,
    /// The entry list was empty, so the file was removed
    Deleted,
}

/// File name component of a shard path
pub fn shard_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Directory of shard files. Sole owner of storage access.
#[derive(Debug, Clone)]
pub struct ShardStore {
    dir: PathBuf,
}

impl ShardStore {
    /// Open a store rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file for a shard key
    pub fn shard_path(&self, key: ShardKey) -> PathBuf {
        self.dir.join(key.file_name())
    }

    /// All `.json` shard files, sorted by file name. Missing directory yields none.
    pub async fn list_shard_files(&self) -> Result<Vec<PathBuf>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        let mut dir_entries = fs::read_dir(&self.dir)
            .await
            .with_context(|| format!("Failed to list shard directory: {}", self.dir.display()))?;

        while let Some(dir_entry) = dir_entries.next_entry().await? {
            let path = dir_entry.path();
            if path.extension().is_some_and(|ext| ext == "json") && path.is_file() {
                files.push(path);
            }
        }

        files.sort();
        Ok(files)
    }

    /// Read a shard. Missing, unreadable or unparseable shards read as empty.
    pub async fn read_shard(&self, path: &Path) -> Vec<Entry> {
        let content = match fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read shard, treating as empty");
                return Vec::new();
            }
        };

        match serde_json::from_str(&content) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to parse shard, treating as empty");
                Vec::new()
            }
        }
    }

    /// Replace a shard's contents, deleting the file when `entries` is empty
    #[instrument(skip(self, path, entries), fields(path = %path.display(), count = entries.len()))]
    pub async fn write_shard(&self, path: &Path, entries: &[Entry]) -> Result<ShardWrite> {
        if entries.is_empty() {
            match fs::remove_file(path).await {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(e)
                        .with_context(|| format!("Failed to delete shard: {}", path.display()))
                }
            }
            debug!("Deleted empty shard");
            return Ok(ShardWrite::Deleted);
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create shard directory: {}", parent.display()))?;
        }

        let content = render_shard(entries)?;
        fs::write(path, content)
            .await
            .with_context(|| format!("Failed to write shard: {}", path.display()))?;

        debug!("Wrote shard");
        Ok(ShardWrite::Written)
    }

    /// Find an entry by catalog id, scanning shards in file-name order
    #[instrument(skip(self))]
    pub async fn locate_entry(&self, catalog_id: u32) -> Result<Option<LocatedEntry>> {
        for path in self.list_shard_files().await? {
            let entries = self.read_shard(&path).await;
            if let Some(index) = entries.iter().position(|e| e.catalog_id == catalog_id) {
                let entry = entries[index].clone();
                debug!(shard = %path.display(), index, "Located entry");
                return Ok(Some(LocatedEntry {
                    path,
                    entries,
                    index,
                    entry,
                }));
            }
        }

        Ok(None)
    }

    /// Read every shard, paired with its file name
    pub async fn read_all(&self) -> Result<Vec<(String, Vec<Entry>)>> {
        let mut shards = Vec::new();
        for path in self.list_shard_files().await? {
            let entries = self.read_shard(&path).await;
            shards.push((shard_name(&path), entries));
        }
        Ok(shards)
    }
}
