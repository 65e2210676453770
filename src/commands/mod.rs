//! The four list operations: add, update, remove, list.
//!
//! Each operation validates its raw string arguments completely before
//! touching storage, and performs at most one shard write. Storage access
//! goes through [`ShardStore`]; metadata comes from a [`MetadataCatalog`].

pub mod outcome;

use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::catalog::{CatalogError, CatalogRecord, MetadataCatalog};
use crate::domain::{Entry, Feeling, Recorded, Status, UnknownValue};
use crate::format::{compose_title, derive_progress, strip_markup, summarize_episodes};
use crate::report::ListedEntry;
use crate::store::{resolve_shard_for, ShardStore, ShardWrite};

pub use outcome::{AddOutcome, Change, RemoveOutcome, UpdateOutcome};

pub const ADD_USAGE: &str = "anime add <anilistId> [feeling] [status] [episode]";
/// Also reported when every field after the id is missing or empty, since
/// empty arguments count as omitted and `update` needs at least one change.
pub const UPDATE_USAGE: &str = "anime update <anilistId> [feeling] [status] [episode]";
pub const REMOVE_USAGE: &str = "anime remove <anilistId>";

/// Errors that end a command
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArgument(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("\"{title}\" (ID {id}) already exists in {shard}")]
    DuplicateEntry { id: u32, title: String, shard: String },

    #[error("No anime with AniList ID {0} found in any data file")]
    NotFound(u32),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl From<UnknownValue> for CommandError {
    fn from(err: UnknownValue) -> Self {
        CommandError::InvalidArgument(err.to_string())
    }
}

/// Raw positional arguments shared by `add` and `update`.
///
/// Empty strings count as omitted.
#[derive(Debug, Clone, Default)]
pub struct EntryArgs {
    pub catalog_id: Option<String>,
    pub feeling: Option<String>,
    pub status: Option<String>,
    pub episode: Option<String>,
}

impl EntryArgs {
    /// Build from a positional list: id, feeling, status, episode
    pub fn from_positional<S: AsRef<str>>(args: &[S]) -> Self {
        let nth = |i: usize| args.get(i).map(|s| s.as_ref().to_string());
        Self {
            catalog_id: nth(0),
            feeling: nth(1),
            status: nth(2),
            episode: nth(3),
        }
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Parse a catalog id. Zero and non-numbers are rejected.
pub fn parse_catalog_id(raw: &str) -> Result<u32, CommandError> {
    match raw.trim().parse::<u32>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(CommandError::InvalidArgument(format!(
            "\"{}\" is not a valid AniList ID",
            raw
        ))),
    }
}

fn parse_episode(raw: &str) -> Result<u32, CommandError> {
    raw.trim().parse::<u32>().map_err(|_| {
        CommandError::InvalidArgument(format!("\"{}\" is not a valid episode number", raw))
    })
}

/// Arguments after validation, before any storage access
#[derive(Debug, Clone, Copy)]
struct Validated {
    catalog_id: u32,
    feeling: Option<Feeling>,
    status: Option<Status>,
    episode: Option<u32>,
}

fn validate(args: &EntryArgs, usage: &'static str) -> Result<Validated, CommandError> {
    let raw_id = present(&args.catalog_id).ok_or(CommandError::Usage(usage))?;
    let catalog_id = parse_catalog_id(raw_id)?;
    let feeling = present(&args.feeling).map(str::parse::<Feeling>).transpose()?;
    let status = present(&args.status).map(str::parse::<Status>).transpose()?;
    let episode = present(&args.episode).map(parse_episode).transpose()?;

    Ok(Validated {
        catalog_id,
        feeling,
        status,
        episode,
    })
}

/// Map a catalog record onto a new entry
pub fn build_entry(
    record: &CatalogRecord,
    feeling: Option<Feeling>,
    status: Status,
    episode: Option<u32>,
) -> Entry {
    let total_episodes = record.episodes.unwrap_or(0);

    Entry {
        catalog_id: record.id,
        title: compose_title(&record.titles),
        status: status.into(),
        feeling: feeling.map(Recorded::Known),
        description: strip_markup(record.description.as_deref()),
        episodes_summary: summarize_episodes(record.format.as_deref(), record.episodes),
        year: record.year.map(|y| y.to_string()).unwrap_or_default(),
        genres: record.genres.clone(),
        studio: record.studios.join(", "),
        link: record
            .site_url
            .clone()
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| format!("https://anilist.co/anime/{}/", record.id)),
        progress: derive_progress(status, episode, total_episodes),
        total_episodes,
        start_date: String::new(),
        end_date: String::new(),
    }
}

/// Import a title from the catalog and append it to its year shard
#[instrument(skip_all)]
pub async fn add(
    store: &ShardStore,
    catalog: &dyn MetadataCatalog,
    args: &EntryArgs,
) -> Result<AddOutcome, CommandError> {
    let args = validate(args, ADD_USAGE)?;
    let status = args.status.unwrap_or(Status::Watching);

    if let Some(existing) = store.locate_entry(args.catalog_id).await? {
        return Err(CommandError::DuplicateEntry {
            id: args.catalog_id,
            title: existing.entry.title.clone(),
            shard: existing.shard_name(),
        });
    }

    info!(id = args.catalog_id, "Fetching AniList ID {}...", args.catalog_id);
    let record = catalog.fetch_metadata(args.catalog_id).await?;
    let entry = build_entry(&record, args.feeling, status, args.episode);

    let key = resolve_shard_for(record.year);
    let path = store.shard_path(key);
    let mut entries = store.read_shard(&path).await;
    entries.push(entry.clone());
    store.write_shard(&path, &entries).await?;

    debug!(shard = %key, "Added entry");
    Ok(AddOutcome {
        entry,
        shard: key.file_name(),
    })
}

/// Overwrite the supplied fields of an existing entry in place
#[instrument(skip_all)]
pub async fn update(store: &ShardStore, args: &EntryArgs) -> Result<UpdateOutcome, CommandError> {
    let args = validate(args, UPDATE_USAGE)?;
    if args.feeling.is_none() && args.status.is_none() && args.episode.is_none() {
        return Err(CommandError::Usage(UPDATE_USAGE));
    }

    let mut located = store
        .locate_entry(args.catalog_id)
        .await?
        .ok_or(CommandError::NotFound(args.catalog_id))?;

    let mut entry = located.entry.clone();
    let mut changes = Vec::new();

    if let Some(feeling) = args.feeling {
        entry.feeling = Some(feeling.into());
        changes.push(Change::Feeling(feeling));
    }

    if let Some(status) = args.status {
        entry.status = status.into();
        changes.push(Change::Status(status));

        if status == Status::Completed {
            entry.progress = entry.total_episodes;
            changes.push(Change::Progress(entry.progress));
        }
    }

    // An explicit episode wins over the completed default
    if let Some(episode) = args.episode {
        entry.progress = episode;
        changes.push(Change::Progress(episode));
    }

    located.entries[located.index] = entry.clone();
    store.write_shard(&located.path, &located.entries).await?;

    Ok(UpdateOutcome {
        entry,
        shard: located.shard_name(),
        changes,
    })
}

/// Delete an entry, removing its shard file if nothing else is left in it
#[instrument(skip(store))]
pub async fn remove(store: &ShardStore, catalog_id: Option<&str>) -> Result<RemoveOutcome, CommandError> {
    let raw_id = catalog_id
        .filter(|s| !s.is_empty())
        .ok_or(CommandError::Usage(REMOVE_USAGE))?;
    let catalog_id = parse_catalog_id(raw_id)?;

    let mut located = store
        .locate_entry(catalog_id)
        .await?
        .ok_or(CommandError::NotFound(catalog_id))?;

    let entry = located.entries.remove(located.index);
    let written = store.write_shard(&located.path, &located.entries).await?;

    Ok(RemoveOutcome {
        entry,
        shard: located.shard_name(),
        shard_deleted: written == ShardWrite::Deleted,
    })
}

/// Every entry in the store, tagged with its shard
pub async fn list(store: &ShardStore) -> Result<Vec<ListedEntry>, CommandError> {
    let mut listed = Vec::new();

    for (shard, entries) in store.read_all().await? {
        debug!(%shard, count = entries.len(), "Read shard");
        listed.extend(entries.into_iter().map(|entry| ListedEntry {
            shard: shard.clone(),
            entry,
        }));
    }

    Ok(listed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::TitleVariants;

    fn record() -> CatalogRecord {
        CatalogRecord {
            id: 9253,
            site_url: None,
            titles: TitleVariants {
                english: Some("Steins;Gate".to_string()),
                romaji: Some("Steins;Gate".to_string()),
                native: None,
            },
            year: Some(2011),
            genres: vec!["Sci-Fi".to_string()],
            studios: vec!["White Fox".to_string(), "Nitroplus".to_string()],
            episodes: Some(24),
            format: Some("TV".to_string()),
            description: Some("Time <br>travel.".to_string()),
        }
    }

    #[test]
    fn test_parse_catalog_id() {
        assert_eq!(parse_catalog_id("9253").unwrap(), 9253);
        assert!(matches!(parse_catalog_id("abc"), Err(CommandError::InvalidArgument(_))));
        assert!(matches!(parse_catalog_id("0"), Err(CommandError::InvalidArgument(_))));
        assert!(matches!(parse_catalog_id("-4"), Err(CommandError::InvalidArgument(_))));
    }

    #[test]
    fn test_validate_treats_empty_as_omitted() {
        let args = EntryArgs::from_positional(&["9253", "", "completed"]);
        let v = validate(&args, ADD_USAGE).unwrap();

        assert_eq!(v.catalog_id, 9253);
        assert_eq!(v.feeling, None);
        assert_eq!(v.status, Some(Status::Completed));
        assert_eq!(v.episode, None);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let bad_feeling = EntryArgs::from_positional(&["1", "amazing"]);
        let err = validate(&bad_feeling, ADD_USAGE).unwrap_err();
        assert!(err.to_string().contains("not a valid feeling"));

        let bad_status = EntryArgs::from_positional(&["1", "loved", "binging"]);
        let err = validate(&bad_status, ADD_USAGE).unwrap_err();
        assert!(err.to_string().contains("not a valid status"));

        let bad_episode = EntryArgs::from_positional(&["1", "loved", "watching", "five"]);
        let err = validate(&bad_episode, ADD_USAGE).unwrap_err();
        assert_eq!(err.to_string(), "\"five\" is not a valid episode number");

        let missing_id = EntryArgs::default();
        assert!(matches!(validate(&missing_id, ADD_USAGE), Err(CommandError::Usage(_))));
    }

    #[test]
    fn test_build_entry_maps_record() {
        let entry = build_entry(&record(), Some(Feeling::Loved), Status::Watching, Some(5));

        assert_eq!(entry.catalog_id, 9253);
        assert_eq!(entry.title, "Steins;Gate");
        assert_eq!(entry.description, "Time travel.");
        assert_eq!(entry.episodes_summary, "TV · 24 eps");
        assert_eq!(entry.year, "2011");
        assert_eq!(entry.studio, "White Fox, Nitroplus");
        assert_eq!(entry.link, "https://anilist.co/anime/9253/");
        assert_eq!(entry.progress, 5);
        assert_eq!(entry.total_episodes, 24);
    }

    #[test]
    fn test_build_entry_completed_uses_total() {
        let mut rec = record();
        rec.site_url = Some("https://anilist.co/anime/9253/Steins-Gate".to_string());
        let entry = build_entry(&rec, None, Status::Completed, Some(2));

        assert_eq!(entry.progress, 24);
        assert_eq!(entry.link, "https://anilist.co/anime/9253/Steins-Gate");
    }

    #[test]
    fn test_build_entry_unknown_year_and_episodes() {
        let mut rec = record();
        rec.year = None;
        rec.episodes = None;
        let entry = build_entry(&rec, None, Status::Completed, None);

        assert_eq!(entry.year, "");
        assert_eq!(entry.total_episodes, 0);
        assert_eq!(entry.progress, 0);
        assert_eq!(entry.episodes_summary, "TV · ? eps");
    }
}
