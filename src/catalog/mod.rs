//! Remote metadata catalog interface.
//!
//! The command layer only talks to a [`MetadataCatalog`]; the AniList
//! GraphQL client is the production implementation.

pub mod anilist;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

pub use anilist::AniListClient;

/// Errors raised while fetching catalog metadata
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("No anime found with AniList ID {0}")]
    NotFound(u32),

    #[error("AniList API returned {status} {reason}")]
    Transport { status: u16, reason: String },

    #[error("AniList request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Failed to decode AniList response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Title variants as the catalog reports them
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TitleVariants {
    /// Localized title
    pub english: Option<String>,
    /// Original title, romanized
    pub romaji: Option<String>,
    /// Native script title
    pub native: Option<String>,
}

/// Flat metadata record for one catalog title
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogRecord {
    pub id: u32,
    pub site_url: Option<String>,
    pub titles: TitleVariants,
    pub year: Option<i32>,
    pub genres: Vec<String>,
    /// Names of the main studios, in catalog order
    pub studios: Vec<String>,
    pub episodes: Option<u32>,
    /// Release format code (`TV`, `MOVIE`, ...)
    pub format: Option<String>,
    pub description: Option<String>,
}

/// Source of canonical metadata for catalog ids
#[async_trait]
pub trait MetadataCatalog: Send + Sync {
    /// Fetch one record. Exactly one request per call, no caching, no retry.
    async fn fetch_metadata(&self, id: u32) -> Result<CatalogRecord, CatalogError>;
}
