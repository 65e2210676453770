//! AniList GraphQL client.
//!
//! Sends a single POST per lookup and flattens the `Media` object into a
//! [`CatalogRecord`].

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::Deserialize;
use tracing::{debug, instrument};

use super::{CatalogError, CatalogRecord, MetadataCatalog, TitleVariants};

/// Public AniList GraphQL endpoint
pub const DEFAULT_ENDPOINT: &str = "https://graphql.anilist.co";

/// User agent sent when none is configured
pub const DEFAULT_USER_AGENT: &str = concat!("anilog/", env!("CARGO_PKG_VERSION"));

const MEDIA_QUERY: &str = r#"
query ($id: Int) {
  Media(id: $id, type: ANIME) {
    id
    siteUrl
    title { romaji english native }
    startDate { year }
    genres
    studios(isMain: true) { nodes { name } }
    episodes
    format
    description(asHtml: false)
  }
}
"#;

/// Response envelope: `{ data: { Media: ... } }`
#[derive(Debug, Deserialize)]
struct MediaResponse {
    data: Option<MediaData>,
}

#[derive(Debug, Deserialize)]
struct MediaData {
    #[serde(rename = "Media")]
    media: Option<Media>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Media {
    id: u32,
    site_url: Option<String>,
    title: Option<TitleVariants>,
    start_date: Option<FuzzyDate>,
    genres: Option<Vec<String>>,
    studios: Option<StudioConnection>,
    episodes: Option<u32>,
    format: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FuzzyDate {
    year: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct StudioConnection {
    #[serde(default)]
    nodes: Vec<Studio>,
}

#[derive(Debug, Deserialize)]
struct Studio {
    name: String,
}

impl From<Media> for CatalogRecord {
    fn from(media: Media) -> Self {
        Self {
            id: media.id,
            site_url: media.site_url,
            titles: media.title.unwrap_or_default(),
            year: media.start_date.and_then(|d| d.year),
            genres: media.genres.unwrap_or_default(),
            studios: media
                .studios
                .map(|s| s.nodes.into_iter().map(|n| n.name).collect())
                .unwrap_or_default(),
            episodes: media.episodes,
            format: media.format,
            description: media.description,
        }
    }
}

/// Decode a response body, mapping a missing `data.Media` to not-found
fn parse_response(id: u32, body: &str) -> Result<CatalogRecord, CatalogError> {
    let response: MediaResponse = serde_json::from_str(body)?;

    response
        .data
        .and_then(|d| d.media)
        .map(CatalogRecord::from)
        .ok_or(CatalogError::NotFound(id))
}

/// AniList client
pub struct AniListClient {
    /// GraphQL endpoint URL
    endpoint: String,
    /// HTTP client
    client: reqwest::Client,
}

impl AniListClient {
    /// Create a client for the given endpoint
    pub fn new(endpoint: impl Into<String>, user_agent: &str) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder().user_agent(user_agent).build()?;

        Ok(Self {
            endpoint: endpoint.into(),
            client,
        })
    }

    /// Create a client around a preconfigured HTTP client
    pub fn with_client(endpoint: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            endpoint: endpoint.into(),
            client,
        }
    }

    /// Endpoint this client posts to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl MetadataCatalog for AniListClient {
    #[instrument(skip(self), fields(endpoint = %self.endpoint))]
    async fn fetch_metadata(&self, id: u32) -> Result<CatalogRecord, CatalogError> {
        debug!(id, "Posting catalog query");

        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .json(&serde_json::json!({
                "query": MEDIA_QUERY,
                "variables": { "id": id },
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Transport {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let body = response.text().await?;
        debug!(bytes = body.len(), "Received catalog response");

        parse_response(id, &body)
    }
}
