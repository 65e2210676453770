//! Tracked entries and their closed value sets.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A string that is not one of the accepted values for a closed set
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("\"{value}\" is not a valid {kind}.\nValid options: {options}")]
pub struct UnknownValue {
    pub kind: &'static str,
    pub value: String,
    pub options: String,
}

impl UnknownValue {
    fn new(kind: &'static str, value: &str, options: String) -> Self {
        Self {
            kind,
            value: value.to_string(),
            options,
        }
    }
}

/// Watch state of an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Watching,
    Completed,
    Planned,
    OnHold,
    Dropped,
}

impl Status {
    pub const ALL: [Status; 5] = [
        Status::Watching,
        Status::Completed,
        Status::Planned,
        Status::OnHold,
        Status::Dropped,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Watching => "watching",
            Status::Completed => "completed",
            Status::Planned => "planned",
            Status::OnHold => "onhold",
            Status::Dropped => "dropped",
        }
    }

    /// Single glyph shown in list output
    pub fn glyph(&self) -> char {
        match self {
            Status::Watching => '▶',
            Status::Completed => '✓',
            Status::Planned => '❤',
            Status::OnHold => '⏸',
            Status::Dropped => '✗',
        }
    }

    /// Comma-separated list of every accepted value
    pub fn options() -> String {
        Self::ALL.map(|s| s.as_str()).join(", ")
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownValue::new("status", s, Self::options()))
    }
}

/// Personal rating of an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feeling {
    Masterpiece,
    Loved,
    Okay,
    NotForMe,
    Disliked,
}

impl Feeling {
    /// Also the display order of the list report
    pub const ALL: [Feeling; 5] = [
        Feeling::Masterpiece,
        Feeling::Loved,
        Feeling::Okay,
        Feeling::NotForMe,
        Feeling::Disliked,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Feeling::Masterpiece => "masterpiece",
            Feeling::Loved => "loved",
            Feeling::Okay => "okay",
            Feeling::NotForMe => "not_for_me",
            Feeling::Disliked => "disliked",
        }
    }

    pub fn options() -> String {
        Self::ALL.map(|f| f.as_str()).join(", ")
    }
}

impl fmt::Display for Feeling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Feeling {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|feeling| feeling.as_str() == s)
            .ok_or_else(|| UnknownValue::new("feeling", s, Self::options()))
    }
}

/// A closed-set value as read from a shard file.
///
/// Values outside the set are kept verbatim so that rewriting a shard never
/// loses or alters them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Recorded<T> {
    Known(T),
    Unrecognized(String),
}

impl<T: Copy> Recorded<T> {
    /// The value, if it is one of the accepted ones
    pub fn known(&self) -> Option<T> {
        match self {
            Recorded::Known(value) => Some(*value),
            Recorded::Unrecognized(_) => None,
        }
    }
}

impl<T> From<T> for Recorded<T> {
    fn from(value: T) -> Self {
        Recorded::Known(value)
    }
}

impl<T: fmt::Display> fmt::Display for Recorded<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recorded::Known(value) => fmt::Display::fmt(value, f),
            Recorded::Unrecognized(raw) => f.write_str(raw),
        }
    }
}

/// One tracked title, as stored in a shard file
///
/// Field names on disk follow the established shard format
/// (`anilistId`, `episodes`, `genre`), not the Rust names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    /// Catalog identifier, unique across all shards
    #[serde(rename = "anilistId")]
    pub catalog_id: u32,

    pub title: String,

    pub status: Recorded<Status>,

    /// Absent means unrated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feeling: Option<Recorded<Feeling>>,

    /// Plain text, markup already stripped
    #[serde(default)]
    pub description: String,

    /// Display string such as `TV · 12 eps`
    #[serde(rename = "episodes", default)]
    pub episodes_summary: String,

    /// Release year, empty when unknown
    #[serde(default)]
    pub year: String,

    #[serde(rename = "genre", default)]
    pub genres: Vec<String>,

    /// Comma-joined studio names
    #[serde(default)]
    pub studio: String,

    #[serde(default)]
    pub link: String,

    #[serde(default)]
    pub progress: u32,

    /// Zero when the catalog does not know the episode count
    #[serde(default)]
    pub total_episodes: u32,

    #[serde(default)]
    pub start_date: String,

    #[serde(default)]
    pub end_date: String,
}

impl Entry {
    /// Status, unless the stored value is not a recognized one
    pub fn known_status(&self) -> Option<Status> {
        self.status.known()
    }

    /// Feeling; unrated and unrecognized values both give `None`
    pub fn known_feeling(&self) -> Option<Feeling> {
        self.feeling.as_ref().and_then(Recorded::known)
    }

    /// Release year as a number, 0 when empty or not numeric
    pub fn year_number(&self) -> i32 {
        self.year.trim().parse().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Entry {
        Entry {
            catalog_id: 9253,
            title: "Steins;Gate".to_string(),
            status: Status::Watching.into(),
            feeling: Some(Feeling::NotForMe.into()),
            description: "A lab".to_string(),
            episodes_summary: "TV · 24 eps".to_string(),
            year: "2011".to_string(),
            genres: vec!["Sci-Fi".to_string(), "Thriller".to_string()],
            studio: "White Fox".to_string(),
            link: "https://anilist.co/anime/9253".to_string(),
            progress: 5,
            total_episodes: 24,
            start_date: String::new(),
            end_date: String::new(),
        }
    }

    #[test]
    fn test_status_from_str() {
        assert_eq!("onhold".parse::<Status>().unwrap(), Status::OnHold);
        assert_eq!("completed".parse::<Status>().unwrap(), Status::Completed);
        assert!("on_hold".parse::<Status>().is_err());
        assert!("Watching".parse::<Status>().is_err());
    }

    #[test]
    fn test_feeling_from_str_error_lists_options() {
        let err = "meh".parse::<Feeling>().unwrap_err();
        assert_eq!(err.kind, "feeling");
        let message = err.to_string();
        assert!(message.contains("\"meh\" is not a valid feeling"));
        assert!(message.contains("masterpiece, loved, okay, not_for_me, disliked"));
    }

    #[test]
    fn test_entry_uses_shard_field_names() {
        let json = serde_json::to_value(sample()).unwrap();

        assert_eq!(json["anilistId"], 9253);
        assert_eq!(json["episodes"], "TV · 24 eps");
        assert_eq!(json["genre"][1], "Thriller");
        assert_eq!(json["totalEpisodes"], 24);
        assert_eq!(json["feeling"], "not_for_me");
        assert_eq!(json["status"], "watching");
        assert_eq!(json["startDate"], "");
    }

    #[test]
    fn test_unrated_entry_omits_feeling() {
        let entry = Entry {
            feeling: None,
            ..sample()
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert!(json.get("feeling").is_none());

        let parsed: Entry = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.feeling, None);
    }

    #[test]
    fn test_unrecognized_values_survive_round_trip() {
        let mut json = serde_json::to_value(sample()).unwrap();
        json["status"] = "rewatching".into();
        json["feeling"] = "meh".into();

        let parsed: Entry = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.status, Recorded::Unrecognized("rewatching".to_string()));
        assert_eq!(parsed.known_status(), None);
        assert_eq!(parsed.known_feeling(), None);
        assert_eq!(parsed.status.to_string(), "rewatching");

        let written = serde_json::to_value(&parsed).unwrap();
        assert_eq!(written["status"], "rewatching");
        assert_eq!(written["feeling"], "meh");
    }

    #[test]
    fn test_known_values_parse_as_known() {
        let parsed: Entry = serde_json::from_value(serde_json::to_value(sample()).unwrap()).unwrap();
        assert_eq!(parsed.status, Recorded::Known(Status::Watching));
        assert_eq!(parsed.known_feeling(), Some(Feeling::NotForMe));
    }

    #[test]
    fn test_year_number() {
        let mut entry = sample();
        assert_eq!(entry.year_number(), 2011);

        entry.year = String::new();
        assert_eq!(entry.year_number(), 0);

        entry.year = "soon".to_string();
        assert_eq!(entry.year_number(), 0);
    }
}
