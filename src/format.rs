//! Field formatters turning catalog metadata into stored entry fields.
//!
//! Everything here is pure: no I/O, same input gives the same output.

use std::sync::OnceLock;

use regex::Regex;

use crate::catalog::TitleVariants;
use crate::domain::Status;

/// Title used when the catalog has no usable title at all
pub const UNKNOWN_TITLE: &str = "Unknown";

/// Label used when the release format is missing or unrecognized
const DEFAULT_FORMAT_LABEL: &str = "TV";

static LINE_BREAK: OnceLock<Regex> = OnceLock::new();
static TAG: OnceLock<Regex> = OnceLock::new();
static WHITESPACE: OnceLock<Regex> = OnceLock::new();

fn line_break() -> &'static Regex {
    LINE_BREAK.get_or_init(|| Regex::new(r"(?i)<br\s*/?>").expect("static pattern"))
}

fn tag() -> &'static Regex {
    TAG.get_or_init(|| Regex::new(r"<[^>]+>").expect("static pattern"))
}

fn whitespace() -> &'static Regex {
    WHITESPACE.get_or_init(|| Regex::new(r"\s+").expect("static pattern"))
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Build the display title from the catalog's title variants.
///
/// `English (Romaji)` when both exist and differ, otherwise the first
/// non-empty of english, romaji, native.
pub fn compose_title(variants: &TitleVariants) -> String {
    let english = non_empty(&variants.english);
    let romaji = non_empty(&variants.romaji);

    if let (Some(english), Some(romaji)) = (english, romaji) {
        if english != romaji {
            return format!("{} ({})", english, romaji);
        }
    }

    english
        .or(romaji)
        .or_else(|| non_empty(&variants.native))
        .unwrap_or(UNKNOWN_TITLE)
        .to_string()
}

/// Reduce a catalog description to plain single-line text
pub fn strip_markup(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return String::new();
    };

    let text = line_break().replace_all(raw, " ");
    let text = tag().replace_all(&text, "");
    whitespace().replace_all(&text, " ").trim().to_string()
}

/// Display label for a catalog release format code
fn format_label(code: Option<&str>) -> &'static str {
    match code {
        Some("TV") => "TV",
        Some("TV_SHORT") => "TV Short",
        Some("MOVIE") => "Movie",
        Some("SPECIAL") => "Special",
        Some("OVA") => "OVA",
        Some("ONA") => "ONA",
        Some("MUSIC") => "Music",
        _ => DEFAULT_FORMAT_LABEL,
    }
}

/// Render `{label} · {count} eps`, with `?` for an unknown count
pub fn summarize_episodes(format_code: Option<&str>, episodes: Option<u32>) -> String {
    let count = match episodes {
        Some(n) if n > 0 => n.to_string(),
        _ => "?".to_string(),
    };
    format!("{} · {} eps", format_label(format_code), count)
}

/// Progress to store for an entry.
///
/// Completed entries always sit at the total. An explicit episode is kept
/// as given, even past the total.
pub fn derive_progress(status: Status, explicit_episode: Option<u32>, total_episodes: u32) -> u32 {
    if status == Status::Completed {
        return total_episodes;
    }
    explicit_episode.unwrap_or(0)
}
