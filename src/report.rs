//! Grouped text report for `list`.

use std::cmp::Reverse;
use std::fmt::Write;

use crate::domain::{Entry, Feeling, Status};

/// An entry together with the shard it was read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedEntry {
    pub shard: String,
    pub entry: Entry,
}

/// Heading for a feeling group; `None` is the unrated group
pub fn group_label(feeling: Option<Feeling>) -> &'static str {
    match feeling {
        Some(Feeling::Masterpiece) => "★ Personal picks",
        Some(Feeling::Loved) => "♥ Highly recommend",
        Some(Feeling::Okay) => "— If you're up to it",
        Some(Feeling::NotForMe) => "~ Didn't click",
        Some(Feeling::Disliked) => "✗ Avoid these",
        None => "? Unrated",
    }
}

/// Group order: the feelings best first, unrated last
fn group_order() -> impl Iterator<Item = Option<Feeling>> {
    Feeling::ALL.into_iter().map(Some).chain(std::iter::once(None))
}

fn render_line(out: &mut String, entry: &Entry) {
    let year = if entry.year.is_empty() {
        "?"
    } else {
        entry.year.as_str()
    };
    let glyph = entry.known_status().map_or('?', |status| status.glyph());
    let progress = if entry.known_status() == Some(Status::Watching) {
        format!(" [{}/{}]", entry.progress, entry.total_episodes)
    } else {
        String::new()
    };

    let _ = writeln!(
        out,
        "  {} {} ({}){}  #{}",
        glyph,
        entry.title,
        year,
        progress,
        entry.catalog_id
    );
}

/// Render entries grouped by feeling, newest year first within a group.
///
/// Empty groups are skipped. Ties keep their shard read order.
pub fn render_list(listed: &[ListedEntry]) -> String {
    if listed.is_empty() {
        return "No anime entries found.\n".to_string();
    }

    let mut out = String::new();
    let _ = write!(out, "\n{} titles total\n\n", listed.len());

    for feeling in group_order() {
        let mut members: Vec<&Entry> = listed
            .iter()
            .map(|l| &l.entry)
            .filter(|e| e.known_feeling() == feeling)
            .collect();
        if members.is_empty() {
            continue;
        }

        members.sort_by_key(|e| Reverse(e.year_number()));

        let _ = writeln!(out, "{} ({})", group_label(feeling), members.len());
        for entry in members {
            render_line(&mut out, entry);
        }
        out.push('\n');
    }

    out
}
