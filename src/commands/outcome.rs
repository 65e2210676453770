//! Results of successful commands, rendered as the user-facing summary.

use std::fmt;

use crate::domain::{Entry, Feeling, Status};

/// A freshly added entry
#[derive(Debug, Clone)]
pub struct AddOutcome {
    pub entry: Entry,
    /// Shard file the entry was written to
    pub shard: String,
}

impl fmt::Display for AddOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let e = &self.entry;
        let year = if e.year.is_empty() { "unknown" } else { e.year.as_str() };
        let studio = if e.studio.is_empty() { "unknown" } else { e.studio.as_str() };
        let episodes = if e.total_episodes > 0 {
            e.total_episodes.to_string()
        } else {
            "?".to_string()
        };

        writeln!(f, "✓ Added \"{}\" to {}", e.title, self.shard)?;
        writeln!(f, "  Year: {} | Studio: {} | Episodes: {}", year, studio, episodes)?;
        writeln!(
            f,
            "  Status: {} | Progress: {}/{}",
            e.status, e.progress, e.total_episodes
        )?;
        if let Some(feeling) = &e.feeling {
            writeln!(f, "  Feeling: {}", feeling)?;
        }
        writeln!(f, "  Link: {}", e.link)
    }
}

/// One field changed by an update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Feeling(Feeling),
    Status(Status),
    Progress(u32),
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Change::Feeling(feeling) => write!(f, "feeling → {}", feeling),
            Change::Status(status) => write!(f, "status → {}", status),
            Change::Progress(progress) => write!(f, "progress → {}", progress),
        }
    }
}

/// An updated entry and what changed, in application order
#[derive(Debug, Clone)]
pub struct UpdateOutcome {
    pub entry: Entry,
    pub shard: String,
    pub changes: Vec<Change>,
}

impl fmt::Display for UpdateOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "✓ Updated \"{}\" in {}", self.entry.title, self.shard)?;
        for change in &self.changes {
            writeln!(f, "  {}", change)?;
        }
        Ok(())
    }
}

/// A removed entry
#[derive(Debug, Clone)]
pub struct RemoveOutcome {
    pub entry: Entry,
    pub shard: String,
    /// The shard became empty and its file was deleted
    pub shard_deleted: bool,
}

impl fmt::Display for RemoveOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.shard_deleted {
            writeln!(
                f,
                "✓ Removed \"{}\", {} was empty and deleted",
                self.entry.title, self.shard
            )
        } else {
            writeln!(f, "✓ Removed \"{}\" from {}", self.entry.title, self.shard)
        }
    }
}
