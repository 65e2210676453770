//! Command-line interface for the anime list.
//!
//! Provides commands for adding titles from AniList, updating feeling,
//! status and progress, removing titles, and printing the grouped list.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::catalog::AniListClient;
use crate::commands::{self, CommandError, EntryArgs};
use crate::config::{Overrides, ResolvedConfig};
use crate::report;
use crate::store::{ShardStore, CUTOFF_YEAR};

const VALUES_HELP: &str = "\
Valid feelings: masterpiece, loved, okay, not_for_me, disliked
Valid statuses: watching, completed, planned, onhold, dropped";

/// anime - personal anime list backed by year-sharded JSON files
#[derive(Parser, Debug)]
#[command(name = "anime")]
#[command(version, about, long_about = None, after_help = VALUES_HELP)]
pub struct Cli {
    /// Directory holding the shard files
    #[arg(long, global = true, env = "ANILOG_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// AniList GraphQL endpoint
    #[arg(long, global = true, env = "ANILOG_ENDPOINT")]
    pub endpoint: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a new anime by AniList ID
    Add {
        /// AniList ID
        anilist_id: String,

        /// Personal feeling (omit or pass "" for unrated)
        feeling: Option<String>,

        /// Watch status (defaults to watching)
        status: Option<String>,

        /// Episodes watched so far
        #[arg(allow_hyphen_values = true)]
        episode: Option<String>,
    },

    /// Update feeling/status/progress
    Update {
        /// AniList ID
        anilist_id: String,

        /// New feeling ("" to leave unchanged)
        feeling: Option<String>,

        /// New status ("" to leave unchanged)
        status: Option<String>,

        /// Episodes watched so far
        #[arg(allow_hyphen_values = true)]
        episode: Option<String>,
    },

    /// Remove an anime entry
    Remove {
        /// AniList ID
        anilist_id: String,
    },

    /// List all entries grouped by feeling
    List,

    /// Show resolved configuration
    Config,
}

impl Cli {
    /// Parse arguments, sending usage errors to stderr with exit code 1
    pub fn parse_or_exit() -> Self {
        match Self::try_parse() {
            Ok(cli) => cli,
            Err(e) if !e.use_stderr() => e.exit(),
            Err(e) => {
                let _ = e.print();
                std::process::exit(1);
            }
        }
    }

    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        let overrides = Overrides {
            data_dir: self.data_dir,
            endpoint: self.endpoint,
        };
        let config = ResolvedConfig::from_current_dir(&overrides)?;

        if let Err(e) = run_command(self.command, &config).await {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }

        Ok(())
    }
}

/// Run one command against the configured store
async fn run_command(command: Commands, config: &ResolvedConfig) -> Result<(), CommandError> {
    let store = ShardStore::new(&config.data_dir);

    match command {
        Commands::Add {
            anilist_id,
            feeling,
            status,
            episode,
        } => {
            let catalog = AniListClient::new(&config.endpoint, &config.user_agent)?;
            let args = EntryArgs {
                catalog_id: Some(anilist_id),
                feeling,
                status,
                episode,
            };
            let outcome = commands::add(&store, &catalog, &args).await?;
            print!("{}", outcome);
        }
        Commands::Update {
            anilist_id,
            feeling,
            status,
            episode,
        } => {
            let args = EntryArgs {
                catalog_id: Some(anilist_id),
                feeling,
                status,
                episode,
            };
            let outcome = commands::update(&store, &args).await?;
            print!("{}", outcome);
        }
        Commands::Remove { anilist_id } => {
            let outcome = commands::remove(&store, Some(&anilist_id)).await?;
            print!("{}", outcome);
        }
        Commands::List => {
            let listed = commands::list(&store).await?;
            print!("{}", report::render_list(&listed));
        }
        Commands::Config => show_config(config),
    }

    Ok(())
}

/// Show the resolved configuration (for debugging)
fn show_config(config: &ResolvedConfig) {
    println!(
        "Config file: {}",
        config
            .config_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none - using defaults)".to_string())
    );
    println!("Data directory: {}", config.data_dir.display());
    println!("Catalog endpoint: {}", config.endpoint);
    println!("User agent: {}", config.user_agent);
    println!("Year cutoff: {} (and earlier go to older.json)", CUTOFF_YEAR);
}
