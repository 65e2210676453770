//! Configuration for the anime list.
//!
//! Configuration sources (highest priority first):
//! 1. CLI flags / environment variables (ANILOG_DATA_DIR, ANILOG_ENDPOINT)
//! 2. Config file (.anilog/config.yaml)
//! 3. Defaults (./src/data/anime, public AniList endpoint)
//!
//! Config file discovery:
//! - Searches the start directory and its parents for .anilog/config.yaml
//! - Paths in the config file are relative to the project root (the parent of .anilog/)

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::catalog::anilist::{DEFAULT_ENDPOINT, DEFAULT_USER_AGENT};

/// Data directory used when nothing else is configured
pub const DEFAULT_DATA_DIR: &str = "src/data/anime";

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    /// Shard directory (relative to the project root)
    pub data_dir: Option<String>,
    #[serde(default)]
    pub catalog: Option<CatalogConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogConfig {
    pub endpoint: Option<String>,
    pub user_agent: Option<String>,
}

/// Values given on the command line, which beat everything else
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub data_dir: Option<PathBuf>,
    pub endpoint: Option<String>,
}

/// Resolved configuration with absolute paths
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Directory holding the shard files
    pub data_dir: PathBuf,
    /// GraphQL endpoint of the metadata catalog
    pub endpoint: String,
    /// User agent for catalog requests
    pub user_agent: String,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
}

/// Find config file by searching `start` and its parents
fn find_config_file(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        let config_path = current.join(".anilog").join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to `base`
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}

impl ResolvedConfig {
    /// Load configuration, discovering the config file from `start_dir`
    pub fn load(start_dir: &Path, overrides: &Overrides) -> Result<Self> {
        let config_file = find_config_file(start_dir);

        let (file, base_dir) = match config_file {
            Some(ref config_path) => {
                let file = load_config_file(config_path)?;
                // .anilog/config.yaml -> project root
                let root = config_path
                    .parent()
                    .and_then(|p| p.parent())
                    .unwrap_or(start_dir)
                    .to_path_buf();
                (Some(file), root)
            }
            None => (None, start_dir.to_path_buf()),
        };

        let catalog = file
            .as_ref()
            .and_then(|f| f.catalog.clone())
            .unwrap_or_default();

        let data_dir = match &overrides.data_dir {
            Some(dir) => dir.clone(),
            None => {
                let configured = file.as_ref().and_then(|f| f.data_dir.as_deref());
                resolve_path(&base_dir, configured.unwrap_or(DEFAULT_DATA_DIR))
            }
        };

        let endpoint = overrides
            .endpoint
            .clone()
            .or(catalog.endpoint)
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

        let user_agent = catalog
            .user_agent
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());

        Ok(Self {
            data_dir,
            endpoint,
            user_agent,
            config_file,
        })
    }

    /// Load configuration starting from the current directory
    pub fn from_current_dir(overrides: &Overrides) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to determine current directory")?;
        Self::load(&cwd, overrides)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_config(root: &Path, body: &str) -> PathBuf {
        let dir = root.join(".anilog");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.yaml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "{}", body).unwrap();
        path
    }

    #[test]
    fn test_defaults_without_file() {
        let temp = TempDir::new().unwrap();
        let config = ResolvedConfig::load(temp.path(), &Overrides::default()).unwrap();

        assert_eq!(config.data_dir, temp.path().join("src/data/anime"));
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
        assert!(config.config_file.is_none());
    }

    #[test]
    fn test_config_file_parsing() {
        let temp = TempDir::new().unwrap();
        let path = write_config(
            temp.path(),
            r#"
version: "1"
data_dir: data/list
catalog:
  endpoint: http://localhost:9999/graphql
  user_agent: my-list/1.0
"#,
        );

        let file = load_config_file(&path).unwrap();
        assert_eq!(file.version, "1");
        assert_eq!(file.data_dir.as_deref(), Some("data/list"));
        assert_eq!(
            file.catalog.unwrap().endpoint.as_deref(),
            Some("http://localhost:9999/graphql")
        );
    }

    #[test]
    fn test_file_discovered_from_subdirectory() {
        let temp = TempDir::new().unwrap();
        write_config(temp.path(), "version: \"1\"\ndata_dir: shards\n");
        let nested = temp.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        let config = ResolvedConfig::load(&nested, &Overrides::default()).unwrap();

        assert_eq!(config.data_dir, temp.path().join("shards"));
        assert!(config.config_file.is_some());
    }

    #[test]
    fn test_overrides_win() {
        let temp = TempDir::new().unwrap();
        write_config(
            temp.path(),
            "version: \"1\"\ndata_dir: shards\ncatalog:\n  endpoint: http://file\n",
        );

        let overrides = Overrides {
            data_dir: Some(PathBuf::from("/tmp/elsewhere")),
            endpoint: Some("http://flag".to_string()),
        };
        let config = ResolvedConfig::load(temp.path(), &overrides).unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/tmp/elsewhere"));
        assert_eq!(config.endpoint, "http://flag");
    }

    #[test]
    fn test_resolve_relative_path() {
        let base = PathBuf::from("/home/user/project");

        assert_eq!(
            resolve_path(&base, "./subdir"),
            PathBuf::from("/home/user/project/./subdir")
        );
        assert_eq!(
            resolve_path(&base, "/absolute/path"),
            PathBuf::from("/absolute/path")
        );
    }
}
