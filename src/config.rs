// Runtime configuration.
// Defaults, an optional JSON config file, and environment overrides.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cache::paths;
use crate::error::Result;
use crate::github::GITHUB_API_BASE;

pub const DEFAULT_USERNAME: &str = "ipv1337";

/// folio settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// GitHub user whose data fills the page.
    pub username: String,
    pub api_base: String,
    /// Optional token; only raises the rate limit.
    #[serde(skip_serializing)]
    pub token: Option<String>,
    pub cache_ttl_secs: u64,
    /// Cache directory; the per-user cache dir when unset.
    pub cache_dir: Option<PathBuf>,
    /// Page document read and written by the binary.
    pub page_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            username: DEFAULT_USERNAME.to_string(),
            api_base: GITHUB_API_BASE.to_string(),
            token: None,
            cache_ttl_secs: 60 * 60,
            cache_dir: None,
            page_path: PathBuf::from("page.json"),
        }
    }
}

impl Config {
    /// Load from the user config file (if present), then apply environment
    /// overrides.
    pub fn load() -> Result<Self> {
        let config = match paths::config_path() {
            Some(path) if path.exists() => Self::from_file(&path)?,
            _ => Self::default(),
        };
        Ok(config.with_env())
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Apply `FOLIO_USERNAME` and `GITHUB_TOKEN` when set and non-empty.
    pub fn with_env(self) -> Self {
        self.with_overrides(
            std::env::var("FOLIO_USERNAME").ok(),
            std::env::var("GITHUB_TOKEN").ok(),
        )
    }

    fn with_overrides(mut self, username: Option<String>, token: Option<String>) -> Self {
        if let Some(username) = username.filter(|u| !u.is_empty()) {
            self.username = username;
        }
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            self.token = Some(token);
        }
        self
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Resolved cache directory.
    pub fn cache_dir(&self) -> PathBuf {
        self.cache_dir
            .clone()
            .or_else(paths::cache_dir)
            .unwrap_or_else(|| PathBuf::from(".folio-cache"))
    }
}
