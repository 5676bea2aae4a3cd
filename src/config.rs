use crate::error::{Result, WrappedError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable consulted for a GitHub token
pub const TOKEN_ENV_VAR: &str = "GITHUB_TOKEN";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// GitHub login used when `--user` is not given
    pub default_user: Option<String>,

    /// GitHub token (overridden by `--token` and `GITHUB_TOKEN`)
    pub github_token: Option<String>,

    /// Base URL of the GitHub REST API
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Maximum repositories listed per user
    #[serde(default = "default_max_repos")]
    pub max_repos: usize,

    /// Commits per repository enriched with line counts; the rest get averages
    #[serde(default = "default_commit_detail_sample")]
    pub commit_detail_sample: usize,

    /// Repositories whose languages are looked up
    #[serde(default = "default_max_language_repos")]
    pub max_language_repos: usize,

    /// Concurrent requests in flight during fan-out
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Directories/patterns to exclude when scanning for local repositories
    #[serde(default = "default_exclude_patterns")]
    pub exclude_patterns: Vec<String>,

    /// Maximum directory depth for local scanning (None = unlimited)
    pub max_scan_depth: Option<u32>,

    /// Cache fetched snapshots
    #[serde(default = "default_true")]
    pub cache_enabled: bool,

    /// Cache TTL in hours (default: 24)
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_hours: u32,

    /// Also fetch the previous year and show the change
    #[serde(default = "default_true")]
    pub compare_previous_year: bool,
}

impl Config {
    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(WrappedError::config(format!(
                "Config file not found at: {}",
                path.display()
            )));
        }

        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` when given, else from the default location.
    ///
    /// A missing default file is not an error: the tool runs on defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load_from(path);
        }

        let default_path = Self::default_config_path()?;
        if default_path.exists() {
            Self::load_from(&default_path)
        } else {
            tracing::debug!("No config at {}, using defaults", default_path.display());
            Ok(Self::default())
        }
    }

    /// Get the default config file path
    pub fn default_config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| WrappedError::config("Could not determine home directory"))?;
        Ok(home.join(".config").join("git-wrapped").join("config.toml"))
    }

    /// Get the default cache directory path
    pub fn default_cache_dir() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| WrappedError::config("Could not determine home directory"))?;
        Ok(home.join(".cache").join("git-wrapped"))
    }

    /// Write a default configuration file to `path`
    pub fn create_default_at(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let config = Self::default();
        let toml_string = toml::to_string_pretty(&config)?;
        fs::write(path, toml_string)?;

        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.api_base_url.trim().is_empty() {
            return Err(WrappedError::config("api_base_url must not be empty"));
        }

        if self.max_repos == 0 {
            return Err(WrappedError::config("max_repos must be > 0"));
        }

        if self.max_concurrency == 0 {
            return Err(WrappedError::config("max_concurrency must be > 0"));
        }

        if self.cache_ttl_hours == 0 {
            return Err(WrappedError::config("cache_ttl_hours must be > 0"));
        }

        Ok(())
    }

    /// Token from the flag, else the environment, else the config file
    pub fn resolve_token(&self, flag: Option<&str>) -> Option<String> {
        let env = std::env::var(TOKEN_ENV_VAR).ok();
        pick_token(flag, env.as_deref(), self.github_token.as_deref())
    }
}

fn pick_token(flag: Option<&str>, env: Option<&str>, config: Option<&str>) -> Option<String> {
    [flag, env, config]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|token| !token.is_empty())
        .map(str::to_string)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_user: None,
            github_token: None,
            api_base_url: default_api_base_url(),
            max_repos: default_max_repos(),
            commit_detail_sample: default_commit_detail_sample(),
            max_language_repos: default_max_language_repos(),
            max_concurrency: default_max_concurrency(),
            exclude_patterns: default_exclude_patterns(),
            max_scan_depth: None,
            cache_enabled: default_true(),
            cache_ttl_hours: default_cache_ttl(),
            compare_previous_year: default_true(),
        }
    }
}

// Serde default functions
fn default_api_base_url() -> String {
    "https://api.github.com".to_string()
}

fn default_max_repos() -> usize {
    50
}

fn default_commit_detail_sample() -> usize {
    100
}

fn default_max_language_repos() -> usize {
    20
}

fn default_max_concurrency() -> usize {
    8
}

fn default_exclude_patterns() -> Vec<String> {
    vec![
        "node_modules".to_string(),
        "target".to_string(),
        "dist".to_string(),
        "build".to_string(),
        "__pycache__".to_string(),
        ".venv".to_string(),
        "vendor".to_string(),
    ]
}

fn default_cache_ttl() -> u32 {
    24
}

fn default_true() -> bool {
    true
}
