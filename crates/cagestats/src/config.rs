//! Configuration: defaults, TOML config file, environment overrides.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Default semaphore capacity per division. Tune down to 1 when the
/// upstream sources start throttling.
pub const DEFAULT_DIVISION_CONCURRENCY: usize = 16;

/// Default profile-fetch retry ceiling.
pub const DEFAULT_FETCH_RETRIES: u32 = 3;

/// Resolved application settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Base data directory; the published rankings file lives here.
    pub data_dir: PathBuf,
    /// Filename of the published rankings JSON.
    pub output_filename: String,
    /// Directory receiving timestamped backups of prior runs.
    pub backup_dir: PathBuf,
    /// User agent for HTTP requests.
    pub user_agent: String,
    /// Per-attempt request timeout in seconds.
    pub request_timeout: u64,
    /// Profile-fetch retry ceiling.
    pub fetch_retries: u32,
    /// Delay between profile-fetch attempts in milliseconds.
    pub retry_delay_ms: u64,
    /// Max concurrent per-fighter pipelines within one division.
    pub division_concurrency: usize,
    /// UTC hour of the daily scheduled scrape.
    pub scrape_hour_utc: u32,
    /// Search / video API credentials.
    pub credentials: Credentials,
}

impl Default for Settings {
    fn default() -> Self {
        // Falls back gracefully: platform data dir -> home dir -> current dir
        let data_dir = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("cagestats");

        Self {
            backup_dir: data_dir.join("backups"),
            data_dir,
            output_filename: "rankings.json".to_string(),
            user_agent: "cagestats/0.1 (ranking statistics aggregator)".to_string(),
            request_timeout: 30,
            fetch_retries: DEFAULT_FETCH_RETRIES,
            retry_delay_ms: 2_000,
            division_concurrency: DEFAULT_DIVISION_CONCURRENCY,
            scrape_hour_utc: 0,
            credentials: Credentials::default(),
        }
    }
}

impl Settings {
    /// Full path of the published rankings file.
    pub fn output_path(&self) -> PathBuf {
        self.data_dir.join(&self.output_filename)
    }

    /// Ensure the data and backup directories exist.
    pub fn ensure_directories(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.data_dir)?;
        fs::create_dir_all(&self.backup_dir)?;
        Ok(())
    }
}

/// Credentials for the fallback search path and video enrichment.
/// Any of these may be absent; the affected capability is then disabled.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_engine_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub youtube_api_key_primary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub youtube_api_key_secondary: Option<String>,
}

impl Credentials {
    /// Read credentials from the environment. `.env` files are loaded by
    /// the binary before this runs.
    pub fn from_env() -> Self {
        Self {
            google_api_key: std::env::var("GOOGLE_API_KEY").ok(),
            google_engine_id: std::env::var("GOOGLE_SEARCH_ENGINE_ID").ok(),
            youtube_api_key_primary: std::env::var("YOUTUBE_API_KEY_1").ok(),
            youtube_api_key_secondary: std::env::var("YOUTUBE_API_KEY_2").ok(),
        }
    }

    /// Environment values win over config-file values.
    fn merged_over(self, file: Credentials) -> Self {
        Self {
            google_api_key: self.google_api_key.or(file.google_api_key),
            google_engine_id: self.google_engine_id.or(file.google_engine_id),
            youtube_api_key_primary: self.youtube_api_key_primary.or(file.youtube_api_key_primary),
            youtube_api_key_secondary: self
                .youtube_api_key_secondary
                .or(file.youtube_api_key_secondary),
        }
    }
}

/// Configuration file structure. Every field is optional; unset fields
/// fall back to `Settings::default()`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup_dir: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fetch_retries: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_delay_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub division_concurrency: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scrape_hour_utc: Option<u32>,
    #[serde(default)]
    pub credentials: Credentials,
}

impl Config {
    /// Load a config file. A missing file is fine when no explicit path
    /// was given; an explicit path that does not exist is an error.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (PathBuf::from("cagestats.toml"), false),
        };

        if !path.exists() {
            if required {
                anyhow::bail!("config file not found: {}", path.display());
            }
            return Ok(Config::default());
        }

        let raw = fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&raw)?;
        tracing::debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    /// Resolve into settings: defaults, overridden by file values,
    /// credentials overridden again by the environment.
    pub fn into_settings(self) -> Settings {
        let defaults = Settings::default();
        let data_dir = self.data_dir.unwrap_or(defaults.data_dir);
        Settings {
            backup_dir: self.backup_dir.unwrap_or_else(|| data_dir.join("backups")),
            data_dir,
            output_filename: self.output_filename.unwrap_or(defaults.output_filename),
            user_agent: self.user_agent.unwrap_or(defaults.user_agent),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            fetch_retries: self.fetch_retries.unwrap_or(defaults.fetch_retries),
            retry_delay_ms: self.retry_delay_ms.unwrap_or(defaults.retry_delay_ms),
            division_concurrency: self
                .division_concurrency
                .unwrap_or(defaults.division_concurrency),
            scrape_hour_utc: self.scrape_hour_utc.unwrap_or(defaults.scrape_hour_utc),
            credentials: Credentials::from_env().merged_over(self.credentials),
        }
    }
}
