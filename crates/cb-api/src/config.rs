//! API server configuration.

use std::path::PathBuf;

use serde::Deserialize;

use crate::inference::NluConfig;

/// Top-level API server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Listen address (e.g., "0.0.0.0").
    #[serde(default = "default_host")]
    pub host: String,
    /// Listen port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// PostgreSQL connection URL. In-memory state when absent.
    pub database_url: Option<String>,
    /// Directory receiving uploaded training datasets.
    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,
    /// Insert the stock sample bots into the database at startup.
    #[serde(default)]
    pub seed_sample_bots: bool,
    /// Remote NLU server settings.
    #[serde(default)]
    pub nlu: NluConfig,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from("instance/training_data")
}

impl ApiConfig {
    /// Load config from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        let flag = |key: &str| var(key).map(|v| v.eq_ignore_ascii_case("true") || v == "1");
        let number = |key: &str| var(key).and_then(|v| v.parse::<u64>().ok());
        let defaults = Self::default();

        Self {
            host: var("HOST").unwrap_or(defaults.host),
            port: var("PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.port),
            database_url: var("DATABASE_URL"),
            upload_dir: var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.upload_dir),
            seed_sample_bots: flag("SEED_SAMPLE_BOTS").unwrap_or(false),
            nlu: NluConfig {
                base_url: var("NLU_SERVER_URL").unwrap_or(defaults.nlu.base_url),
                probe_timeout_secs: number("NLU_PROBE_TIMEOUT_SECS")
                    .unwrap_or(defaults.nlu.probe_timeout_secs),
                parse_timeout_secs: number("NLU_PARSE_TIMEOUT_SECS")
                    .unwrap_or(defaults.nlu.parse_timeout_secs),
                enabled: flag("NLU_ENABLED").unwrap_or(defaults.nlu.enabled),
            },
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            database_url: None,
            upload_dir: default_upload_dir(),
            seed_sample_bots: false,
            nlu: NluConfig::default(),
        }
    }
}
