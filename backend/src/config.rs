//! Runtime configuration read from the process environment.
//!
//! | variable                  | default          |
//! |---------------------------|------------------|
//! | `ACADEMY_HOST`            | `127.0.0.1`      |
//! | `ACADEMY_PORT`            | `8080`           |
//! | `ACADEMY_DB_PATH`         | `academy.sqlite` |
//! | `ACADEMY_DUPLICATE_NAMES` | `reject`         |

use std::path::PathBuf;
use std::str::FromStr;

use crate::ingest::resolver::DuplicateNamePolicy;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DB_PATH: &str = "academy.sqlite";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value '{value}' for {key}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_path: PathBuf,
    pub duplicate_names: DuplicateNamePolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            database_path: PathBuf::from(DEFAULT_DB_PATH),
            duplicate_names: DuplicateNamePolicy::Reject,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup so tests need not touch the environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = AppConfig::default();

        if let Some(host) = lookup("ACADEMY_HOST") {
            config.host = host;
        }
        if let Some(port) = lookup("ACADEMY_PORT") {
            config.port = parse_value("ACADEMY_PORT", port)?;
        }
        if let Some(path) = lookup("ACADEMY_DB_PATH") {
            config.database_path = PathBuf::from(path);
        }
        if let Some(policy) = lookup("ACADEMY_DUPLICATE_NAMES") {
            config.duplicate_names = parse_value("ACADEMY_DUPLICATE_NAMES", policy)?;
        }

        Ok(config)
    }

    pub fn bind_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

fn parse_value<T: FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { key, value })
}
