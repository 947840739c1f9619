use crate::coordinator::{CoordinatorSettings, StandPolicy};
use crate::delay::DelayPolicy;
use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use std::fs::read_to_string;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not read config file {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    pub server_url: String,
    pub request_timeout_secs: u64,
    pub stand_policy: StandPolicy,
    pub standing_delay_ms: u64,
    pub opponent_delay_ms: u64,
    pub show_opponent_hand: bool,
    pub log_dir: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            server_url: "http://localhost:8000".to_string(),
            request_timeout_secs: 10,
            stand_policy: StandPolicy::default(),
            standing_delay_ms: 500,
            opponent_delay_ms: 750,
            show_opponent_hand: false,
            log_dir: PathBuf::from("./logs"),
        }
    }
}

impl ClientConfig {
    pub fn default_path() -> Option<PathBuf> {
        BaseDirs::new().map(|base| base.config_dir().join("pazaak").join("client.toml"))
    }

    /// Reads the config at `path`, or at the default location when no path is
    /// given. Only a missing default file falls back to the built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path() {
                Some(path) if path.exists() => path,
                _ => return Ok(ClientConfig::default()),
            },
        };
        let string = read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        let config = toml::from_str(&string).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })?;
        info!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn coordinator_settings(&self) -> CoordinatorSettings {
        CoordinatorSettings {
            delay_policy: DelayPolicy {
                standing: Duration::from_millis(self.standing_delay_ms),
                opponent: Duration::from_millis(self.opponent_delay_ms),
            },
            stand_policy: self.stand_policy,
        }
    }
}
