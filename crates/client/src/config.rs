use crate::ConfigError;
use oddsboard_core::DEFAULT_OPPONENTS;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5000/calculate";
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

pub const CONFIG_ENV: &str = "ODDSBOARD_CONFIG";
pub const ENDPOINT_ENV: &str = "ODDSBOARD_ENGINE_URL";
pub const TIMEOUT_ENV: &str = "ODDSBOARD_TIMEOUT_MS";
pub const OPPONENTS_ENV: &str = "ODDSBOARD_OPPONENTS";

/// Command-line values, the last configuration layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFlags {
    pub endpoint: Option<String>,
    pub opponents: Option<u32>,
}

/// Where and how to reach the probability engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EngineConfig {
    pub endpoint: String,
    pub timeout_ms: u64,
    pub num_opponents: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            num_opponents: DEFAULT_OPPONENTS,
        }
    }
}

impl EngineConfig {
    /// Read a JSON config file. Missing fields keep their defaults.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let body = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: EngineConfig =
            serde_json::from_str(&body).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(config)
    }

    /// Defaults, then the file named by `path` or `ODDSBOARD_CONFIG`, then
    /// environment overrides. Not validated; later layers may still fix it.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));
        Self::layered(path.as_deref(), |name| std::env::var(name).ok())
    }

    /// Every layer up to and including `flags`, validated once at the end.
    pub fn resolve(path: Option<&Path>, flags: &ConfigFlags) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_flags(flags);
        config.validate()?;
        Ok(config)
    }

    fn layered<F>(path: Option<&Path>, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match path {
            Some(path) => Self::from_path(path)?,
            None => Self::default(),
        };
        config.apply_overrides(lookup)?;
        Ok(config)
    }

    pub fn apply_flags(&mut self, flags: &ConfigFlags) {
        if let Some(endpoint) = flags.endpoint.as_ref() {
            self.endpoint = endpoint.clone();
        }
        if let Some(opponents) = flags.opponents {
            self.num_opponents = opponents;
        }
    }

    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(endpoint) = lookup(ENDPOINT_ENV) {
            self.endpoint = endpoint;
        }
        if let Some(value) = lookup(TIMEOUT_ENV) {
            self.timeout_ms = parse_env(TIMEOUT_ENV, &value)?;
        }
        if let Some(value) = lookup(OPPONENTS_ENV) {
            self.num_opponents = parse_env(OPPONENTS_ENV, &value)?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.endpoint.trim().is_empty() {
            return Err(ConfigError::InvalidField {
                field: "endpoint".to_string(),
                message: "endpoint must not be empty".to_string(),
            });
        }
        if self.timeout_ms == 0 {
            return Err(ConfigError::InvalidField {
                field: "timeout_ms".to_string(),
                message: "timeout must be at least 1ms".to_string(),
            });
        }
        if self.num_opponents == 0 {
            return Err(ConfigError::InvalidField {
                field: "num_opponents".to_string(),
                message: "at least one opponent is required".to_string(),
            });
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

fn parse_env<T: std::str::FromStr>(var: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse::<T>().map_err(|_| ConfigError::Env {
        var: var.to_string(),
        value: value.to_string(),
    })
}
