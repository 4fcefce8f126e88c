use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,
    pub model: String,
    pub api_base: String,
    pub data_dir: PathBuf,
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            data_dir: default_data_dir(),
            request_timeout_secs: 600,
        }
    }
}

fn home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

fn default_data_dir() -> PathBuf {
    home_dir().join(".codewrap")
}

pub fn config_path() -> PathBuf {
    default_data_dir().join("config.toml")
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

impl Config {
    /// Reads `path` when it exists; a missing file yields defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Applies overrides from a variable lookup (the process environment in
    /// `load`).
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(key) = non_empty(var("GEMINI_API_KEY")).or_else(|| non_empty(var("API_KEY"))) {
            self.api_key = Some(key);
        }
        if let Some(model) = non_empty(var("CODEWRAP_MODEL")) {
            self.model = model;
        }
        if let Some(api_base) = non_empty(var("CODEWRAP_API_BASE")) {
            self.api_base = api_base.trim_end_matches('/').to_string();
        }
        if let Some(data_dir) = non_empty(var("CODEWRAP_DATA_DIR")) {
            self.data_dir = PathBuf::from(data_dir);
        }
    }

    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file(&config_path())?;
        config.apply_env(|name| std::env::var(name).ok());
        Ok(config)
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|key| !key.is_empty())
    }
}
