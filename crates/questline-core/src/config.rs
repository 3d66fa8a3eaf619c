use std::fs;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "gif", "bmp", "webp"];

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QuestlineConfig {
    pub version: u32,
    #[serde(default)]
    pub media: MediaConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MediaConfig {
    pub dir: Option<PathBuf>,
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            dir: None,
            extensions: default_extensions(),
        }
    }
}

impl Default for QuestlineConfig {
    fn default() -> Self {
        Self {
            version: 1,
            media: MediaConfig::default(),
        }
    }
}

impl QuestlineConfig {
    /// Directory the image picker browses. Falls back to the process working
    /// directory when the config does not name one.
    pub fn media_dir(&self, cwd: &Path) -> PathBuf {
        self.media
            .dir
            .clone()
            .unwrap_or_else(|| cwd.to_path_buf())
    }
}

fn default_extensions() -> Vec<String> {
    DEFAULT_EXTENSIONS
        .iter()
        .map(|value| (*value).to_string())
        .collect()
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not resolve home directory for config path")]
    HomeDirectoryUnavailable,
    #[error("failed to read config at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid config: {message}")]
    Validation { message: String },
}

pub fn resolve_config_path() -> anyhow::Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or(ConfigError::HomeDirectoryUnavailable)?;
    Ok(base_dirs
        .home_dir()
        .join(".config")
        .join("questline")
        .join("config.toml"))
}

/// Absent config is not an error: the flow runs with defaults. A present
/// config must parse and validate.
pub fn load_config_or_default(path: &Path) -> Result<QuestlineConfig, ConfigError> {
    if !path.exists() {
        return Ok(QuestlineConfig::default());
    }
    load_config(path)
}

pub fn load_config(path: &Path) -> Result<QuestlineConfig, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let parsed: QuestlineConfig = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    validate_config(&parsed)?;
    Ok(parsed)
}

pub fn validate_config(config: &QuestlineConfig) -> Result<(), ConfigError> {
    if config.version != 1 {
        return Err(ConfigError::Validation {
            message: "version must be 1".to_string(),
        });
    }

    if config.media.extensions.is_empty() {
        return Err(ConfigError::Validation {
            message: "at least one media extension must be configured".to_string(),
        });
    }

    for (index, extension) in config.media.extensions.iter().enumerate() {
        if extension.trim().is_empty() {
            return Err(ConfigError::Validation {
                message: format!("media.extensions[{index}] must be non-empty"),
            });
        }
        if extension.contains('.') {
            return Err(ConfigError::Validation {
                message: format!(
                    "media.extensions[{index}] must not contain '.', got {extension:?}"
                ),
            });
        }
    }

    if let Some(dir) = &config.media.dir
        && dir.as_os_str().is_empty()
    {
        return Err(ConfigError::Validation {
            message: "media.dir must be non-empty when set".to_string(),
        });
    }

    Ok(())
}
