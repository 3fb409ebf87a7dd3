use std::error::Error;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Optional user configuration, read from `$HABITS_CONFIG` or
/// `$HOME/.config/habits/config.toml`. A missing file means defaults.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub db_path: Option<String>,
    #[serde(default)]
    pub user: Option<String>,
}

/// Fully resolved runtime settings after layering CLI/env values over the
/// config file over built-in defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub db_path: String,
    pub user: String,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        match config_path() {
            Some(path) if path.exists() => Self::from_path(&path),
            _ => Ok(Self::default()),
        }
    }

    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|err| ConfigError::Io {
            path: path.to_path_buf(),
            source: err,
        })?;
        Self::parse(&raw, path)
    }

    fn parse(raw: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(raw).map_err(|err| ConfigError::Parse {
            path: path.to_path_buf(),
            source: err,
        })
    }
}

fn config_path() -> Option<PathBuf> {
    if let Some(explicit) = std::env::var_os("HABITS_CONFIG") {
        return Some(PathBuf::from(explicit));
    }
    let home = std::env::var_os("HOME")?;
    Some(PathBuf::from(home).join(".config/habits/config.toml"))
}

fn default_db_path() -> String {
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home)
            .join(".habits/habits.sqlite")
            .display()
            .to_string(),
        None => ".habits/habits.sqlite".to_string(),
    }
}

pub fn resolve_settings(
    cli_db: Option<&str>,
    cli_user: Option<&str>,
    config: &Config,
) -> Settings {
    let db_path = cli_db
        .map(str::to_string)
        .or_else(|| config.db_path.clone())
        .unwrap_or_else(default_db_path);
    let user = cli_user
        .map(str::to_string)
        .or_else(|| config.user.clone())
        .unwrap_or_else(|| "local".to_string());
    Settings { db_path, user }
}

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "failed to read {}: {}", path.display(), source)
            }
            ConfigError::Parse { path, source } => {
                write!(f, "failed to parse {}: {}", path.display(), source)
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
        }
    }
}
