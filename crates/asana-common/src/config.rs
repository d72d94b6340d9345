use std::env;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use thiserror::Error;

const CONFIG_DIR: &str = "asana";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultWorkspace {
    pub gid: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AsanaConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// `None` means no default workspace has been chosen yet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace: Option<DefaultWorkspace>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl Default for AsanaConfig {
    fn default() -> Self {
        Self {
            username: None,
            workspace: None,
            log_level: default_log_level(),
            base_url: None,
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl AsanaConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.log_level.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "log_level cannot be empty".to_string(),
            ));
        }
        if let Some(base_url) = &self.base_url
            && base_url.trim().is_empty()
        {
            return Err(ConfigError::ValidationFailed(
                "base_url cannot be empty if set".to_string(),
            ));
        }
        if let Some(workspace) = &self.workspace
            && workspace.gid.trim().is_empty()
        {
            return Err(ConfigError::ValidationFailed(
                "workspace.gid cannot be empty if set".to_string(),
            ));
        }
        Ok(())
    }

    pub fn apply(&mut self, update: ConfigUpdate) {
        match update {
            ConfigUpdate::Username(username) => self.username = Some(username),
            ConfigUpdate::Workspace(workspace) => self.workspace = Some(workspace),
            ConfigUpdate::ClearWorkspace => self.workspace = None,
            ConfigUpdate::LogLevel(level) => self.log_level = level,
            ConfigUpdate::BaseUrl(base_url) => self.base_url = base_url,
        }
    }
}

/// A single typed mutation of the persisted config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigUpdate {
    Username(String),
    Workspace(DefaultWorkspace),
    ClearWorkspace,
    LogLevel(String),
    BaseUrl(Option<String>),
}

/// User-facing names of the settable keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    DefaultWorkspace,
    Username,
    LogLevel,
    BaseUrl,
}

impl ConfigKey {
    pub fn all() -> [ConfigKey; 4] {
        [
            Self::DefaultWorkspace,
            Self::Username,
            Self::LogLevel,
            Self::BaseUrl,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::DefaultWorkspace => "default-workspace",
            Self::Username => "username",
            Self::LogLevel => "log-level",
            Self::BaseUrl => "base-url",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "default-workspace" | "default_workspace" | "dw" | "workspace" => {
                Some(Self::DefaultWorkspace)
            }
            "username" | "user" => Some(Self::Username),
            "log-level" | "log_level" => Some(Self::LogLevel),
            "base-url" | "base_url" => Some(Self::BaseUrl),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no config found at {path}; run `asana auth login` first")]
    NotFound { path: PathBuf },
    #[error("failed to read config at {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write config at {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config at {path}: {source}")]
    ParseFailed {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("failed to serialize config: {0}")]
    SerializeFailed(#[from] toml::ser::Error),
    #[error("config has invalid value: {0}")]
    ValidationFailed(String),
    #[error("config lock poisoned")]
    LockPoisoned,
}

impl ConfigError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// File-backed config. `load`, `save` and `set` are serialized through one mutex so a
/// read-modify-write in `set` cannot interleave with another writer in this process.
#[derive(Debug)]
pub struct ConfigStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl ConfigStore {
    pub fn at_path(path: PathBuf) -> Self {
        Self {
            path,
            lock: Mutex::new(()),
        }
    }

    pub fn open_default() -> Self {
        Self::at_path(Self::resolve_path())
    }

    pub fn resolve_path() -> PathBuf {
        if let Ok(path) = env::var("ASANA_CONFIG")
            && !path.trim().is_empty()
        {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join(CONFIG_DIR)
            .join(CONFIG_FILE)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<AsanaConfig, ConfigError> {
        let _guard = self.guard()?;
        read_config(&self.path)
    }

    /// Like `load`, but a missing file yields the defaults.
    pub fn load_or_default(&self) -> Result<AsanaConfig, ConfigError> {
        match self.load() {
            Err(ConfigError::NotFound { .. }) => Ok(AsanaConfig::default()),
            other => other,
        }
    }

    pub fn save(&self, config: &AsanaConfig) -> Result<(), ConfigError> {
        config.validate()?;
        let _guard = self.guard()?;
        write_config(&self.path, config)
    }

    pub fn set(&self, update: ConfigUpdate) -> Result<AsanaConfig, ConfigError> {
        let _guard = self.guard()?;
        let mut config = match read_config(&self.path) {
            Err(ConfigError::NotFound { .. }) => AsanaConfig::default(),
            other => other?,
        };
        config.apply(update);
        config.validate()?;
        write_config(&self.path, &config)?;
        tracing::debug!(path = %self.path.display(), "config updated");
        Ok(config)
    }

    fn guard(&self) -> Result<MutexGuard<'_, ()>, ConfigError> {
        self.lock.lock().map_err(|_| ConfigError::LockPoisoned)
    }
}

fn read_config(path: &Path) -> Result<AsanaConfig, ConfigError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(source) if source.kind() == ErrorKind::NotFound => {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }
        Err(source) => {
            return Err(ConfigError::ReadFailed {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    toml::from_str(&raw).map_err(|source| ConfigError::ParseFailed {
        path: path.to_path_buf(),
        source,
    })
}

fn write_config(path: &Path, config: &AsanaConfig) -> Result<(), ConfigError> {
    let raw = toml::to_string_pretty(config)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| ConfigError::WriteFailed {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, raw).map_err(|source| ConfigError::WriteFailed {
        path: path.to_path_buf(),
        source,
    })
}
