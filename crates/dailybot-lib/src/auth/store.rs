//! Credential and settings persistence
//!
//! Two JSON documents live in the config directory: `credentials.json` for
//! the login session and `config.json` for local settings. Both are written
//! owner-read/write only.

use super::{Credentials, Settings};
use crate::primitives::ConfigError;
use serde_json::Value;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

pub const CREDENTIALS_FILE: &str = "credentials.json";
pub const SETTINGS_FILE: &str = "config.json";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("Failed to write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },

    #[error("Failed to encode {path}: {source}")]
    Encode {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Persistent storage for credentials and settings
pub trait CredentialStore {
    /// Stored session, `None` when absent, unreadable JSON, or tokenless
    fn load_credentials(&self) -> Result<Option<Credentials>, StoreError>;

    /// Replace the stored session
    fn save_credentials(&self, credentials: &Credentials) -> Result<(), StoreError>;

    /// Remove the stored session; a missing file is not an error
    fn clear_credentials(&self) -> Result<(), StoreError>;

    fn load_settings(&self) -> Result<Settings, StoreError>;

    /// Merge `updates` into the stored settings and return the result
    fn update_settings(&self, updates: &[(&str, Option<&str>)]) -> Result<Settings, StoreError>;
}

/// Default config directory: `~/.config/dailybot`
pub fn default_config_dir() -> Result<PathBuf, ConfigError> {
    let dirs = directories::BaseDirs::new().ok_or(ConfigError::NoHomeDir)?;
    Ok(dirs.home_dir().join(".config").join("dailybot"))
}

/// File-backed store rooted at a config directory
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    config_dir: PathBuf,
}

impl FileCredentialStore {
    pub fn new(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
        }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn credentials_path(&self) -> PathBuf {
        self.config_dir.join(CREDENTIALS_FILE)
    }

    pub fn settings_path(&self) -> PathBuf {
        self.config_dir.join(SETTINGS_FILE)
    }

    /// File contents, `None` if the file does not exist
    fn read_optional(path: &Path) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    fn write_private<T: serde::Serialize>(&self, path: &Path, value: &T) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(value).map_err(|source| StoreError::Encode {
            path: path.to_path_buf(),
            source,
        })?;

        let write_err = |source| StoreError::Write {
            path: path.to_path_buf(),
            source,
        };

        fs::create_dir_all(&self.config_dir).map_err(write_err)?;
        fs::write(path, content).map_err(write_err)?;
        restrict_permissions(path).map_err(write_err)?;

        debug!(path = %path.display(), "wrote config file");
        Ok(())
    }
}

/// Parsed file contents when they form a JSON object; anything else is absent
fn json_object(path: &Path, content: &str) -> Option<Value> {
    match serde_json::from_str::<Value>(content) {
        Ok(value @ Value::Object(_)) => Some(value),
        Ok(_) => {
            warn!(path = %path.display(), "ignoring config file that is not a JSON object");
            None
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "ignoring unreadable config file");
            None
        }
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> io::Result<()> {
    Ok(())
}

impl CredentialStore for FileCredentialStore {
    fn load_credentials(&self) -> Result<Option<Credentials>, StoreError> {
        let path = self.credentials_path();
        let Some(content) = Self::read_optional(&path)? else {
            return Ok(None);
        };

        let Some(object) = json_object(&path, &content) else {
            return Ok(None);
        };
        match serde_json::from_value::<Credentials>(object) {
            Ok(credentials) if credentials.is_valid() => Ok(Some(credentials)),
            Ok(_) => Ok(None),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring unreadable credentials file");
                Ok(None)
            }
        }
    }

    fn save_credentials(&self, credentials: &Credentials) -> Result<(), StoreError> {
        self.write_private(&self.credentials_path(), credentials)
    }

    fn clear_credentials(&self) -> Result<(), StoreError> {
        let path = self.credentials_path();
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Write { path, source }),
        }
    }

    fn load_settings(&self) -> Result<Settings, StoreError> {
        let path = self.settings_path();
        let Some(content) = Self::read_optional(&path)? else {
            return Ok(Settings::new());
        };

        let Some(object) = json_object(&path, &content) else {
            return Ok(Settings::new());
        };
        Ok(serde_json::from_value(object).unwrap_or_else(|e| {
            warn!(path = %path.display(), error = %e, "ignoring unreadable settings file");
            Settings::new()
        }))
    }

    fn update_settings(&self, updates: &[(&str, Option<&str>)]) -> Result<Settings, StoreError> {
        let mut settings = self.load_settings()?;
        settings.merge(updates);
        self.write_private(&self.settings_path(), &settings)?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    include!("store.test.rs");
}
