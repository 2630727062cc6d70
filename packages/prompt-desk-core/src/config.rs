//! Client configuration: where the backend lives and who we are.
//!
//! Resolved once at startup from, in increasing precedence: built-in
//! defaults, an optional `config.toml`, and the environment.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{Error, Result};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_USER_ID: &str = "default-user";

pub const API_URL_ENV: &str = "PROMPT_DESK_API_URL";
pub const USER_ID_ENV: &str = "PROMPT_DESK_USER_ID";

/// Resolved client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub base_url: String,
    pub user_id: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_id: DEFAULT_USER_ID.to_string(),
        }
    }
}

/// On-disk shape of `config.toml`. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ConfigFile {
    pub base_url: Option<String>,
    pub user_id: Option<String>,
}

impl Config {
    /// Load from the default config file location and the environment.
    pub fn load() -> Result<Self> {
        Self::load_from(Self::default_path().as_deref())
    }

    /// Load from an explicit config file (skipped when it does not exist)
    /// and the environment.
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => Self::read_file(path)?,
            None => None,
        };
        Ok(Self::resolve(file, |key| env::var(key).ok()))
    }

    /// Default path: `<platform config dir>/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("dev", "prompt-desk", "prompt-desk")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    fn read_file(path: &Path) -> Result<Option<ConfigFile>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        let file = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;

        tracing::debug!("Loaded config from {}", path.display());
        Ok(Some(file))
    }

    /// Layer the file and environment over the defaults. Blank values at any
    /// layer are ignored.
    pub fn resolve(file: Option<ConfigFile>, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(file) = file {
            if let Some(url) = non_blank(file.base_url) {
                config.base_url = url;
            }
            if let Some(user) = non_blank(file.user_id) {
                config.user_id = user;
            }
        }

        if let Some(url) = non_blank(lookup(API_URL_ENV)) {
            config.base_url = url;
        }
        if let Some(user) = non_blank(lookup(USER_ID_ENV)) {
            config.user_id = user;
        }

        config
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_defaults() {
        let config = Config::resolve(None, no_env);
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.user_id, "default-user");
    }

    #[test]
    fn test_env_overrides_file() {
        let file = ConfigFile {
            base_url: Some("http://file:1".into()),
            user_id: Some("file-user".into()),
        };
        let env: HashMap<&str, String> =
            HashMap::from([(API_URL_ENV, "http://env:2".to_string())]);

        let config = Config::resolve(Some(file), |key| env.get(key).cloned());
        assert_eq!(config.base_url, "http://env:2");
        assert_eq!(config.user_id, "file-user");
    }

    #[test]
    fn test_blank_env_is_ignored() {
        let config = Config::resolve(None, |key| {
            (key == API_URL_ENV).then(|| "   ".to_string())
        });
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_read_toml_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "base_url = \"http://chat.internal:9000\"\n").unwrap();

        let file = Config::read_file(&path).unwrap().unwrap();
        let config = Config::resolve(Some(file), no_env);
        assert_eq!(config.base_url, "http://chat.internal:9000");
        assert_eq!(config.user_id, DEFAULT_USER_ID);
    }

    #[test]
    fn test_missing_file_is_not_an_error() {
        let dir = tempdir().unwrap();
        let file = Config::read_file(&dir.path().join("absent.toml")).unwrap();
        assert!(file.is_none());
    }

    #[test]
    fn test_malformed_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "base_url = [").unwrap();

        let result = Config::read_file(&path);
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
