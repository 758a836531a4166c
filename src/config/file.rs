//! On-disk location and JSON encoding of the persisted configuration.

use std::path::{Path, PathBuf};

use directories::BaseDirs;
use serde::{Serialize, de::DeserializeOwned};

use super::env::{Environment, ProcessEnv, non_empty};
use super::{ConfigError, ConfigResult};

/// Overrides the home directory the config directory is resolved against.
pub const ENV_CONFIG_HOME: &str = "BLUEMIX_HOME";

const CONFIG_DIR: &str = ".bluemix";
const CF_CONFIG_DIR: &str = ".cf";
const CONFIG_FILE: &str = "config.json";

/// Locations of the platform and CloudFoundry configuration files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigPaths {
    pub core: PathBuf,
    pub cf: PathBuf,
}

impl ConfigPaths {
    /// Layout inside an explicit config directory:
    /// `<dir>/config.json` and `<dir>/.cf/config.json`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            core: dir.join(CONFIG_FILE),
            cf: dir.join(CF_CONFIG_DIR).join(CONFIG_FILE),
        }
    }

    /// `$BLUEMIX_HOME/.bluemix`, or `~/.bluemix` when the variable is unset.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_environment(&ProcessEnv)
    }

    pub fn from_environment(env: &dyn Environment) -> ConfigResult<Self> {
        let home = match non_empty(env, ENV_CONFIG_HOME) {
            Some(home) => PathBuf::from(home),
            None => BaseDirs::new()
                .map(|dirs| dirs.home_dir().to_path_buf())
                .ok_or(ConfigError::NoHome)?,
        };
        Ok(Self::in_dir(home.join(CONFIG_DIR)))
    }
}

/// Read and decode `path`; `None` when the file does not exist or is empty.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> ConfigResult<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_str(&content)?))
}

/// Encode `value` as pretty JSON into `path`, creating parent directories.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> ConfigResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string_pretty(value)?;
    std::fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MemoryEnv;
    use tempfile::TempDir;

    #[test]
    fn test_paths_in_dir() {
        let paths = ConfigPaths::in_dir("/home/dev/.bluemix");
        assert_eq!(paths.core, PathBuf::from("/home/dev/.bluemix/config.json"));
        assert_eq!(paths.cf, PathBuf::from("/home/dev/.bluemix/.cf/config.json"));
    }

    #[test]
    fn test_paths_from_config_home() {
        let env = MemoryEnv::new().with_var(ENV_CONFIG_HOME, "/opt/cli");
        let paths = ConfigPaths::from_environment(&env).unwrap();
        assert_eq!(paths.core, PathBuf::from("/opt/cli/.bluemix/config.json"));
    }

    #[test]
    fn test_read_missing_and_empty() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        assert!(read_json::<serde_json::Value>(&path).unwrap().is_none());

        std::fs::write(&path, "  \n").unwrap();
        assert!(read_json::<serde_json::Value>(&path).unwrap().is_none());
    }

    #[test]
    fn test_write_creates_parents() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(".cf").join("config.json");

        write_json(&path, &serde_json::json!({"Target": "https://api.example.com"})).unwrap();
        let value: serde_json::Value = read_json(&path).unwrap().unwrap();
        assert_eq!(value["Target"], "https://api.example.com");
    }

    #[test]
    fn test_read_invalid_json() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = read_json::<serde_json::Value>(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Serialization(_)));
    }
}
