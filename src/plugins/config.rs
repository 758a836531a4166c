//! Plugin-specific configuration file.
//!
//! Each plugin gets a JSON object at `<plugin dir>/config.json`. The file is
//! read on first access and rewritten after every change.

use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

use crate::config::file::{read_json, write_json};
use crate::config::{ConfigError, ConfigResult};

pub const PLUGIN_CONFIG_FILE: &str = "config.json";

/// Key/value configuration private to one plugin.
pub struct PluginConfig {
    path: PathBuf,
    data: RwLock<Option<Map<String, Value>>>,
}

impl PluginConfig {
    /// Configuration stored in `path`. Nothing is read until first access.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            data: RwLock::new(None),
        }
    }

    /// Configuration of the plugin installed in `plugin_dir`.
    pub fn for_plugin_dir(plugin_dir: impl AsRef<Path>) -> Self {
        Self::new(plugin_dir.as_ref().join(PLUGIN_CONFIG_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw value of `key`.
    pub fn get(&self, key: &str) -> ConfigResult<Option<Value>> {
        self.with_data(|map| map.get(key).cloned())
    }

    /// Raw value of `key`, or `default` when absent.
    pub fn get_with_default(&self, key: &str, default: Value) -> ConfigResult<Value> {
        Ok(self.get(key)?.unwrap_or(default))
    }

    /// Value of `key` decoded as `T`; a value of another shape is an error.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> ConfigResult<Option<T>> {
        match self.get(key)? {
            Some(value) => serde_json::from_value(value)
                .map(Some)
                .map_err(|e| ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: e.to_string(),
                }),
            None => Ok(None),
        }
    }

    pub fn get_string(&self, key: &str) -> ConfigResult<Option<String>> {
        self.get_as(key)
    }

    pub fn get_bool(&self, key: &str) -> ConfigResult<Option<bool>> {
        self.get_as(key)
    }

    pub fn get_int(&self, key: &str) -> ConfigResult<Option<i64>> {
        self.get_as(key)
    }

    pub fn get_float(&self, key: &str) -> ConfigResult<Option<f64>> {
        self.get_as(key)
    }

    pub fn get_string_slice(&self, key: &str) -> ConfigResult<Option<Vec<String>>> {
        self.get_as(key)
    }

    pub fn exists(&self, key: &str) -> ConfigResult<bool> {
        self.with_data(|map| map.contains_key(key))
    }

    pub fn keys(&self) -> ConfigResult<Vec<String>> {
        self.with_data(|map| map.keys().cloned().collect())
    }

    /// Store `value` under `key` and write the file.
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> ConfigResult<()> {
        let value = serde_json::to_value(value)?;
        self.modify(|map| {
            map.insert(key.to_string(), value);
            true
        })
        .map(|_| ())
    }

    /// Remove `key`; the file is only rewritten when it was present.
    pub fn erase(&self, key: &str) -> ConfigResult<bool> {
        self.modify(|map| map.remove(key).is_some())
    }

    /// Drop the cached contents so the next access re-reads the file.
    pub fn reload(&self) {
        *self.data.write().unwrap_or_else(|e| e.into_inner()) = None;
    }

    fn with_data<T>(&self, f: impl FnOnce(&Map<String, Value>) -> T) -> ConfigResult<T> {
        {
            let data = self.data.read().unwrap_or_else(|e| e.into_inner());
            if let Some(map) = data.as_ref() {
                return Ok(f(map));
            }
        }
        let mut data = self.data.write().unwrap_or_else(|e| e.into_inner());
        let map = self.ensure_loaded(&mut data)?;
        Ok(f(map))
    }

    fn modify(&self, f: impl FnOnce(&mut Map<String, Value>) -> bool) -> ConfigResult<bool> {
        let mut data = self.data.write().unwrap_or_else(|e| e.into_inner());
        let map = self.ensure_loaded(&mut data)?;
        let changed = f(map);
        if changed {
            write_json(&self.path, map)?;
        }
        Ok(changed)
    }

    fn ensure_loaded<'a>(
        &self,
        data: &'a mut Option<Map<String, Value>>,
    ) -> ConfigResult<&'a mut Map<String, Value>> {
        if data.is_none() {
            *data = Some(read_json(&self.path)?.unwrap_or_default());
        }
        Ok(data.get_or_insert_with(Map::new))
    }
}

impl std::fmt::Debug for PluginConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginConfig")
            .field("path", &self.path)
            .finish()
    }
}
