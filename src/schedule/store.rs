/// Persisted auto-git settings
///
/// A JSON object stored in `.auto_git_config.json` at the workspace root.
/// The `auto_git` key holds the schedule; other keys are left alone.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

pub const AUTO_GIT_KEY: &str = "auto_git";

/// The schedule section as written by `setup`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    pub enabled: bool,
    pub time: String,
    pub message: Option<String>,
    pub created_at: String,
}

/// Lenient view of whatever is stored under `auto_git`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct StoredSection {
    pub enabled: Option<bool>,
    pub time: Option<String>,
    pub message: Option<String>,
    pub created_at: Option<String>,
}

/// Read-modify-write access to the config file
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Open the store, creating `{}` on disk if the file is missing
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let store = Self {
            path: path.as_ref().to_path_buf(),
        };

        if !store.path.exists() {
            store.save(&Map::new())?;
        }

        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current document; unreadable or non-object content reads as `{}`
    pub fn load(&self) -> Map<String, Value> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                tracing::debug!("Could not read {}: {}", self.path.display(), e);
                return Map::new();
            }
        };

        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(map)) => map,
            Ok(_) | Err(_) => {
                tracing::warn!(
                    "Ignoring malformed config file {}",
                    self.path.display()
                );
                Map::new()
            }
        }
    }

    pub fn save(&self, document: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(document)?;
        fs::write(&self.path, json)?;
        Ok(())
    }

    pub(crate) fn section(&self) -> Option<StoredSection> {
        let value = self.load().remove(AUTO_GIT_KEY)?;
        match serde_json::from_value(value) {
            Ok(section) => Some(section),
            Err(e) => {
                tracing::warn!("Malformed '{}' section: {}", AUTO_GIT_KEY, e);
                Some(StoredSection::default())
            }
        }
    }

    pub fn write_schedule(&self, config: &ScheduleConfig) -> Result<()> {
        let mut document = self.load();
        document.insert(AUTO_GIT_KEY.to_string(), serde_json::to_value(config)?);
        self.save(&document)
    }

    /// Drop the schedule section; returns whether one existed
    pub fn clear_schedule(&self) -> Result<bool> {
        let mut document = self.load();
        if document.remove(AUTO_GIT_KEY).is_none() {
            return Ok(false);
        }
        self.save(&document)?;
        Ok(true)
    }
}
