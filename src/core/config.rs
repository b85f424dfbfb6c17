/// User configuration (.tilrc)
///
/// Looked up in the workspace first, then the home directory. Written as
/// TOML; plain INI files (`key = value`, unquoted) are read as well.
///
/// ```toml
/// [general]
/// default_category = "rust"
/// default_link_tag = "reading"
///
/// [git]
/// remote = "origin"
/// branch = "main"
///
/// [schedule]
/// entrypoint = "til"
/// ```

use crate::core::WorkspaceContext;
use crate::error::Result;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const TILRC_FILE: &str = ".tilrc";

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct TilConfig {
    pub general: GeneralConfig,
    pub git: GitConfig,
    pub schedule: ScheduleSettings,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeneralConfig {
    pub default_category: Option<String>,
    pub default_link_tag: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct GitConfig {
    pub remote: String,
    pub branch: String,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            remote: "origin".to_string(),
            branch: "main".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScheduleSettings {
    /// Command the scheduled job runs (`<entrypoint> auto run`)
    pub entrypoint: String,
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        Self {
            entrypoint: "til".to_string(),
        }
    }
}

impl TilConfig {
    /// Load the first .tilrc found, workspace before home
    ///
    /// A missing file yields defaults; a malformed one is an error.
    pub fn load(ctx: &WorkspaceContext) -> Result<Self> {
        let candidates = Self::candidate_paths(ctx, dirs::home_dir());
        Self::load_from(&candidates)
    }

    fn candidate_paths(ctx: &WorkspaceContext, home: Option<PathBuf>) -> Vec<PathBuf> {
        let mut paths = vec![ctx.join(TILRC_FILE)];
        if let Some(home) = home {
            paths.push(home.join(TILRC_FILE));
        }
        paths
    }

    fn load_from(candidates: &[PathBuf]) -> Result<Self> {
        for path in candidates {
            if path.is_file() {
                tracing::debug!("Loading settings from {}", path.display());
                return Self::parse_file(path);
            }
        }
        Ok(Self::default())
    }

    /// Like [`load`](Self::load), but a broken file only costs a warning
    pub fn load_or_default(ctx: &WorkspaceContext) -> Self {
        Self::load(ctx).unwrap_or_else(|e| {
            tracing::warn!("Ignoring unreadable .tilrc, using defaults: {}", e);
            Self::default()
        })
    }

    fn parse_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse_str(&content)
    }

    // TOML first, then INI; when both fail the TOML error is reported
    fn parse_str(content: &str) -> Result<Self> {
        match toml::from_str(content) {
            Ok(config) => Ok(config),
            Err(toml_error) => match Self::from_ini(content) {
                Some(config) => Ok(config),
                None => Err(toml_error.into()),
            },
        }
    }

    fn from_ini(content: &str) -> Option<Self> {
        let ini = ini::Ini::load_from_str(content)
            .map_err(|e| tracing::debug!("Not an INI file either: {}", e))
            .ok()?;

        let get = |section: &str, key: &str| {
            ini.get_from(Some(section), key)
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        };

        let mut config = Self::default();
        config.general.default_category = get("general", "default_category");
        config.general.default_link_tag = get("general", "default_link_tag");
        if let Some(remote) = get("git", "remote") {
            config.git.remote = remote;
        }
        if let Some(branch) = get("git", "branch") {
            config.git.branch = branch;
        }
        if let Some(entrypoint) = get("schedule", "entrypoint") {
            config.schedule.entrypoint = entrypoint;
        }
        Some(config)
    }
}
