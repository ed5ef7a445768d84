//! scopewise's own configuration (`~/.config/scopewise/config.toml`).
//!
//! Only controls where resolvers look on disk and how results are printed;
//! it never changes resolution semantics.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use sw_core::OutputFormat;

pub const APP_NAME: &str = "scopewise";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GlobalConfig {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub commands: CommandsConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PathsConfig {
    /// Home directory used for `~/` imports. None = detect.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_dir: Option<PathBuf>,
    /// Plugin root holding `installed_plugins.json` and `marketplaces/`.
    /// None = `<home>/.claude/plugins`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugins_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommandsConfig {
    /// Attach the full Markdown body to each command entry.
    #[serde(default)]
    pub include_content: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
}

impl GlobalConfig {
    /// Load from the default location.
    ///
    /// Returns `Default` if the file does not exist or if the config
    /// directory cannot be determined (e.g., no HOME in containers).
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) => Self::load_from_path(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load from an explicit path. A missing file yields defaults.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scopewise config: {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse scopewise config: {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded scopewise config");
        Ok(config)
    }

    pub fn config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", APP_NAME)
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Configured home, falling back to the detected one.
    pub fn home_dir(&self) -> Option<PathBuf> {
        self.paths.home_dir.clone().or_else(sw_core::paths::home_dir)
    }

    /// Configured plugin root, falling back to `<home>/.claude/plugins`.
    pub fn plugins_dir(&self) -> Option<PathBuf> {
        if let Some(dir) = &self.paths.plugins_dir {
            return Some(dir.clone());
        }
        self.home_dir()
            .map(|home| sw_core::paths::default_plugins_dir(&home))
    }
}
