//! The scanner snapshot the CLI resolves.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use sw_core::{ConfigFile, PluginInfo, ScopedDir};

const STDIN_PATH: &str = "-";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Snapshot {
    #[serde(default)]
    pub files: Vec<ConfigFile>,
    #[serde(default)]
    pub plugins: Vec<PluginInfo>,
    #[serde(default)]
    pub command_dirs: Vec<ScopedDir>,
    #[serde(default)]
    pub skill_dirs: Vec<ScopedDir>,
}

impl Snapshot {
    /// Reads a snapshot from `path`, or from stdin when `path` is `-`.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = if path.as_os_str() == STDIN_PATH {
            let mut raw = String::new();
            std::io::stdin()
                .read_to_string(&mut raw)
                .context("Failed to read snapshot from stdin")?;
            raw
        } else {
            std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read snapshot: {}", path.display()))?
        };
        let snapshot = Self::from_json(&raw)
            .with_context(|| format!("Failed to parse snapshot: {}", path.display()))?;
        tracing::debug!(
            files = snapshot.files.len(),
            plugins = snapshot.plugins.len(),
            "loaded snapshot"
        );
        Ok(snapshot)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}
