use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::scope::Scope;

/// What a scanned file holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigFileKind {
    /// `settings.json` style object (settings, permissions, hooks, wrapped MCP servers).
    Settings,
    /// `.mcp.json` style object, direct or wrapped.
    Mcp,
    /// Markdown memory file (`CLAUDE.md` and friends).
    Memory,
    /// Any other record the scanner emits; ignored by every resolver.
    #[serde(other)]
    Other,
}

/// One expected configuration location, as produced by the external scanner.
///
/// Immutable for the duration of a resolver call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigFile {
    pub scope: Scope,
    #[serde(rename = "type")]
    pub kind: ConfigFileKind,
    pub expected_path: PathBuf,
    #[serde(default)]
    pub exists: bool,
    #[serde(default)]
    pub readable: bool,
    /// Parsed JSON object for structured files, a string for memory files.
    #[serde(default)]
    pub content: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ConfigFile {
    /// An existing, readable file of the given kind.
    pub fn loaded(
        scope: Scope,
        kind: ConfigFileKind,
        path: impl Into<PathBuf>,
        content: serde_json::Value,
    ) -> Self {
        Self {
            scope,
            kind,
            expected_path: path.into(),
            exists: true,
            readable: true,
            content,
            size_bytes: None,
            error: None,
        }
    }

    /// A location the scanner checked but found nothing at.
    pub fn missing(scope: Scope, kind: ConfigFileKind, path: impl Into<PathBuf>) -> Self {
        Self {
            scope,
            kind,
            expected_path: path.into(),
            exists: false,
            readable: false,
            content: serde_json::Value::Null,
            size_bytes: None,
            error: None,
        }
    }

    /// True when the file exists, was readable and carries no scanner error.
    pub fn is_usable(&self) -> bool {
        self.exists && self.readable && self.error.is_none()
    }
}

/// One plugin from the marketplace/registry feed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginInfo {
    pub name: String,
    pub marketplace: String,
    /// `name@marketplace`
    pub key: String,
    pub scope: Scope,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub installed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugin_dir: Option<PathBuf>,
}

impl PluginInfo {
    /// Builds a feed entry from a `name@marketplace` key.
    ///
    /// Returns `None` when the key has no `@` separator.
    pub fn from_key(key: &str, scope: Scope) -> Option<Self> {
        let (name, marketplace) = key.split_once('@')?;
        if name.is_empty() || marketplace.is_empty() {
            return None;
        }
        Some(Self {
            name: name.to_string(),
            marketplace: marketplace.to_string(),
            key: key.to_string(),
            scope,
            enabled: true,
            installed: true,
            plugin_dir: None,
        })
    }
}

/// A directory tagged with the scope it was found under.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopedDir {
    pub scope: Scope,
    pub path: PathBuf,
}

impl ScopedDir {
    pub fn new(scope: Scope, path: impl Into<PathBuf>) -> Self {
        Self {
            scope,
            path: path.into(),
        }
    }
}

/// Output format for CLI responses
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}
