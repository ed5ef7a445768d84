//! Locating `.mcp.json` files contributed by enabled plugins.
//!
//! Lookup order per plugin key (`name@marketplace`), first hit wins:
//! 1. install path recorded in `installed_plugins.json`
//! 2. `<plugins>/marketplaces/<marketplace>/external_plugins/<name>/`
//! 3. `<plugins>/marketplaces/<marketplace>/plugins/<name>/`
//!
//! A registry entry whose install path is gone falls through to the
//! directory tiers. A file that cannot be read or parsed is skipped.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;
use sw_core::extract::{as_array, as_object, optional_str};
use sw_core::{ConfigFileKind, PluginInfo};

use crate::server::McpSource;

pub const REGISTRY_FILE: &str = "installed_plugins.json";
pub const PLUGIN_MCP_FILE: &str = ".mcp.json";

/// Recorded install paths keyed by `name@marketplace`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallRegistry {
    install_paths: BTreeMap<String, PathBuf>,
}

impl InstallRegistry {
    /// Parse registry JSON.
    ///
    /// Accepts both `plugins: {key: {installPath}}` and
    /// `plugins: {key: [{installPath}, ...]}`; for the list form the first
    /// entry with an install path wins.
    pub fn from_json(value: &Value) -> Self {
        let mut install_paths = BTreeMap::new();
        let Some(plugins) = as_object(value)
            .ok()
            .and_then(|root| root.get("plugins"))
            .and_then(Value::as_object)
        else {
            return Self::default();
        };

        for (key, entry) in plugins {
            let path = match entry {
                Value::Array(_) => as_array(entry)
                    .ok()
                    .into_iter()
                    .flatten()
                    .filter_map(|item| as_object(item).ok())
                    .find_map(|item| optional_str(item, "installPath")),
                _ => as_object(entry)
                    .ok()
                    .and_then(|item| optional_str(item, "installPath")),
            };
            match path {
                Some(path) => {
                    install_paths.insert(key.clone(), PathBuf::from(path));
                }
                None => tracing::debug!(plugin = %key, "registry entry without installPath"),
            }
        }

        Self { install_paths }
    }

    /// Load `<plugins_dir>/installed_plugins.json`.
    ///
    /// Returns an empty registry when the file does not exist.
    pub fn load(plugins_dir: &Path) -> Result<Self> {
        let path = plugins_dir.join(REGISTRY_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read plugin registry: {}", path.display()))?;
        let value: Value = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse plugin registry: {}", path.display()))?;
        Ok(Self::from_json(&value))
    }

    pub fn install_path(&self, key: &str) -> Option<&Path> {
        self.install_paths.get(key).map(PathBuf::as_path)
    }

    pub fn insert(&mut self, key: impl Into<String>, path: impl Into<PathBuf>) {
        self.install_paths.insert(key.into(), path.into());
    }
}

/// Where plugin lookups happen.
#[derive(Debug, Clone, Default)]
pub struct PluginLookup {
    pub plugins_dir: Option<PathBuf>,
    pub registry: InstallRegistry,
}

impl PluginLookup {
    /// Lookup rooted at `plugins_dir`, with the registry read from it.
    ///
    /// An unreadable registry is logged and treated as empty.
    pub fn from_plugins_dir(plugins_dir: impl Into<PathBuf>) -> Self {
        let plugins_dir = plugins_dir.into();
        let registry = InstallRegistry::load(&plugins_dir).unwrap_or_else(|e| {
            tracing::warn!("{e:#}");
            InstallRegistry::default()
        });
        Self {
            plugins_dir: Some(plugins_dir),
            registry,
        }
    }

    /// Candidate plugin directories in tier order.
    pub fn candidate_dirs(&self, plugin: &PluginInfo) -> Vec<PathBuf> {
        let mut candidates = Vec::with_capacity(3);
        if let Some(path) = self.registry.install_path(&plugin.key) {
            candidates.push(path.to_path_buf());
        }
        if let Some(root) = &self.plugins_dir {
            let marketplace = root.join("marketplaces").join(&plugin.marketplace);
            candidates.push(marketplace.join("external_plugins").join(&plugin.name));
            candidates.push(marketplace.join("plugins").join(&plugin.name));
        }
        candidates
    }

    /// The plugin's `.mcp.json`, from the first tier that has a parseable one.
    pub fn find_plugin_mcp(&self, plugin: &PluginInfo) -> Option<McpSource> {
        self.candidate_dirs(plugin).into_iter().find_map(|dir| {
            let path = dir.join(PLUGIN_MCP_FILE);
            match read_plugin_mcp(&path) {
                Ok(Some(content)) => Some(McpSource {
                    scope: plugin.scope,
                    kind: ConfigFileKind::Mcp,
                    path,
                    content,
                    plugin: Some(plugin.key.clone()),
                }),
                Ok(None) => None,
                Err(e) => {
                    tracing::warn!(plugin = %plugin.key, "{e:#}");
                    None
                }
            }
        })
    }

    /// MCP sources of every enabled plugin.
    pub fn plugin_sources(&self, plugins: &[PluginInfo]) -> Vec<McpSource> {
        plugins
            .iter()
            .filter(|plugin| plugin.enabled)
            .filter_map(|plugin| {
                let found = self.find_plugin_mcp(plugin);
                if found.is_none() {
                    tracing::debug!(plugin = %plugin.key, "no .mcp.json in any lookup tier");
                }
                found
            })
            .collect()
    }
}

/// `Ok(None)` when the file is absent; `Err` when present but unusable.
fn read_plugin_mcp(path: &Path) -> Result<Option<Value>> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to read {}", path.display()));
        }
    };
    let value = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(Some(value))
}

#[cfg(test)]
#[path = "plugins_tests.rs"]
mod tests;
