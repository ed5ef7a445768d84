//! Last-scope-wins resolution of top-level settings keys.
//!
//! Values are opaque: an object-valued key is taken wholesale from the
//! winning scope and never deep-merged with lower scopes.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;
use serde_json::Value;
use sw_core::extract::objects_of_kind;
use sw_core::{ConfigFile, ConfigFileKind, Scope, compare_scope_desc};

/// One scope's contribution to a key.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingOverride {
    pub scope: Scope,
    pub path: PathBuf,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedSetting {
    pub key: String,
    pub effective_value: Value,
    pub effective_scope: Scope,
    pub effective_source_path: PathBuf,
    /// Every contributor, highest priority first. The head is the effective value.
    pub overrides: Vec<SettingOverride>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SettingsResult {
    pub settings: Vec<ResolvedSetting>,
}

impl SettingsResult {
    pub fn get(&self, key: &str) -> Option<&ResolvedSetting> {
        self.settings
            .binary_search_by(|setting| setting.key.as_str().cmp(key))
            .ok()
            .map(|idx| &self.settings[idx])
    }
}

/// Resolve every top-level key across the usable settings files.
///
/// Output is sorted by key. Contributors with equal scope keep input order.
pub fn resolve_settings(files: &[ConfigFile]) -> SettingsResult {
    let mut by_key: BTreeMap<String, Vec<SettingOverride>> = BTreeMap::new();

    for (file, object) in objects_of_kind(files, ConfigFileKind::Settings) {
        for (key, value) in object {
            by_key.entry(key.clone()).or_default().push(SettingOverride {
                scope: file.scope,
                path: file.expected_path.clone(),
                value: value.clone(),
            });
        }
    }

    let settings = by_key
        .into_iter()
        .filter_map(|(key, mut overrides)| {
            overrides.sort_by(|a, b| compare_scope_desc(a.scope, b.scope));
            let winner = overrides.first()?.clone();
            Some(ResolvedSetting {
                key,
                effective_value: winner.value,
                effective_scope: winner.scope,
                effective_source_path: winner.path,
                overrides,
            })
        })
        .collect();

    SettingsResult { settings }
}

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;
