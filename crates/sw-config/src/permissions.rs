//! Permission rule resolution.
//!
//! Entries are grouped by their exact `(tool, pattern)` pair. Within a group
//! the rule is compared before the scope, so a `deny` anywhere beats an
//! `allow` or `ask` everywhere.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;
use sw_core::extract::{object_field, objects_of_kind, string_items};
use sw_core::{ConfigFile, ConfigFileKind, PermissionRule, Scope, compare_permission};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionEntry {
    pub tool: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    pub rule: PermissionRule,
    pub scope: Scope,
    pub source_path: PathBuf,
    /// The string as written in the settings file.
    pub raw: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectivePermission {
    pub tool: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    pub effective_rule: PermissionRule,
    pub effective_scope: Scope,
    pub effective_source_path: PathBuf,
    /// The whole group, strongest first.
    pub overrides: Vec<PermissionEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PermissionsResult {
    pub all: Vec<PermissionEntry>,
    pub effective: Vec<EffectivePermission>,
}

impl PermissionsResult {
    pub fn find(&self, tool: &str, pattern: Option<&str>) -> Option<&EffectivePermission> {
        self.effective
            .iter()
            .find(|perm| perm.tool == tool && perm.pattern.as_deref() == pattern)
    }
}

/// Splits `tool` or `tool(pattern)`.
///
/// The pattern runs from the first `(` to the final `)`, so nested
/// parentheses and quoted arguments survive intact. An empty pattern is the
/// same as no pattern. Returns `None` for blank input.
pub fn parse_rule(raw: &str) -> Option<(String, Option<String>)> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let (Some(open), true) = (trimmed.find('('), trimmed.ends_with(')')) {
        let tool = trimmed[..open].trim();
        if tool.is_empty() {
            return None;
        }
        let pattern = &trimmed[open + 1..trimmed.len() - 1];
        let pattern = (!pattern.is_empty()).then(|| pattern.to_string());
        return Some((tool.to_string(), pattern));
    }

    Some((trimmed.to_string(), None))
}

/// Reads `permissions.{allow,deny,ask}` from one settings object.
fn entries_of(file: &ConfigFile, object: &sw_core::JsonObject) -> Vec<PermissionEntry> {
    let permissions = match object_field(object, "permissions") {
        Ok(permissions) => permissions,
        Err(reason) => {
            tracing::trace!(
                path = %file.expected_path.display(),
                %reason,
                "no permissions block"
            );
            return Vec::new();
        }
    };

    let mut entries = Vec::new();
    for rule in PermissionRule::ALL {
        let Some(list) = permissions.get(rule.as_str()) else {
            continue;
        };
        for raw in string_items(list) {
            let Some((tool, pattern)) = parse_rule(&raw) else {
                tracing::debug!(
                    path = %file.expected_path.display(),
                    "skipping blank permission rule"
                );
                continue;
            };
            entries.push(PermissionEntry {
                tool,
                pattern,
                rule,
                scope: file.scope,
                source_path: file.expected_path.clone(),
                raw,
            });
        }
    }
    entries
}

pub fn resolve_permissions(files: &[ConfigFile]) -> PermissionsResult {
    let all: Vec<PermissionEntry> = objects_of_kind(files, ConfigFileKind::Settings)
        .flat_map(|(file, object)| entries_of(file, object))
        .collect();

    let mut groups: BTreeMap<(String, Option<String>), Vec<PermissionEntry>> = BTreeMap::new();
    for entry in &all {
        groups
            .entry((entry.tool.clone(), entry.pattern.clone()))
            .or_default()
            .push(entry.clone());
    }

    let effective = groups
        .into_iter()
        .filter_map(|((tool, pattern), mut overrides)| {
            overrides.sort_by(|a, b| compare_permission((a.rule, a.scope), (b.rule, b.scope)));
            let head = overrides.first()?;
            let (effective_rule, effective_scope) = (head.rule, head.scope);
            let effective_source_path = head.source_path.clone();
            Some(EffectivePermission {
                tool,
                pattern,
                effective_rule,
                effective_scope,
                effective_source_path,
                overrides,
            })
        })
        .collect();

    PermissionsResult { all, effective }
}

#[cfg(test)]
#[path = "permissions_tests.rs"]
mod tests;
