//! Additive hook cataloging.
//!
//! Hooks are never merged: every scope that configures an event keeps its
//! own record, because all of them fire.

use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::Serialize;
use serde_json::Value;
use sw_core::extract::{as_array, as_object, object_field, objects_of_kind, optional_str};
use sw_core::{ConfigFile, ConfigFileKind, JsonObject, Scope, compare_scope_desc};

use crate::event::{KnownEvent, available_events};

const DEFAULT_HOOK_TYPE: &str = "command";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HookCommand {
    #[serde(rename = "type")]
    pub hook_type: String,
    pub command: String,
    #[serde(rename = "async", skip_serializing_if = "Option::is_none")]
    pub run_async: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HookMatcher {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matcher: Option<String>,
    pub hooks: Vec<HookCommand>,
}

/// One event as configured by one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HookEvent {
    pub event: String,
    pub scope: Scope,
    pub source_path: PathBuf,
    pub matchers: Vec<HookMatcher>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HooksResult {
    pub events: Vec<HookEvent>,
    pub available_events: Vec<String>,
    /// Every event name with at least one record, sorted, custom names included.
    pub configured_events: Vec<String>,
    /// Catalog events with no record, in catalog order.
    pub unconfigured_events: Vec<String>,
}

impl Default for HooksResult {
    fn default() -> Self {
        Self {
            events: Vec::new(),
            available_events: available_events(),
            configured_events: Vec::new(),
            unconfigured_events: available_events(),
        }
    }
}

impl HooksResult {
    pub fn records_for<'a>(&'a self, event: &'a str) -> impl Iterator<Item = &'a HookEvent> + 'a {
        self.events.iter().filter(move |record| record.event == event)
    }
}

fn parse_hook_command(value: &Value) -> Option<HookCommand> {
    let object = as_object(value).ok()?;
    let command = optional_str(object, "command")?;
    Some(HookCommand {
        hook_type: optional_str(object, "type").unwrap_or_else(|| DEFAULT_HOOK_TYPE.to_string()),
        command,
        run_async: object.get("async").and_then(Value::as_bool),
        timeout: object.get("timeout").and_then(Value::as_u64),
    })
}

fn parse_matcher(value: &Value) -> Option<HookMatcher> {
    let object = as_object(value).ok()?;
    let hooks: Vec<HookCommand> = object
        .get("hooks")
        .and_then(|hooks| as_array(hooks).ok())
        .into_iter()
        .flatten()
        .filter_map(parse_hook_command)
        .collect();
    if hooks.is_empty() {
        return None;
    }
    Some(HookMatcher {
        matcher: optional_str(object, "matcher"),
        hooks,
    })
}

fn events_of(file: &ConfigFile, object: &JsonObject) -> Vec<HookEvent> {
    let Ok(hooks) = object_field(object, "hooks") else {
        return Vec::new();
    };

    hooks
        .iter()
        .filter_map(|(event, matchers)| {
            let matchers: Vec<HookMatcher> = match as_array(matchers) {
                Ok(items) => items.iter().filter_map(parse_matcher).collect(),
                Err(reason) => {
                    tracing::debug!(
                        event = %event,
                        path = %file.expected_path.display(),
                        %reason,
                        "skipping malformed hook event"
                    );
                    return None;
                }
            };
            if matchers.is_empty() {
                return None;
            }
            Some(HookEvent {
                event: event.clone(),
                scope: file.scope,
                source_path: file.expected_path.clone(),
                matchers,
            })
        })
        .collect()
}

pub fn resolve_hooks(files: &[ConfigFile]) -> HooksResult {
    let mut events: Vec<HookEvent> = objects_of_kind(files, ConfigFileKind::Settings)
        .flat_map(|(file, object)| events_of(file, object))
        .collect();
    events.sort_by(|a, b| {
        compare_scope_desc(a.scope, b.scope)
            .then_with(|| a.event.cmp(&b.event))
            .then_with(|| a.source_path.cmp(&b.source_path))
    });

    let configured: BTreeSet<&str> = events.iter().map(|record| record.event.as_str()).collect();
    let unconfigured_events = KnownEvent::ALL
        .iter()
        .map(KnownEvent::as_str)
        .filter(|name| !configured.contains(name))
        .map(str::to_string)
        .collect();
    let configured_events = configured.into_iter().map(str::to_string).collect();

    HooksResult {
        events,
        available_events: available_events(),
        configured_events,
        unconfigured_events,
    }
}

/// Event names in `result` that are not in the catalog.
pub fn custom_events(result: &HooksResult) -> Vec<&str> {
    result
        .configured_events
        .iter()
        .map(String::as_str)
        .filter(|name| KnownEvent::from_name(name).is_none())
        .collect()
}

#[cfg(test)]
#[path = "hooks_tests.rs"]
mod tests;
