use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;
use serde_json::Value;
use sw_core::extract::{as_object, optional_str, string_items, string_map};
use sw_core::{ConfigFileKind, JsonObject, Scope};

use crate::mask::{mask_env, mask_headers};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum McpServerType {
    Command,
    Http,
}

/// One server definition at one location. Secrets are already masked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct McpServer {
    pub name: String,
    pub scope: Scope,
    pub source_path: PathBuf,
    #[serde(rename = "type")]
    pub server_type: McpServerType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub args: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub env: Option<BTreeMap<String, String>>,
    /// `name@marketplace` of the plugin that contributed this server.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plugin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_duplicate: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct McpLocation {
    pub scope: Scope,
    pub source_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct McpDuplicate {
    pub name: String,
    /// Highest priority first; the head is the one that runs.
    pub locations: Vec<McpLocation>,
}

/// A parsed file that may define MCP servers.
#[derive(Debug, Clone, PartialEq)]
pub struct McpSource {
    pub scope: Scope,
    pub kind: ConfigFileKind,
    pub path: PathBuf,
    pub content: Value,
    pub plugin: Option<String>,
}

/// The `{name: spec}` map of a source.
///
/// An object-valued `mcpServers` key means the wrapped shape. Otherwise an
/// `mcp` file is read as the direct shape; a settings file has no servers.
fn server_map(source: &McpSource) -> Option<&JsonObject> {
    let object = as_object(&source.content).ok()?;
    match object.get("mcpServers").and_then(Value::as_object) {
        Some(wrapped) => Some(wrapped),
        None if source.kind == ConfigFileKind::Mcp => Some(object),
        None => None,
    }
}

pub(crate) fn infer_type(spec: &JsonObject) -> McpServerType {
    if spec.get("command").is_some_and(Value::is_string) {
        return McpServerType::Command;
    }
    let explicit_http = spec.get("type").and_then(Value::as_str) == Some("http");
    if explicit_http || spec.contains_key("url") {
        return McpServerType::Http;
    }
    McpServerType::Command
}

fn server_from_spec(source: &McpSource, name: &str, spec: &JsonObject) -> McpServer {
    McpServer {
        name: name.to_string(),
        scope: source.scope,
        source_path: source.path.clone(),
        server_type: infer_type(spec),
        command: optional_str(spec, "command"),
        args: spec.get("args").map(string_items),
        url: optional_str(spec, "url"),
        headers: spec.get("headers").map(|h| mask_headers(string_map(h))),
        env: spec.get("env").map(|e| mask_env(string_map(e))),
        plugin: source.plugin.clone(),
        is_duplicate: None,
        is_active: None,
    }
}

/// Every well-formed server defined by a source; malformed specs are skipped.
pub fn extract_servers(source: &McpSource) -> Vec<McpServer> {
    let Some(servers) = server_map(source) else {
        return Vec::new();
    };
    servers
        .iter()
        .filter_map(|(name, spec)| match as_object(spec) {
            Ok(spec) => Some(server_from_spec(source, name, spec)),
            Err(reason) => {
                tracing::debug!(
                    server = %name,
                    path = %source.path.display(),
                    %reason,
                    "skipping malformed MCP server"
                );
                None
            }
        })
        .collect()
}
