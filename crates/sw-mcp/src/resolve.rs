use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::PathBuf;

use serde::Serialize;
use sw_core::paths::normalize_path;
use sw_core::{ConfigFile, ConfigFileKind, PluginInfo, compare_scope_desc};

use crate::plugins::PluginLookup;
use crate::server::{McpDuplicate, McpLocation, McpServer, McpSource, extract_servers};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct McpResult {
    pub servers: Vec<McpServer>,
    pub duplicates: Vec<McpDuplicate>,
}

impl McpResult {
    /// The instance of `name` that actually runs.
    pub fn active(&self, name: &str) -> Option<&McpServer> {
        self.servers
            .iter()
            .find(|server| server.name == name && server.is_active != Some(false))
    }
}

/// Sources from usable `mcp` and `settings` files.
pub fn sources_from_files(files: &[ConfigFile]) -> Vec<McpSource> {
    files
        .iter()
        .filter(|file| matches!(file.kind, ConfigFileKind::Mcp | ConfigFileKind::Settings))
        .filter(|file| file.is_usable() && file.content.is_object())
        .map(|file| McpSource {
            scope: file.scope,
            kind: file.kind,
            path: file.expected_path.clone(),
            content: file.content.clone(),
            plugin: None,
        })
        .collect()
}

/// Drops repeated paths, keeping the highest-scope occurrence.
///
/// The same file can be scanned under two scope labels (the user-home
/// settings file is the usual case); only one of them may contribute.
pub fn dedup_by_path(sources: Vec<McpSource>) -> Vec<McpSource> {
    let mut kept: Vec<McpSource> = Vec::with_capacity(sources.len());
    let mut index: HashMap<PathBuf, usize> = HashMap::new();

    for source in sources {
        let key = normalize_path(&source.path);
        match index.get(&key) {
            Some(&idx) => {
                if source.scope.priority() > kept[idx].scope.priority() {
                    tracing::debug!(
                        path = %key.display(),
                        dropped = %kept[idx].scope,
                        kept = %source.scope,
                        "same path scanned under two scopes"
                    );
                    kept[idx] = source;
                }
            }
            None => {
                index.insert(key, kept.len());
                kept.push(source);
            }
        }
    }
    kept
}

fn sort_servers(servers: &mut [McpServer]) {
    servers.sort_by(|a, b| {
        compare_scope_desc(a.scope, b.scope)
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.source_path.cmp(&b.source_path))
    });
}

/// Flags every instance of a multiply-defined name and marks the first one,
/// in priority order, as active. `servers` must already be sorted.
fn annotate_duplicates(servers: &mut [McpServer]) -> Vec<McpDuplicate> {
    let mut locations: BTreeMap<String, Vec<McpLocation>> = BTreeMap::new();
    for server in servers.iter() {
        let entry = locations.entry(server.name.clone()).or_default();
        let location = McpLocation {
            scope: server.scope,
            source_path: server.source_path.clone(),
        };
        if !entry.contains(&location) {
            entry.push(location);
        }
    }
    locations.retain(|_, locs| locs.len() >= 2);

    let mut seen: HashSet<String> = HashSet::new();
    for server in servers.iter_mut() {
        if !locations.contains_key(&server.name) {
            continue;
        }
        let first = seen.insert(server.name.clone());
        server.is_duplicate = Some(true);
        server.is_active = Some(first);
    }

    locations
        .into_iter()
        .map(|(name, mut locations)| {
            locations.sort_by(|a, b| {
                compare_scope_desc(a.scope, b.scope)
                    .then_with(|| a.source_path.cmp(&b.source_path))
            });
            McpDuplicate { name, locations }
        })
        .collect()
}

/// Resolve servers from already-built sources.
///
/// Pure: no filesystem access happens here.
pub fn resolve_sources(sources: Vec<McpSource>) -> McpResult {
    let mut servers: Vec<McpServer> = dedup_by_path(sources)
        .iter()
        .flat_map(extract_servers)
        .collect();
    sort_servers(&mut servers);
    let duplicates = annotate_duplicates(&mut servers);
    McpResult {
        servers,
        duplicates,
    }
}

/// Resolve MCP servers from scanned files plus enabled plugins.
pub fn resolve_mcp(
    files: &[ConfigFile],
    plugins: &[PluginInfo],
    lookup: &PluginLookup,
) -> McpResult {
    let mut sources = sources_from_files(files);
    sources.extend(lookup.plugin_sources(plugins));
    resolve_sources(sources)
}

#[cfg(test)]
#[path = "resolve_tests.rs"]
mod tests;
