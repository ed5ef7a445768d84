//! Slash commands and skills.
//!
//! Layout per scope:
//! - `commands/<name>.md`            → command `<name>`
//! - `commands/<dir>/<name>.md`      → skill `<dir>:<name>`
//! - `skills/<name>/SKILL.md`        → skill `<name>`
//!
//! Installed and enabled plugins add their own `commands/` and `skills/`
//! trees, namespaced `<plugin>:<name>` (nested commands become
//! `<plugin>:<dir>:<name>`). Inside one plugin a command shadows a skill of
//! the same name.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use sw_core::{PluginInfo, Scope, ScopedDir};

use crate::frontmatter;

const MARKDOWN_EXT: &str = "md";
const SKILL_FILE: &str = "SKILL.md";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandSource {
    Command,
    Skill,
    Plugin,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandEntry {
    pub name: String,
    pub path: PathBuf,
    pub scope: Scope,
    pub source: CommandSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plugin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CommandsResult {
    pub commands: Vec<CommandEntry>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CommandsOptions {
    /// Attach the full file text to each entry.
    pub include_content: bool,
}

/// Where commands and skills are looked up.
#[derive(Debug, Clone, Default)]
pub struct CommandsInput<'a> {
    pub command_dirs: &'a [ScopedDir],
    pub skill_dirs: &'a [ScopedDir],
    pub plugins: &'a [PluginInfo],
}

fn is_markdown(path: &Path) -> bool {
    path.extension().and_then(|ext| ext.to_str()) == Some(MARKDOWN_EXT)
}

fn file_stem(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::to_string)
}

/// Sorted directory listing; a missing or unreadable directory is empty.
fn list_dir(dir: &Path) -> Vec<PathBuf> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
        Err(e) => {
            tracing::warn!(dir = %dir.display(), error = %e, "failed to list directory");
            return Vec::new();
        }
    };
    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .collect();
    paths.sort();
    paths
}

fn build_entry(
    name: String,
    path: PathBuf,
    scope: Scope,
    source: CommandSource,
    opts: CommandsOptions,
) -> CommandEntry {
    let size_bytes = fs::metadata(&path).ok().map(|meta| meta.len());
    let text = match fs::read_to_string(&path) {
        Ok(text) => Some(text),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "command file unreadable");
            None
        }
    };
    let description = text
        .as_deref()
        .and_then(|text| frontmatter::parse(text).get("description").map(str::to_string));
    CommandEntry {
        name,
        path,
        scope,
        source,
        plugin: None,
        description,
        content: if opts.include_content { text } else { None },
        size_bytes,
    }
}

/// `<name>.md` files become commands, `<dir>/<name>.md` become `dir:name` skills.
pub fn scan_commands_dir(dir: &ScopedDir, opts: CommandsOptions) -> Vec<CommandEntry> {
    let mut entries = Vec::new();
    for path in list_dir(&dir.path) {
        if path.is_file() && is_markdown(&path) {
            if let Some(name) = file_stem(&path) {
                entries.push(build_entry(name, path, dir.scope, CommandSource::Command, opts));
            }
        } else if path.is_dir() {
            let Some(namespace) = path.file_name().and_then(|n| n.to_str()).map(str::to_string)
            else {
                continue;
            };
            for nested in list_dir(&path) {
                if !(nested.is_file() && is_markdown(&nested)) {
                    continue;
                }
                if let Some(stem) = file_stem(&nested) {
                    let name = format!("{namespace}:{stem}");
                    entries.push(build_entry(name, nested, dir.scope, CommandSource::Skill, opts));
                }
            }
        }
    }
    entries
}

/// `<name>/SKILL.md` directories become skills named `<name>`.
pub fn scan_skills_dir(dir: &ScopedDir, opts: CommandsOptions) -> Vec<CommandEntry> {
    list_dir(&dir.path)
        .into_iter()
        .filter(|path| path.is_dir())
        .filter_map(|skill_dir| {
            let skill_md = skill_dir.join(SKILL_FILE);
            if !skill_md.is_file() {
                return None;
            }
            let name = skill_dir.file_name()?.to_str()?.to_string();
            Some(build_entry(name, skill_md, dir.scope, CommandSource::Skill, opts))
        })
        .collect()
}

/// Commands and skills of one installed, enabled plugin.
pub fn scan_plugin(plugin: &PluginInfo, opts: CommandsOptions) -> Vec<CommandEntry> {
    let Some(plugin_dir) = plugin.plugin_dir.as_deref() else {
        tracing::debug!(plugin = %plugin.key, "plugin has no directory");
        return Vec::new();
    };
    let commands_dir = ScopedDir::new(plugin.scope, plugin_dir.join("commands"));
    let skills_dir = ScopedDir::new(plugin.scope, plugin_dir.join("skills"));
    let commands = scan_commands_dir(&commands_dir, opts);
    let skills = scan_skills_dir(&skills_dir, opts);

    let mut seen: BTreeSet<String> = BTreeSet::new();
    let mut entries = Vec::new();
    for mut entry in commands.into_iter().chain(skills) {
        if !seen.insert(entry.name.clone()) {
            tracing::debug!(
                plugin = %plugin.key,
                name = %entry.name,
                "skill shadowed by command of the same name"
            );
            continue;
        }
        entry.name = format!("{}:{}", plugin.name, entry.name);
        entry.source = CommandSource::Plugin;
        entry.plugin = Some(plugin.key.clone());
        entries.push(entry);
    }
    entries
}

pub fn resolve_commands(input: &CommandsInput<'_>, opts: CommandsOptions) -> CommandsResult {
    let mut commands: Vec<CommandEntry> = Vec::new();
    for dir in input.command_dirs {
        commands.extend(scan_commands_dir(dir, opts));
    }
    for dir in input.skill_dirs {
        commands.extend(scan_skills_dir(dir, opts));
    }
    for plugin in input.plugins.iter().filter(|p| p.installed && p.enabled) {
        commands.extend(scan_plugin(plugin, opts));
    }

    commands.sort_by(|a, b| {
        a.scope
            .listing_rank()
            .cmp(&b.scope.listing_rank())
            .then_with(|| a.name.cmp(&b.name))
    });
    CommandsResult { commands }
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
