//! Plain-text rendering of resolver results.
//!
//! JSON output is the serialized result structs; text output is a compact
//! aligned listing meant for terminals.

use anyhow::Result;
use serde::Serialize;
use serde_json::Value;
use sw_config::{PermissionsResult, SettingsResult};
use sw_core::OutputFormat;
use sw_hooks::{CommandsResult, HooksResult};
use sw_mcp::{McpResult, McpServer, McpServerType};
use sw_memory::MemoryImportResult;

use crate::resolve_cmds::{AllReport, FilesReport};

/// Prints `value` as pretty JSON or through its text renderer.
pub(crate) fn emit<T: Serialize>(
    value: &T,
    format: OutputFormat,
    text: impl FnOnce(&T) -> String,
) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Text => print!("{}", text(value)),
    }
    Ok(())
}

fn compact(value: &Value) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| value.to_string())
}

fn width<'a>(names: impl Iterator<Item = &'a str>) -> usize {
    names.map(|name| name.chars().count()).max().unwrap_or(0)
}

fn finish(lines: Vec<String>, empty: &str) -> String {
    if lines.is_empty() {
        return format!("{empty}\n");
    }
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

pub(crate) fn settings_text(result: &SettingsResult) -> String {
    let w = width(result.settings.iter().map(|s| s.key.as_str()));
    let mut lines = Vec::new();
    for setting in &result.settings {
        lines.push(format!(
            "{:<w$}  {:<7}  {}",
            setting.key,
            setting.effective_scope,
            compact(&setting.effective_value)
        ));
        for shadowed in setting.overrides.iter().skip(1) {
            lines.push(format!(
                "{:<w$}  {:<7}  {} (overridden)",
                "",
                shadowed.scope,
                compact(&shadowed.value)
            ));
        }
    }
    finish(lines, "No settings.")
}

pub(crate) fn permissions_text(result: &PermissionsResult) -> String {
    let label = |tool: &str, pattern: Option<&str>| match pattern {
        Some(pattern) => format!("{tool}({pattern})"),
        None => tool.to_string(),
    };
    let labels: Vec<String> = result
        .effective
        .iter()
        .map(|p| label(&p.tool, p.pattern.as_deref()))
        .collect();
    let w = width(labels.iter().map(String::as_str));
    let mut lines = Vec::new();
    for (permission, label) in result.effective.iter().zip(&labels) {
        lines.push(format!(
            "{:<w$}  {:<5}  {}",
            label,
            permission.effective_rule.as_str(),
            permission.effective_scope
        ));
        for shadowed in permission.overrides.iter().skip(1) {
            lines.push(format!(
                "{:<w$}  {:<5}  {} (overridden)",
                "",
                shadowed.rule.as_str(),
                shadowed.scope
            ));
        }
    }
    finish(lines, "No permission rules.")
}

fn server_target(server: &McpServer) -> String {
    match server.server_type {
        McpServerType::Http => server.url.clone().unwrap_or_default(),
        McpServerType::Command => {
            let mut parts: Vec<&str> = server.command.as_deref().into_iter().collect();
            parts.extend(server.args.iter().flatten().map(String::as_str));
            parts.join(" ")
        }
    }
}

pub(crate) fn mcp_text(result: &McpResult) -> String {
    let w = width(result.servers.iter().map(|s| s.name.as_str()));
    let mut lines: Vec<String> = result
        .servers
        .iter()
        .map(|server| {
            let status = match (server.is_duplicate, server.is_active) {
                (Some(true), Some(true)) => " [active duplicate]",
                (Some(true), _) => " [shadowed duplicate]",
                _ => "",
            };
            let origin = server
                .plugin
                .as_deref()
                .map(|plugin| format!(" (plugin {plugin})"))
                .unwrap_or_default();
            format!(
                "{:<w$}  {:<7}  {}{}{}",
                server.name,
                server.scope,
                server_target(server),
                origin,
                status
            )
        })
        .collect();
    for duplicate in &result.duplicates {
        let scopes: Vec<String> = duplicate
            .locations
            .iter()
            .map(|l| format!("{}:{}", l.scope, l.source_path.display()))
            .collect();
        lines.push(format!("duplicate {}: {}", duplicate.name, scopes.join(", ")));
    }
    finish(lines, "No MCP servers.")
}

pub(crate) fn hooks_text(result: &HooksResult) -> String {
    let mut lines = Vec::new();
    for record in &result.events {
        lines.push(format!(
            "{} [{}] {}",
            record.event,
            record.scope,
            record.source_path.display()
        ));
        for matcher in &record.matchers {
            let label = matcher.matcher.as_deref().unwrap_or("*");
            for hook in &matcher.hooks {
                lines.push(format!("  {label}: {}", hook.command));
            }
        }
    }
    let custom = sw_hooks::custom_events(result);
    if !custom.is_empty() {
        lines.push(format!("custom: {}", custom.join(", ")));
    }
    if !result.unconfigured_events.is_empty() {
        lines.push(format!(
            "unconfigured: {}",
            result.unconfigured_events.join(", ")
        ));
    }
    finish(lines, "No hooks.")
}

pub(crate) fn commands_text(result: &CommandsResult) -> String {
    let w = width(result.commands.iter().map(|c| c.name.as_str()));
    let lines = result
        .commands
        .iter()
        .map(|entry| {
            let line = format!("/{:<w$}  {:<7}", entry.name, entry.scope);
            match &entry.description {
                Some(description) => format!("{line}  {description}"),
                None => line.trim_end().to_string(),
            }
        })
        .collect();
    finish(lines, "No commands.")
}

pub(crate) fn memory_text(result: &MemoryImportResult) -> String {
    let mut lines = Vec::new();
    for file in &result.files {
        let cycle = file
            .circular_at
            .as_ref()
            .map(|at| format!(" (circular at {})", at.display()))
            .unwrap_or_default();
        lines.push(format!("{} [{}]{}", file.path.display(), file.scope, cycle));
        for import in &file.imports {
            let mark = if import.exists { "ok" } else { "missing" };
            lines.push(format!(
                "  {} -> {} ({mark})",
                import.raw,
                import.resolved_path.display()
            ));
        }
    }
    if !result.files.is_empty() {
        lines.push(format!(
            "{} imports, {} broken",
            result.total_imports, result.total_broken
        ));
    }
    finish(lines, "No memory files.")
}

pub(crate) fn files_text(report: &FilesReport) -> String {
    let mut lines = vec![format!(
        "{} of {} files usable ({} missing, {} errors)",
        report.usable, report.total, report.missing, report.errors
    )];
    lines.extend(report.issues.iter().map(|issue| format!("  {issue}")));
    finish(lines, "")
}

pub(crate) fn all_text(report: &AllReport) -> String {
    [
        ("Settings", settings_text(&report.settings)),
        ("Permissions", permissions_text(&report.permissions)),
        ("MCP servers", mcp_text(&report.mcp)),
        ("Hooks", hooks_text(&report.hooks)),
        ("Commands", commands_text(&report.commands)),
        ("Memory", memory_text(&report.memory)),
    ]
    .into_iter()
    .map(|(title, body)| format!("== {title} ==\n{body}"))
    .collect::<Vec<_>>()
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use sw_core::{ConfigFile, ConfigFileKind, Scope};

    fn files() -> Vec<ConfigFile> {
        vec![
            ConfigFile::loaded(
                Scope::User,
                ConfigFileKind::Settings,
                "/u/settings.json",
                json!({"theme": "dark", "permissions": {"allow": ["Bash(git status)"]}}),
            ),
            ConfigFile::loaded(
                Scope::Project,
                ConfigFileKind::Settings,
                "/p/settings.json",
                json!({"theme": "light", "permissions": {"deny": ["Bash(git status)"]}}),
            ),
        ]
    }

    #[test]
    fn test_settings_text_lists_winner_then_overridden() {
        let text = settings_text(&sw_config::resolve_settings(&files()));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("permissions  project"));
        assert!(lines[2].starts_with("theme "));
        assert!(lines[2].ends_with("project  \"light\""));
        assert!(lines[3].contains("user"));
        assert!(lines[3].ends_with("\"dark\" (overridden)"));
    }

    #[test]
    fn test_permissions_text_shows_pattern() {
        let text = permissions_text(&sw_config::resolve_permissions(&files()));
        assert!(text.starts_with("Bash(git status)  deny   project\n"));
        assert!(text.contains("allow  user (overridden)"));
    }

    #[test]
    fn test_empty_results_have_placeholder() {
        assert_eq!(settings_text(&SettingsResult::default()), "No settings.\n");
        assert_eq!(mcp_text(&McpResult::default()), "No MCP servers.\n");
        assert!(hooks_text(&HooksResult::default()).contains("unconfigured: PreToolUse"));
    }

    #[test]
    fn test_hooks_text_lists_custom_events() {
        let files = vec![ConfigFile::loaded(
            Scope::Project,
            ConfigFileKind::Settings,
            "/p/settings.json",
            json!({"hooks": {
                "PreToolUse": [{"hooks": [{"type": "command", "command": "lint"}]}],
                "TeamSync": [{"hooks": [{"type": "command", "command": "sync"}]}]
            }}),
        )];
        let text = hooks_text(&sw_hooks::resolve_hooks(&files));
        assert!(text.contains("custom: TeamSync\n"));
        assert!(!text.contains("custom: PreToolUse"));
    }

    #[test]
    fn test_columns_align_on_characters() {
        let files = vec![ConfigFile::loaded(
            Scope::User,
            ConfigFileKind::Settings,
            "/u/settings.json",
            json!({"café": 1, "model": 2}),
        )];
        let text = settings_text(&sw_config::resolve_settings(&files));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec!["café   user     1", "model  user     2"]);
    }

    #[test]
    fn test_files_text_splits_missing_and_errors() {
        let report = FilesReport {
            total: 3,
            usable: 2,
            missing: 1,
            errors: 0,
            issues: sw_core::snapshot_issues(&[ConfigFile::missing(
                Scope::Local,
                ConfigFileKind::Settings,
                "/p/settings.local.json",
            )]),
        };
        let text = files_text(&report);
        assert!(text.starts_with("2 of 3 files usable (1 missing, 0 errors)\n"));
    }
}
