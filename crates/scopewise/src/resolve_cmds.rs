//! Runs the domain resolvers over a loaded snapshot.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;
use sw_config::{GlobalConfig, PermissionsResult, SettingsResult};
use sw_core::FileIssue;
use sw_hooks::{CommandsInput, CommandsOptions, CommandsResult, HooksResult};
use sw_mcp::{McpResult, PluginLookup};
use sw_memory::MemoryImportResult;

use crate::snapshot::Snapshot;

/// Disk locations and options shared by the resolvers that read the
/// filesystem.
#[derive(Debug, Clone, Default)]
pub(crate) struct ResolveContext {
    pub home: Option<PathBuf>,
    pub plugins_dir: Option<PathBuf>,
    pub include_content: bool,
}

impl ResolveContext {
    /// Config file values with CLI flags layered on top.
    pub fn new(
        config: &GlobalConfig,
        home: Option<PathBuf>,
        plugins_dir: Option<PathBuf>,
        include_content: bool,
    ) -> Self {
        let home = home.or_else(|| config.home_dir());
        let plugins_dir = plugins_dir
            .or_else(|| config.paths.plugins_dir.clone())
            .or_else(|| home.as_deref().map(sw_core::paths::default_plugins_dir));
        Self {
            home,
            plugins_dir,
            include_content: include_content || config.commands.include_content,
        }
    }

    fn plugin_lookup(&self) -> PluginLookup {
        match &self.plugins_dir {
            Some(dir) => PluginLookup::from_plugins_dir(dir),
            None => {
                tracing::debug!("no plugin directory; only registry-free lookups apply");
                PluginLookup::default()
            }
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FilesReport {
    pub total: usize,
    pub usable: usize,
    /// Expected files that are absent; not an error.
    pub missing: usize,
    /// Files present but unreadable or of the wrong shape.
    pub errors: usize,
    pub issues: Vec<FileIssue>,
}

#[derive(Debug, Serialize)]
pub(crate) struct AllReport {
    pub settings: SettingsResult,
    pub permissions: PermissionsResult,
    pub mcp: McpResult,
    pub hooks: HooksResult,
    pub commands: CommandsResult,
    pub memory: MemoryImportResult,
}

pub(crate) fn run_settings(snapshot: &Snapshot) -> SettingsResult {
    sw_config::resolve_settings(&snapshot.files)
}

pub(crate) fn run_permissions(snapshot: &Snapshot) -> PermissionsResult {
    sw_config::resolve_permissions(&snapshot.files)
}

pub(crate) fn run_mcp(snapshot: &Snapshot, ctx: &ResolveContext) -> McpResult {
    sw_mcp::resolve_mcp(&snapshot.files, &snapshot.plugins, &ctx.plugin_lookup())
}

pub(crate) fn run_hooks(snapshot: &Snapshot) -> HooksResult {
    sw_hooks::resolve_hooks(&snapshot.files)
}

/// Commands and skills; plugin directories missing from the feed are filled
/// in from the plugin lookup tiers.
pub(crate) fn run_commands(snapshot: &Snapshot, ctx: &ResolveContext) -> CommandsResult {
    let lookup = ctx.plugin_lookup();
    let plugins: Vec<_> = snapshot
        .plugins
        .iter()
        .cloned()
        .map(|mut plugin| {
            if plugin.plugin_dir.is_none() {
                plugin.plugin_dir = lookup
                    .candidate_dirs(&plugin)
                    .into_iter()
                    .find(|dir| dir.is_dir());
            }
            plugin
        })
        .collect();
    let input = CommandsInput {
        command_dirs: &snapshot.command_dirs,
        skill_dirs: &snapshot.skill_dirs,
        plugins: &plugins,
    };
    let opts = CommandsOptions {
        include_content: ctx.include_content,
    };
    sw_hooks::resolve_commands(&input, opts)
}

pub(crate) fn run_memory(snapshot: &Snapshot, ctx: &ResolveContext) -> Result<MemoryImportResult> {
    let home = ctx
        .home
        .as_deref()
        .context("Cannot determine home directory; set [paths] home_dir or pass --home")?;
    Ok(sw_memory::resolve_memory(&snapshot.files, home))
}

pub(crate) fn run_files(snapshot: &Snapshot) -> FilesReport {
    let issues = sw_core::snapshot_issues(&snapshot.files);
    let errors = issues.iter().filter(|issue| issue.is_error()).count();
    FilesReport {
        total: snapshot.files.len(),
        usable: snapshot.files.len() - issues.len(),
        missing: issues.len() - errors,
        errors,
        issues,
    }
}

async fn blocking<T, F>(snapshot: &Arc<Snapshot>, ctx: &Arc<ResolveContext>, f: F) -> Result<T>
where
    F: FnOnce(&Snapshot, &ResolveContext) -> T + Send + 'static,
    T: Send + 'static,
{
    let snapshot = Arc::clone(snapshot);
    let ctx = Arc::clone(ctx);
    tokio::task::spawn_blocking(move || f(&snapshot, &ctx))
        .await
        .context("Resolver task failed")
}

/// Every resolver, each on the blocking pool over the same frozen snapshot.
pub(crate) async fn run_all(snapshot: Snapshot, ctx: ResolveContext) -> Result<AllReport> {
    let snapshot = Arc::new(snapshot);
    let ctx = Arc::new(ctx);
    let (settings, permissions, mcp, hooks, commands, memory) = tokio::try_join!(
        blocking(&snapshot, &ctx, |s, _| run_settings(s)),
        blocking(&snapshot, &ctx, |s, _| run_permissions(s)),
        blocking(&snapshot, &ctx, run_mcp),
        blocking(&snapshot, &ctx, |s, _| run_hooks(s)),
        blocking(&snapshot, &ctx, run_commands),
        blocking(&snapshot, &ctx, run_memory),
    )?;
    Ok(AllReport {
        settings,
        permissions,
        mcp,
        hooks,
        commands,
        memory: memory?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use sw_core::{ConfigFile, ConfigFileKind, Scope};

    fn snapshot() -> Snapshot {
        Snapshot {
            files: vec![
                ConfigFile::loaded(
                    Scope::User,
                    ConfigFileKind::Settings,
                    "/home/me/.claude/settings.json",
                    json!({"theme": "dark", "permissions": {"deny": ["Bash"]}}),
                ),
                ConfigFile::loaded(
                    Scope::Project,
                    ConfigFileKind::Settings,
                    "/repo/.claude/settings.json",
                    json!({"theme": "light"}),
                ),
                ConfigFile::missing(
                    Scope::Local,
                    ConfigFileKind::Settings,
                    "/repo/.claude/settings.local.json",
                ),
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_context_flags_override_config() {
        let mut config = GlobalConfig::default();
        config.paths.home_dir = Some(PathBuf::from("/home/cfg"));
        config.commands.include_content = true;

        let ctx = ResolveContext::new(&config, Some(PathBuf::from("/home/flag")), None, false);
        assert_eq!(ctx.home, Some(PathBuf::from("/home/flag")));
        assert_eq!(ctx.plugins_dir, Some(PathBuf::from("/home/flag/.claude/plugins")));
        assert!(ctx.include_content);
    }

    #[test]
    fn test_memory_without_home_is_an_error() {
        let ctx = ResolveContext::default();
        let err = run_memory(&snapshot(), &ctx).unwrap_err();
        assert!(err.to_string().contains("home directory"));
    }

    #[test]
    fn test_files_report_counts() {
        let report = run_files(&snapshot());
        assert_eq!(report.total, 3);
        assert_eq!(report.usable, 2);
        assert_eq!(report.missing, 1);
        assert_eq!(report.errors, 0);
        assert_eq!(report.issues.len(), 1);
    }

    #[test]
    fn test_files_report_separates_errors_from_missing() {
        let mut snapshot = snapshot();
        snapshot.files.push(ConfigFile::loaded(
            Scope::Managed,
            ConfigFileKind::Settings,
            "/etc/claude-code/managed-settings.json",
            json!(["not", "an", "object"]),
        ));
        let report = run_files(&snapshot);
        assert_eq!(report.total, 4);
        assert_eq!(report.usable, 2);
        assert_eq!(report.missing, 1);
        assert_eq!(report.errors, 1);
    }

    #[tokio::test]
    async fn test_run_all_matches_individual_resolvers() {
        let ctx = ResolveContext {
            home: Some(PathBuf::from("/home/me")),
            ..Default::default()
        };
        let report = run_all(snapshot(), ctx).await.unwrap();
        assert_eq!(report.settings, run_settings(&snapshot()));
        assert_eq!(report.permissions, run_permissions(&snapshot()));
        assert_eq!(report.hooks.configured_events.len(), 0);
        assert!(report.mcp.servers.is_empty());
        assert!(report.commands.commands.is_empty());
        assert!(report.memory.files.is_empty());
    }
}
