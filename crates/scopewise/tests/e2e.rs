// End-to-end tests for the scopewise binary.

use std::path::Path;
use std::process::{Command, Output};

use serde_json::{Value, json};
use tempfile::TempDir;

fn scopewise(dir: &Path, args: &[&str]) -> Output {
    let config = dir.join("no-config.toml");
    Command::new(env!("CARGO_BIN_EXE_scopewise"))
        .arg("--config")
        .arg(&config)
        .arg("--home")
        .arg(dir.join("home"))
        .arg("--plugins-dir")
        .arg(dir.join("plugins"))
        .args(args)
        .output()
        .expect("failed to run scopewise")
}

fn json_output(output: &Output) -> Value {
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

fn fixture() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    std::fs::create_dir_all(root.join("repo/.claude/commands")).unwrap();
    std::fs::write(
        root.join("repo/.claude/commands/lint.md"),
        "---\ndescription: Run lints\n---\n",
    )
    .unwrap();
    std::fs::write(root.join("repo/docs.md"), "docs\n").unwrap();

    let repo = root.join("repo");
    let snapshot = json!({
        "files": [
            {
                "scope": "user", "type": "settings", "exists": true, "readable": true,
                "expectedPath": root.join("home/.claude/settings.json"),
                "content": {
                    "theme": "dark",
                    "permissions": {"deny": ["Bash"]},
                    "hooks": {"PreToolUse": [{"hooks": [{"type": "command", "command": "a"}]}]}
                }
            },
            {
                "scope": "local", "type": "settings", "exists": true, "readable": true,
                "expectedPath": repo.join(".claude/settings.local.json"),
                "content": {
                    "theme": "light",
                    "permissions": {"allow": ["Bash"]},
                    "hooks": {"PreToolUse": [{"hooks": [{"type": "command", "command": "b"}]}]}
                }
            },
            {
                "scope": "user", "type": "mcp", "exists": true, "readable": true,
                "expectedPath": root.join("home/.mcp.json"),
                "content": {"mcpServers": {"shared": {"command": "npx", "env": {"TOKEN": "secret"}}}}
            },
            {
                "scope": "project", "type": "mcp", "exists": true, "readable": true,
                "expectedPath": repo.join(".mcp.json"),
                "content": {"shared": {"url": "https://example.com/mcp"}}
            },
            {
                "scope": "project", "type": "memory", "exists": true, "readable": true,
                "expectedPath": repo.join("CLAUDE.md"),
                "content": "See @./docs.md and @./gone.md\n"
            },
            {
                "scope": "managed", "type": "settings", "exists": false,
                "expectedPath": "/etc/scopewise-test/managed-settings.json"
            }
        ],
        "commandDirs": [{"scope": "project", "path": repo.join(".claude/commands")}]
    });
    std::fs::write(root.join("snapshot.json"), snapshot.to_string()).unwrap();
    dir
}

fn run_json(dir: &TempDir, command: &str) -> Value {
    let snapshot = dir.path().join("snapshot.json");
    let snapshot = snapshot.to_str().unwrap();
    json_output(&scopewise(
        dir.path(),
        &["--snapshot", snapshot, "--format", "json", command],
    ))
}

#[test]
fn cli_help_displays_correctly() {
    let output = Command::new(env!("CARGO_BIN_EXE_scopewise"))
        .arg("--help")
        .output()
        .expect("failed to run scopewise --help");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for command in ["settings", "permissions", "mcp", "hooks", "commands", "memory", "all"] {
        assert!(stdout.contains(command), "missing {command}");
    }
    assert!(stdout.contains("--snapshot"));
}

#[test]
fn settings_last_scope_wins() {
    let dir = fixture();
    let result = run_json(&dir, "settings");
    let theme = result["settings"]
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["key"] == "theme")
        .unwrap();
    assert_eq!(theme["effectiveValue"], "light");
    assert_eq!(theme["effectiveScope"], "local");
    assert_eq!(theme["overrides"].as_array().unwrap().len(), 2);
}

#[test]
fn permissions_deny_beats_higher_scope_allow() {
    let dir = fixture();
    let result = run_json(&dir, "permissions");
    let effective = &result["effective"][0];
    assert_eq!(effective["tool"], "Bash");
    assert_eq!(effective["effectiveRule"], "deny");
    assert_eq!(effective["effectiveScope"], "user");
}

#[test]
fn mcp_duplicate_and_masking() {
    let dir = fixture();
    let result = run_json(&dir, "mcp");
    let servers = result["servers"].as_array().unwrap();
    assert_eq!(servers.len(), 2);
    assert_eq!(servers[0]["scope"], "project");
    assert_eq!(servers[0]["type"], "http");
    assert_eq!(servers[0]["isActive"], true);
    assert_eq!(servers[1]["isActive"], false);
    assert_eq!(servers[1]["env"]["TOKEN"], "********");
    assert_eq!(result["duplicates"][0]["name"], "shared");
}

#[test]
fn hooks_are_additive() {
    let dir = fixture();
    let result = run_json(&dir, "hooks");
    assert_eq!(result["events"].as_array().unwrap().len(), 2);
    assert_eq!(result["configuredEvents"], json!(["PreToolUse"]));
}

#[test]
fn commands_carry_descriptions() {
    let dir = fixture();
    let result = run_json(&dir, "commands");
    let command = &result["commands"][0];
    assert_eq!(command["name"], "lint");
    assert_eq!(command["source"], "command");
    assert_eq!(command["description"], "Run lints");
    assert!(command.get("content").is_none());
}

#[test]
fn memory_reports_broken_imports() {
    let dir = fixture();
    let result = run_json(&dir, "memory");
    assert_eq!(result["totalImports"], 2);
    assert_eq!(result["totalBroken"], 1);
    assert_eq!(result["brokenImports"][0]["raw"], "@./gone.md");
    assert_eq!(result["brokenImports"][0]["error"], "File not found");
}

#[test]
fn all_runs_every_resolver() {
    let dir = fixture();
    let result = run_json(&dir, "all");
    for section in ["settings", "permissions", "mcp", "hooks", "commands", "memory"] {
        assert!(result.get(section).is_some(), "missing {section}");
    }
}

#[test]
fn files_lists_missing_records() {
    let dir = fixture();
    let result = run_json(&dir, "files");
    assert_eq!(result["total"], 6);
    assert_eq!(result["usable"], 5);
    assert_eq!(result["missing"], 1);
    assert_eq!(result["errors"], 0);
    assert_eq!(result["issues"][0]["kind"], "missingFile");
}

#[test]
fn text_output_is_default() {
    let dir = fixture();
    let snapshot = dir.path().join("snapshot.json");
    let output = scopewise(
        dir.path(),
        &["--snapshot", snapshot.to_str().unwrap(), "settings"],
    );
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("theme"));
    assert!(stdout.contains("(overridden)"));
}

#[test]
fn missing_snapshot_fails_with_context() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.json");
    let output = scopewise(
        dir.path(),
        &["--snapshot", missing.to_str().unwrap(), "settings"],
    );
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to read snapshot"));
}
