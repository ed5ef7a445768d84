use super::*;
use proptest::prelude::*;
use serde_json::json;

fn settings(scope: Scope, path: &str, content: Value) -> ConfigFile {
    ConfigFile::loaded(scope, ConfigFileKind::Settings, path, content)
}

#[test]
fn test_project_overrides_user() {
    let files = vec![
        settings(Scope::User, "/home/me/.claude/settings.json", json!({"theme": "dark"})),
        settings(Scope::Project, "/repo/.claude/settings.json", json!({"theme": "light"})),
    ];

    let result = resolve_settings(&files);
    let theme = result.get("theme").unwrap();
    assert_eq!(theme.effective_value, json!("light"));
    assert_eq!(theme.effective_scope, Scope::Project);
    assert_eq!(
        theme.effective_source_path,
        PathBuf::from("/repo/.claude/settings.json")
    );
    let chain: Vec<(Scope, Value)> = theme
        .overrides
        .iter()
        .map(|o| (o.scope, o.value.clone()))
        .collect();
    assert_eq!(
        chain,
        vec![(Scope::Project, json!("light")), (Scope::User, json!("dark"))]
    );
}

#[test]
fn test_object_values_are_not_deep_merged() {
    let files = vec![
        settings(Scope::User, "/u", json!({"env": {"A": "1", "B": "2"}})),
        settings(Scope::Local, "/l", json!({"env": {"B": "3"}})),
    ];

    let result = resolve_settings(&files);
    let env = result.get("env").unwrap();
    assert_eq!(env.effective_value, json!({"B": "3"}));
    assert_eq!(env.effective_scope, Scope::Local);
}

#[test]
fn test_scope_omitting_key_contributes_nothing() {
    let files = vec![
        settings(Scope::Managed, "/m", json!({"model": "opus"})),
        settings(Scope::Project, "/p", json!({"theme": "light"})),
    ];

    let result = resolve_settings(&files);
    assert_eq!(result.settings.len(), 2);
    let model = result.get("model").unwrap();
    assert_eq!(model.effective_scope, Scope::Managed);
    assert_eq!(model.overrides.len(), 1);
}

#[test]
fn test_output_sorted_by_key() {
    let files = vec![settings(
        Scope::User,
        "/u",
        json!({"zeta": 1, "alpha": 2, "mid": 3}),
    )];
    let resolved = resolve_settings(&files);
    let keys: Vec<&str> = resolved
        .settings
        .iter()
        .map(|s| s.key.as_str())
        .collect();
    assert_eq!(keys, vec!["alpha", "mid", "zeta"]);
}

#[test]
fn test_unusable_files_are_ignored() {
    let mut unreadable = settings(Scope::Local, "/l", json!({"theme": "red"}));
    unreadable.readable = false;
    let files = vec![
        settings(Scope::User, "/u", json!({"theme": "dark"})),
        unreadable,
        ConfigFile::missing(Scope::Project, ConfigFileKind::Settings, "/p"),
        settings(Scope::Project, "/arr", json!(["not", "an", "object"])),
        ConfigFile::loaded(Scope::Local, ConfigFileKind::Mcp, "/mcp", json!({"theme": "x"})),
    ];

    let result = resolve_settings(&files);
    let theme = result.get("theme").unwrap();
    assert_eq!(theme.effective_scope, Scope::User);
    assert_eq!(theme.overrides.len(), 1);
}

#[test]
fn test_empty_input_gives_empty_result() {
    assert_eq!(resolve_settings(&[]), SettingsResult::default());
}

#[test]
fn test_equal_scope_keeps_input_order() {
    let files = vec![
        settings(Scope::User, "/first", json!({"k": 1})),
        settings(Scope::User, "/second", json!({"k": 2})),
    ];
    let k = resolve_settings(&files).get("k").cloned().unwrap();
    assert_eq!(k.effective_source_path, PathBuf::from("/first"));
}

fn scope_subset() -> impl Strategy<Value = Vec<Scope>> {
    prop::sample::subsequence(Scope::ALL.to_vec(), 1..=4)
}

proptest! {
    #[test]
    fn prop_effective_scope_is_max_defining_scope(scopes in scope_subset()) {
        let files: Vec<ConfigFile> = scopes
            .iter()
            .map(|scope| settings(*scope, &format!("/{scope}"), json!({"key": scope.as_str()})))
            .collect();

        let result = resolve_settings(&files);
        let key = result.get("key").unwrap();
        let max = scopes.iter().copied().max_by_key(Scope::priority).unwrap();
        prop_assert_eq!(key.effective_scope, max);
        prop_assert_eq!(key.overrides.len(), scopes.len());
    }
}
