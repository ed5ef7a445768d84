use std::path::PathBuf;

use serde::Serialize;

use crate::scope::Scope;
use crate::types::{ConfigFile, ConfigFileKind};

/// Why a value was left out during extraction.
///
/// Skips are never surfaced to callers of a resolver; they only show up in
/// debug logs.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    #[error("file does not exist")]
    Missing,

    #[error("file is not readable: {0}")]
    Unreadable(String),

    #[error("expected {expected}, found {found}")]
    WrongShape {
        expected: &'static str,
        found: &'static str,
    },

    #[error("field '{0}' is absent")]
    Absent(String),
}

/// Per-file problem reported by [`snapshot_issues`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FileIssue {
    #[error("{scope} {path}: not found")]
    MissingFile { scope: Scope, path: PathBuf },

    #[error("{scope} {path}: unreadable ({reason})")]
    UnreadableFile {
        scope: Scope,
        path: PathBuf,
        reason: String,
    },

    #[error("{scope} {path}: expected {expected} content")]
    UnexpectedContent {
        scope: Scope,
        path: PathBuf,
        expected: &'static str,
    },
}

impl FileIssue {
    /// Missing files contribute nothing but are not errors.
    pub fn is_error(&self) -> bool {
        !matches!(self, Self::MissingFile { .. })
    }
}

/// Name of a JSON value's type, for skip diagnostics.
pub fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// Classifies every input record that will not feed a resolver.
pub fn snapshot_issues(files: &[ConfigFile]) -> Vec<FileIssue> {
    files
        .iter()
        .filter_map(|file| {
            let scope = file.scope;
            let path = file.expected_path.clone();
            if !file.exists {
                return Some(FileIssue::MissingFile { scope, path });
            }
            if !file.readable || file.error.is_some() {
                let reason = file
                    .error
                    .clone()
                    .unwrap_or_else(|| "permission denied".to_string());
                return Some(FileIssue::UnreadableFile {
                    scope,
                    path,
                    reason,
                });
            }
            let expected = match file.kind {
                ConfigFileKind::Settings | ConfigFileKind::Mcp if !file.content.is_object() => {
                    "object"
                }
                ConfigFileKind::Memory if !file.content.is_string() => "string",
                _ => return None,
            };
            Some(FileIssue::UnexpectedContent {
                scope,
                path,
                expected,
            })
        })
        .collect()
}
