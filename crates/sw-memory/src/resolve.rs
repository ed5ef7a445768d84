//! Memory import graph traversal.
//!
//! Direct imports of each top-level memory file are checked for existence.
//! Independently, the transitive graph is walked depth-first from each
//! top-level file. Each branch carries its own copy of the ancestor set, so
//! a file reached through two sibling branches is not a cycle; only a path
//! that is already an ancestor on the current branch is.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use sw_core::extract::text_content;
use sw_core::paths::normalize_path;
use sw_core::{ConfigFile, ConfigFileKind, Scope};

use crate::directive::{Directive, parse_directives};

/// Levels walked from a top-level file, the file itself included.
pub const MAX_IMPORT_DEPTH: usize = 5;

pub const FILE_NOT_FOUND: &str = "File not found";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryImport {
    pub raw: String,
    pub resolved_path: PathBuf,
    pub relative_to: PathBuf,
    pub exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedMemoryFile {
    pub path: PathBuf,
    pub scope: Scope,
    /// Direct imports only.
    pub imports: Vec<MemoryImport>,
    /// Every file visited by the walk, in visit order, starting with `path`.
    pub import_chain: Vec<PathBuf>,
    pub has_circular: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub circular_at: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryImportResult {
    pub files: Vec<ResolvedMemoryFile>,
    pub broken_imports: Vec<MemoryImport>,
    pub total_imports: usize,
    pub total_broken: usize,
}

fn parent_dir(path: &Path) -> &Path {
    path.parent().unwrap_or_else(|| Path::new("/"))
}

fn check_import(directive: &Directive, base_dir: &Path, home: &Path) -> MemoryImport {
    let (resolved_path, relative_to) = directive.resolve(base_dir, home);
    let exists = resolved_path.try_exists().unwrap_or(false);
    MemoryImport {
        raw: directive.raw.clone(),
        resolved_path,
        relative_to,
        exists,
        error: (!exists).then(|| FILE_NOT_FOUND.to_string()),
    }
}

/// Direct imports of one memory file.
pub fn direct_imports(path: &Path, content: &str, home: &Path) -> Vec<MemoryImport> {
    let base_dir = parent_dir(path);
    parse_directives(content)
        .iter()
        .map(|directive| check_import(directive, base_dir, home))
        .collect()
}

/// State of one walk from a top-level file.
struct Walk<'a> {
    home: &'a Path,
    chain: Vec<PathBuf>,
    circular_at: Option<PathBuf>,
}

impl Walk<'_> {
    /// `content` is supplied for the top-level file; imported files are read
    /// from disk.
    fn visit(
        &mut self,
        path: PathBuf,
        content: Option<&str>,
        ancestors: &BTreeSet<PathBuf>,
        depth: usize,
    ) {
        if ancestors.contains(&path) {
            tracing::debug!(path = %path.display(), "circular memory import");
            if self.circular_at.is_none() {
                self.circular_at = Some(path);
            }
            return;
        }
        if depth >= MAX_IMPORT_DEPTH {
            tracing::debug!(path = %path.display(), depth, "memory import depth limit reached");
            return;
        }

        let owned;
        let text = match content {
            Some(text) => text,
            None => match fs::read_to_string(&path) {
                Ok(text) => {
                    owned = text;
                    owned.as_str()
                }
                Err(e) => {
                    tracing::debug!(path = %path.display(), error = %e, "memory import unreadable");
                    return;
                }
            },
        };
        self.chain.push(path.clone());

        let base_dir = parent_dir(&path).to_path_buf();
        let mut branch = ancestors.clone();
        branch.insert(path);
        for directive in parse_directives(text) {
            let (child, _) = directive.resolve(&base_dir, self.home);
            self.visit(child, None, &branch, depth + 1);
        }
    }
}

fn resolve_file(file: &ConfigFile, content: &str, home: &Path) -> ResolvedMemoryFile {
    let path = normalize_path(&file.expected_path);
    let imports = direct_imports(&path, content, home);

    let mut walk = Walk {
        home,
        chain: Vec::new(),
        circular_at: None,
    };
    walk.visit(path.clone(), Some(content), &BTreeSet::new(), 0);

    ResolvedMemoryFile {
        path,
        scope: file.scope,
        imports,
        import_chain: walk.chain,
        has_circular: walk.circular_at.is_some(),
        circular_at: walk.circular_at,
    }
}

/// Resolves the imports of every usable memory file in `files`.
///
/// `home` anchors `~/` imports. Top-level content comes from the snapshot;
/// imported files are read from disk.
pub fn resolve_memory(files: &[ConfigFile], home: &Path) -> MemoryImportResult {
    let mut result = MemoryImportResult::default();
    for file in files.iter().filter(|file| file.kind == ConfigFileKind::Memory) {
        let content = match text_content(file) {
            Ok(content) => content,
            Err(reason) => {
                tracing::debug!(
                    path = %file.expected_path.display(),
                    %reason,
                    "skipping memory file"
                );
                continue;
            }
        };
        let resolved = resolve_file(file, content, home);
        result.total_imports += resolved.imports.len();
        result
            .broken_imports
            .extend(resolved.imports.iter().filter(|import| !import.exists).cloned());
        result.files.push(resolved);
    }
    result.total_broken = result.broken_imports.len();
    result
}

#[cfg(test)]
#[path = "resolve_tests.rs"]
mod tests;
