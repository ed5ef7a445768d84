use std::path::{Component, Path, PathBuf};

/// Home directory of the current user, if one can be determined.
pub fn home_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf())
}

/// Default plugin root: `<home>/.claude/plugins`.
pub fn default_plugins_dir(home: &Path) -> PathBuf {
    home.join(".claude").join("plugins")
}

/// Lexically normalizes a path: drops `.` and folds `..` into its parent.
///
/// The filesystem is not consulted, so the target does not need to exist and
/// symlinks are not resolved. `..` at the root stays at the root.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let popped = match out.components().next_back() {
                    Some(Component::Normal(_)) => out.pop(),
                    _ => false,
                };
                if !popped && !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
