//! `@path` import directives in Markdown memory files.
//!
//! The reader is a line-based state machine with a single flag:
//!
//! - a line whose trimmed start begins with three backticks toggles the
//!   fence flag, and nothing on that line is read;
//! - inside a fence every line is ignored;
//! - outside a fence every whitespace-separated token starting with `@` is a
//!   candidate. Trailing `,;:)]` is stripped, as is a sentence-ending `.`
//!   that follows a name character (so `@./a.md.` reads as `./a.md` while
//!   `@../..` keeps its dots), and the remainder must take one of the forms
//!   in [`ImportForm`].
//!
//! The bare form (`dir/file.md`) also matches ordinary prose that mentions a
//! Markdown path after an `@`; that is accepted as is.

use std::path::{Path, PathBuf};

use sw_core::paths::normalize_path;

const FENCE: &str = "```";
const TRAILING_PUNCTUATION: &[char] = &[',', ';', ':', ')', ']'];
const MARKDOWN_SUFFIX: &str = ".md";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportForm {
    /// `~/…`, resolved against the home directory.
    Home,
    /// `/…`
    Absolute,
    /// `./…` or `../…`
    Relative,
    /// `dir/file.md`: contains a slash and ends in `.md`.
    Bare,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    /// Token as written, `@` included, trailing punctuation removed.
    pub raw: String,
    pub form: ImportForm,
}

impl Directive {
    /// Path text after the `@`.
    pub fn target(&self) -> &str {
        &self.raw[1..]
    }

    /// Absolute, lexically normalized target and the directory it was
    /// resolved against.
    pub fn resolve(&self, base_dir: &Path, home: &Path) -> (PathBuf, PathBuf) {
        let target = self.target();
        let (relative_to, rest) = match self.form {
            ImportForm::Home => (home, target.strip_prefix("~/").unwrap_or(target)),
            // joining an absolute path replaces the base
            ImportForm::Absolute | ImportForm::Relative | ImportForm::Bare => (base_dir, target),
        };
        (
            normalize_path(&relative_to.join(rest)),
            relative_to.to_path_buf(),
        )
    }
}

/// Which import form `target` takes, if any.
pub fn classify(target: &str) -> Option<ImportForm> {
    if target.starts_with("~/") {
        Some(ImportForm::Home)
    } else if target.starts_with('/') {
        Some(ImportForm::Absolute)
    } else if target.starts_with("./") || target.starts_with("../") {
        Some(ImportForm::Relative)
    } else if target.contains('/') && target.ends_with(MARKDOWN_SUFFIX) {
        Some(ImportForm::Bare)
    } else {
        None
    }
}

/// Period closing a sentence, not part of a `.` or `..` path segment.
fn strip_sentence_period(target: &str) -> &str {
    match target.strip_suffix('.') {
        Some(rest) if !rest.is_empty() && !rest.ends_with(['.', '/']) => rest,
        _ => target,
    }
}

fn trim_trailing(mut target: &str) -> &str {
    loop {
        let trimmed = strip_sentence_period(target.trim_end_matches(TRAILING_PUNCTUATION));
        if trimmed.len() == target.len() {
            return target;
        }
        target = trimmed;
    }
}

fn directive_of(token: &str) -> Option<Directive> {
    let target = trim_trailing(token.strip_prefix('@')?);
    let form = classify(target)?;
    Some(Directive {
        raw: format!("@{target}"),
        form,
    })
}

/// All import directives in `text`, in reading order.
pub fn parse_directives(text: &str) -> Vec<Directive> {
    let mut in_fence = false;
    let mut directives = Vec::new();
    for line in text.lines() {
        if line.trim_start().starts_with(FENCE) {
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            continue;
        }
        directives.extend(line.split_whitespace().filter_map(directive_of));
    }
    directives
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raws(text: &str) -> Vec<String> {
        parse_directives(text).into_iter().map(|d| d.raw).collect()
    }

    #[test]
    fn test_classify_forms() {
        assert_eq!(classify("~/notes.md"), Some(ImportForm::Home));
        assert_eq!(classify("/etc/team.md"), Some(ImportForm::Absolute));
        assert_eq!(classify("./a.md"), Some(ImportForm::Relative));
        assert_eq!(classify("../shared/rules"), Some(ImportForm::Relative));
        assert_eq!(classify("docs/style.md"), Some(ImportForm::Bare));
        assert_eq!(classify("docs/style.txt"), None);
        assert_eq!(classify("README.md"), None);
        assert_eq!(classify("username"), None);
        assert_eq!(classify(""), None);
    }

    #[test]
    fn test_tokens_and_trailing_punctuation() {
        let text = "See @./a.md, and (@docs/b.md) plus @~/c.md;\nmail me@example.com or @someone\n";
        assert_eq!(raws(text), vec!["@./a.md", "@~/c.md"]);
    }

    #[test]
    fn test_closing_punctuation_is_stripped() {
        assert_eq!(raws("- @docs/b.md)"), vec!["@docs/b.md"]);
        assert_eq!(raws("@/abs/x.md]:"), vec!["@/abs/x.md"]);
    }

    #[test]
    fn test_sentence_period_is_stripped() {
        assert_eq!(raws("Follow @./rules.md."), vec!["@./rules.md"]);
        assert_eq!(raws("(see @docs/style.md)."), vec!["@docs/style.md"]);
        assert_eq!(raws("up @../.. or here @./."), vec!["@../..", "@./."]);
    }

    #[test]
    fn test_fenced_blocks_are_ignored() {
        let text = "@./before.md\n```bash\n@./inside.md\n```\n  ```\n@./indented-fence.md\n```\n@./after.md\n";
        assert_eq!(raws(text), vec!["@./before.md", "@./after.md"]);
    }

    #[test]
    fn test_unterminated_fence_hides_rest() {
        assert_eq!(raws("@./a.md\n```\n@./b.md\n"), vec!["@./a.md"]);
    }

    #[test]
    fn test_resolve_forms() {
        let base = Path::new("/repo/docs");
        let home = Path::new("/home/me");

        let rel = directive_of("@../CLAUDE.md").unwrap();
        assert_eq!(
            rel.resolve(base, home),
            (PathBuf::from("/repo/CLAUDE.md"), PathBuf::from("/repo/docs"))
        );

        let bare = directive_of("@team/rules.md").unwrap();
        assert_eq!(bare.resolve(base, home).0, PathBuf::from("/repo/docs/team/rules.md"));

        let tilde = directive_of("@~/.claude/extra.md").unwrap();
        assert_eq!(
            tilde.resolve(base, home),
            (
                PathBuf::from("/home/me/.claude/extra.md"),
                PathBuf::from("/home/me")
            )
        );

        let abs = directive_of("@/etc/./shared.md").unwrap();
        assert_eq!(
            abs.resolve(base, home),
            (PathBuf::from("/etc/shared.md"), PathBuf::from("/repo/docs"))
        );
    }
}
