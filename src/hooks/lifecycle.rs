use crate::error::Result;
use std::path::PathBuf;

/// Repository hooks that guard the bump commit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookType {
    PreCommit,
    CommitMsg,
}

impl HookType {
    /// File name of the hook inside the hooks directory
    pub fn name(&self) -> &'static str {
        match self {
            HookType::PreCommit => "pre-commit",
            HookType::CommitMsg => "commit-msg",
        }
    }
}

/// Directory holding the repository's hooks.
///
/// Honors `core.hooksPath` (relative values resolve against the work tree, like git
/// does for non-bare repositories), falling back to `$GIT_DIR/hooks`.
pub fn hooks_dir(repo: &git2::Repository) -> Result<PathBuf> {
    let configured = repo
        .config()
        .ok()
        .and_then(|config| config.get_path("core.hooksPath").ok());

    Ok(match configured {
        Some(path) if path.is_absolute() => path,
        Some(path) => repo.workdir().unwrap_or_else(|| repo.path()).join(path),
        None => repo.path().join("hooks"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_hook_names() {
        assert_eq!(HookType::PreCommit.name(), "pre-commit");
        assert_eq!(HookType::CommitMsg.name(), "commit-msg");
    }

    #[test]
    fn test_default_hooks_dir() {
        let dir = TempDir::new().unwrap();
        let repo = git2::Repository::init(dir.path()).unwrap();
        assert_eq!(hooks_dir(&repo).unwrap(), repo.path().join("hooks"));
    }

    #[test]
    fn test_relative_hooks_path_resolves_against_workdir() {
        let dir = TempDir::new().unwrap();
        let repo = git2::Repository::init(dir.path()).unwrap();
        repo.config()
            .unwrap()
            .set_str("core.hooksPath", ".githooks")
            .unwrap();

        let resolved = hooks_dir(&repo).unwrap();
        assert!(resolved.ends_with(".githooks"));
        assert!(resolved.starts_with(repo.workdir().unwrap()));
    }
}
