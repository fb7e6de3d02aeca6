use crate::error::{BumpError, Result};
use crate::git::{CommitInfo, CommitOptions, GitOutput, TagInfo};
use crate::hooks::{self, HookExecutor, HookType};
use git2::{ErrorCode, Repository as Git2Repo, Sort};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Discover the repository containing `path`.
    ///
    /// Fails with [BumpError::NotAGitProject] when `path` is not inside a work tree.
    pub fn discover<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path.as_ref())
            .map_err(|e| BumpError::NotAGitProject(e.message().to_string()))?;

        if repo.is_bare() {
            return Err(BumpError::NotAGitProject(
                "bare repositories have no work tree".to_string(),
            ));
        }

        Ok(Git2Repository { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }

    /// Root of the work tree
    pub fn workdir(&self) -> Result<&Path> {
        self.repo
            .workdir()
            .ok_or_else(|| BumpError::NotAGitProject("repository has no work tree".to_string()))
    }

    /// Path of `path` relative to the work tree, as the index expects it
    fn index_path(&self, path: &Path) -> Result<PathBuf> {
        let workdir = self.workdir()?.canonicalize()?;
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()?.join(path)
        };
        let absolute = absolute.canonicalize()?;

        absolute
            .strip_prefix(&workdir)
            .map(Path::to_path_buf)
            .map_err(|_| {
                BumpError::config(format!(
                    "{} is outside the repository work tree",
                    path.display()
                ))
            })
    }

    fn run_hook(&self, hook: HookType, args: &[&Path]) -> Result<GitOutput> {
        let hooks_dir = hooks::hooks_dir(&self.repo)?;
        HookExecutor::run(&hooks_dir, hook, args, self.workdir()?)
    }

    /// Stage all modified tracked files plus `extra_paths` and write the index to disk
    fn stage(&self, options: &CommitOptions) -> Result<()> {
        let mut index = self.repo.index()?;
        index.update_all(["*"].iter(), None)?;
        for path in &options.extra_paths {
            index.add_path(&self.index_path(path)?)?;
        }
        index.write()?;
        Ok(())
    }

    /// Raw bytes of `$GIT_DIR/index`, `None` when the repository has no index yet
    fn read_index_file(&self) -> Result<Option<Vec<u8>>> {
        match fs::read(self.repo.path().join("index")) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Put the index file back as it was before staging and reload it
    fn restore_index_file(&self, saved: Option<&[u8]>) -> std::io::Result<()> {
        let path = self.repo.path().join("index");
        match saved {
            Some(bytes) => fs::write(&path, bytes)?,
            None if path.exists() => fs::remove_file(&path)?,
            None => {}
        }

        self.repo
            .index()
            .and_then(|mut index| index.read(true))
            .map_err(std::io::Error::other)
    }

    fn stage_and_commit(&self, message: &str, options: &CommitOptions) -> Result<GitOutput> {
        self.stage(options)?;
        let mut message = message.to_string();

        if !options.no_verify {
            let pre_commit = self.run_hook(HookType::PreCommit, &[])?;
            if !pre_commit.is_success() {
                return Ok(pre_commit);
            }

            // commit-msg receives a file it may rewrite
            let msg_file = self.repo.path().join("COMMIT_EDITMSG");
            fs::write(&msg_file, &message)?;
            let commit_msg = self.run_hook(HookType::CommitMsg, &[msg_file.as_path()])?;
            if !commit_msg.is_success() {
                return Ok(commit_msg);
            }
            message = fs::read_to_string(&msg_file)?;
        }

        self.write_commit(&message)
    }

    fn write_commit(&self, message: &str) -> Result<GitOutput> {
        // Hooks may have staged more changes
        let mut index = self.repo.index()?;
        index.read(true)?;

        let tree = self.repo.find_tree(index.write_tree()?)?;
        let signature = self.repo.signature()?;
        let parent = match self.repo.head() {
            Ok(head) => Some(head.peel_to_commit()?),
            Err(e) if e.code() == ErrorCode::UnbornBranch => None,
            Err(e) => return Err(e.into()),
        };
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();

        let oid = self
            .repo
            .commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)?;

        debug!(commit = %oid, "created bump commit");
        Ok(GitOutput::success(format!(
            "[{}] {}",
            &oid.to_string()[..7],
            crate::domain::commit::subject(message)
        )))
    }

    fn write_tag(&self, name: &str, annotation: Option<&str>) -> Result<GitOutput> {
        let head = self.repo.head()?.peel_to_commit()?;

        match annotation {
            Some(message) => {
                let signature = self.repo.signature()?;
                self.repo
                    .tag(name, head.as_object(), &signature, message, false)?;
            }
            None => {
                self.repo.tag_lightweight(name, head.as_object(), false)?;
            }
        }

        debug!(tag = name, annotated = annotation.is_some(), "created tag");
        Ok(GitOutput::success(String::new()))
    }
}

impl super::Repository for Git2Repository {
    fn list_tags(&self) -> Result<Vec<TagInfo>> {
        let names = self.repo.tag_names(None)?;
        let mut tags = Vec::new();

        for name in names.iter().flatten() {
            let reference = self.repo.find_reference(&format!("refs/tags/{}", name))?;
            // Tags on trees or blobs cannot mark a release
            let Ok(commit) = reference.peel_to_commit() else {
                continue;
            };

            tags.push(TagInfo {
                name: name.to_string(),
                commit: commit.id().to_string(),
                timestamp: commit.time().seconds(),
            });
        }

        tags.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then_with(|| b.name.cmp(&a.name)));
        Ok(tags)
    }

    fn tag_exists(&self, name: &str) -> Result<bool> {
        match self.repo.find_reference(&format!("refs/tags/{}", name)) {
            Ok(_) => Ok(true),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn list_commits(&self, since: Option<&str>) -> Result<Vec<CommitInfo>> {
        match self.repo.head() {
            Ok(_) => {}
            Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        }

        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        revwalk.push_head()?;

        if let Some(rev) = since {
            let boundary = self.repo.revparse_single(rev)?.peel_to_commit()?;
            revwalk.hide(boundary.id())?;
        }

        let mut commits = Vec::new();
        for oid in revwalk {
            let commit = self.repo.find_commit(oid?)?;
            commits.push(CommitInfo {
                hash: commit.id().to_string(),
                message: commit.message().unwrap_or("(empty message)").to_string(),
                author: commit.author().name().unwrap_or("unknown").to_string(),
                timestamp: commit.time().seconds(),
            });
        }

        debug!(since = ?since, count = commits.len(), "listed commits");
        Ok(commits)
    }

    fn commit(&self, message: &str, options: &CommitOptions) -> Result<GitOutput> {
        let saved_index = self.read_index_file()?;

        let result = match self.stage_and_commit(message, options) {
            Err(BumpError::Git(e)) => Ok(GitOutput::failure(e.message().to_string())),
            other => other,
        };
        if matches!(result, Ok(ref output) if output.is_success()) {
            return result;
        }

        debug!("commit did not happen, restoring the index");
        match self.restore_index_file(saved_index.as_deref()) {
            Ok(()) => result,
            Err(rollback) => Err(BumpError::RollbackFailed {
                original: Box::new(match result {
                    Ok(output) => BumpError::CommitFailed {
                        stderr: output.stderr.trim().to_string(),
                    },
                    Err(e) => e,
                }),
                rollback,
            }),
        }
    }

    fn tag(&self, name: &str, annotation: Option<&str>) -> Result<GitOutput> {
        match self.write_tag(name, annotation) {
            Ok(output) => Ok(output),
            Err(BumpError::Git(e)) => Ok(GitOutput::failure(e.message().to_string())),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_discover_outside_repository_fails() {
        let dir = TempDir::new().unwrap();
        let result = Git2Repository::discover(dir.path());
        assert!(matches!(result, Err(BumpError::NotAGitProject(_))));
    }

    #[test]
    fn test_unborn_head_has_no_commits() {
        use crate::git::Repository;

        let dir = TempDir::new().unwrap();
        Git2Repo::init(dir.path()).unwrap();
        let repo = Git2Repository::discover(dir.path()).unwrap();

        assert!(repo.list_commits(None).unwrap().is_empty());
        assert!(repo.list_tags().unwrap().is_empty());
        assert!(!repo.tag_exists("0.1.0").unwrap());
    }
}
