//! Git operations abstraction layer
//!
//! The bump workflow only talks to the [Repository] trait. Two implementations exist:
//!
//! - [repository::Git2Repository]: a real repository driven through the `git2` crate
//! - [mock::MockRepository]: an in-memory repository for tests
//!
//! ```rust
//! # use git_bump::git::Repository;
//! # fn example<R: Repository>(repo: &R) -> git_bump::Result<()> {
//! let tags = repo.list_tags()?;
//! let since = tags.first().map(|t| t.name.as_str());
//! let commits = repo.list_commits(since)?;
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::error::Result;
use std::path::PathBuf;

/// Commit information for analysis
#[derive(Debug, Clone, PartialEq)]
pub struct CommitInfo {
    /// Full commit hash
    pub hash: String,
    /// Full commit message (subject and body)
    pub message: String,
    /// The commit author
    pub author: String,
    /// Commit time in seconds since the Unix epoch
    pub timestamp: i64,
}

/// A tag and the commit it points to
#[derive(Debug, Clone, PartialEq)]
pub struct TagInfo {
    pub name: String,
    /// Hash of the tagged commit (annotated tags are peeled)
    pub commit: String,
    /// Commit time of the tagged commit
    pub timestamp: i64,
}

/// Result of a write operation, shaped like a git command invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitOutput {
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl GitOutput {
    pub fn success(stdout: impl Into<String>) -> Self {
        GitOutput {
            code: 0,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn failure(stderr: impl Into<String>) -> Self {
        GitOutput {
            code: 1,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == 0
    }
}

/// Options for the bump commit
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommitOptions {
    /// Skip the `pre-commit` and `commit-msg` hooks
    pub no_verify: bool,
    /// Untracked files to stage in addition to all modified tracked files
    pub extra_paths: Vec<PathBuf>,
}

/// Repository operations needed by the bump and changelog workflows
///
/// Read operations return `Err` on failure. Write operations report failure through
/// a non-zero [GitOutput::code] so callers can react to a rejected commit (for example
/// a failing hook) the same way they react to a broken repository.
pub trait Repository {
    /// All tags pointing at commits, newest tagged commit first
    fn list_tags(&self) -> Result<Vec<TagInfo>>;

    /// Whether a tag with this exact name exists
    fn tag_exists(&self, name: &str) -> Result<bool> {
        Ok(self.list_tags()?.iter().any(|t| t.name == name))
    }

    /// Commits reachable from HEAD, newest first.
    ///
    /// With `since` (a tag name or revision) the commits reachable from it are excluded.
    /// An unborn HEAD yields an empty list.
    fn list_commits(&self, since: Option<&str>) -> Result<Vec<CommitInfo>>;

    /// Stage modified files and create a commit on HEAD
    fn commit(&self, message: &str, options: &CommitOptions) -> Result<GitOutput>;

    /// Tag HEAD; an annotation makes it an annotated tag
    fn tag(&self, name: &str, annotation: Option<&str>) -> Result<GitOutput>;
}
