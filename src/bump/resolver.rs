use crate::domain::TagFormat;
use crate::error::{BumpError, Result};
use crate::git::{CommitInfo, Repository};
use semver::Version;
use tracing::{debug, info};

/// Commits relevant to the next release
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// Tag the current version renders to
    pub current_tag: String,
    /// Commits since the current tag (or all commits for an initial release), newest first
    pub commits: Vec<CommitInfo>,
    pub is_initial: bool,
}

/// Determines the commit range of the next release
pub struct VersionResolver<'a, R: Repository + ?Sized> {
    repo: &'a R,
    autoconfirm_initial_tag: bool,
}

impl<'a, R: Repository + ?Sized> VersionResolver<'a, R> {
    pub fn new(repo: &'a R, autoconfirm_initial_tag: bool) -> Self {
        VersionResolver {
            repo,
            autoconfirm_initial_tag,
        }
    }

    /// Resolve the current tag and the commits made since it.
    ///
    /// When the current tag does not exist the release is initial (if confirmed by
    /// configuration) and every commit reachable from HEAD counts. An empty commit set
    /// is [BumpError::NoCommitsFound] unless the current version is a prerelease,
    /// which may legitimately be re-cut without new commits.
    pub fn resolve(&self, current_version: &Version, tag_format: &TagFormat) -> Result<Resolution> {
        let current_tag = tag_format.render(current_version);
        let is_initial = self.is_initial_tag(&current_tag)?;

        let commits = if is_initial {
            self.repo.list_commits(None)?
        } else {
            self.repo.list_commits(Some(&current_tag))?
        };
        debug!(tag = %current_tag, is_initial, commits = commits.len(), "resolved commit range");

        if commits.is_empty() && current_version.pre.is_empty() {
            return Err(BumpError::NoCommitsFound { since: current_tag });
        }

        Ok(Resolution {
            current_tag,
            commits,
            is_initial,
        })
    }

    fn is_initial_tag(&self, current_tag: &str) -> Result<bool> {
        if self.repo.tag_exists(current_tag)? {
            return Ok(false);
        }

        if !self.autoconfirm_initial_tag {
            return Err(BumpError::CurrentTagNotFound {
                tag: current_tag.to_string(),
            });
        }

        info!(tag = current_tag, "tag not found, treating this as the initial release");
        Ok(true)
    }
}
