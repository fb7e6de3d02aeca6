use crate::error::{BumpError, Result};
use crate::git::{CommitInfo, CommitOptions, GitOutput, Repository, TagInfo};
use std::cell::RefCell;

const BASE_TIMESTAMP: i64 = 1_700_000_000;

/// A tag created through [Repository::tag]
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedTag {
    pub name: String,
    pub annotation: Option<String>,
}

#[derive(Debug, Default)]
struct MockState {
    /// Newest first, like `git log`
    commits: Vec<CommitInfo>,
    tags: Vec<TagInfo>,
    created_commits: Vec<(String, CommitOptions)>,
    created_tags: Vec<CreatedTag>,
    commit_failure: Option<String>,
    tag_failure: Option<String>,
}

/// In-memory repository for testing without actual git operations.
///
/// History is linear. Write operations append to the history so a workflow can be
/// observed end to end, and either write can be configured to fail.
#[derive(Debug, Default)]
pub struct MockRepository {
    state: RefCell<MockState>,
}

impl MockRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a commit on top of HEAD and return its hash
    pub fn add_commit(&self, message: impl Into<String>) -> String {
        let mut state = self.state.borrow_mut();
        let n = state.commits.len() as i64 + 1;
        let commit = CommitInfo {
            hash: format!("{:040x}", n),
            message: message.into(),
            author: "Test Author".to_string(),
            timestamp: BASE_TIMESTAMP + n * 86_400,
        };
        let hash = commit.hash.clone();
        state.commits.insert(0, commit);
        hash
    }

    /// Tag the current HEAD
    pub fn add_tag(&self, name: impl Into<String>) {
        let mut state = self.state.borrow_mut();
        let head = state
            .commits
            .first()
            .cloned()
            .expect("cannot tag an empty mock repository");
        state.tags.push(TagInfo {
            name: name.into(),
            commit: head.hash,
            timestamp: head.timestamp,
        });
    }

    /// Make every later commit attempt fail with `stderr`
    pub fn fail_commit(&self, stderr: impl Into<String>) {
        self.state.borrow_mut().commit_failure = Some(stderr.into());
    }

    /// Make every later tag attempt fail with `stderr`
    pub fn fail_tag(&self, stderr: impl Into<String>) {
        self.state.borrow_mut().tag_failure = Some(stderr.into());
    }

    /// Commits created through [Repository::commit], oldest first
    pub fn created_commits(&self) -> Vec<(String, CommitOptions)> {
        self.state.borrow().created_commits.clone()
    }

    /// Tags created through [Repository::tag], oldest first
    pub fn created_tags(&self) -> Vec<CreatedTag> {
        self.state.borrow().created_tags.clone()
    }

    fn resolve(&self, rev: &str) -> Result<String> {
        let state = self.state.borrow();
        if let Some(tag) = state.tags.iter().find(|t| t.name == rev) {
            return Ok(tag.commit.clone());
        }
        state
            .commits
            .iter()
            .find(|c| c.hash == rev)
            .map(|c| c.hash.clone())
            .ok_or_else(|| {
                BumpError::Git(git2::Error::from_str(&format!(
                    "revspec '{}' not found",
                    rev
                )))
            })
    }
}

impl Repository for MockRepository {
    fn list_tags(&self) -> Result<Vec<TagInfo>> {
        let mut tags = self.state.borrow().tags.clone();
        tags.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then_with(|| b.name.cmp(&a.name)));
        Ok(tags)
    }

    fn list_commits(&self, since: Option<&str>) -> Result<Vec<CommitInfo>> {
        let boundary = since.map(|rev| self.resolve(rev)).transpose()?;
        let state = self.state.borrow();

        Ok(state
            .commits
            .iter()
            .take_while(|c| Some(&c.hash) != boundary.as_ref())
            .cloned()
            .collect())
    }

    fn commit(&self, message: &str, options: &CommitOptions) -> Result<GitOutput> {
        if let Some(stderr) = self.state.borrow().commit_failure.clone() {
            return Ok(GitOutput::failure(stderr));
        }

        self.add_commit(message);
        self.state
            .borrow_mut()
            .created_commits
            .push((message.to_string(), options.clone()));
        Ok(GitOutput::success(message.to_string()))
    }

    fn tag(&self, name: &str, annotation: Option<&str>) -> Result<GitOutput> {
        if let Some(stderr) = self.state.borrow().tag_failure.clone() {
            return Ok(GitOutput::failure(stderr));
        }
        if self.tag_exists(name)? {
            return Ok(GitOutput::failure(format!("tag '{}' already exists", name)));
        }
        if self.state.borrow().commits.is_empty() {
            return Ok(GitOutput::failure("HEAD does not point to a commit"));
        }

        self.add_tag(name);
        self.state.borrow_mut().created_tags.push(CreatedTag {
            name: name.to_string(),
            annotation: annotation.map(str::to_string),
        });
        Ok(GitOutput::success(String::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_repository_commits_newest_first() {
        let repo = MockRepository::new();
        repo.add_commit("feat: first");
        repo.add_commit("fix: second");

        let commits = repo.list_commits(None).unwrap();
        assert_eq!(commits.len(), 2);
        assert_eq!(commits[0].message, "fix: second");
        assert!(commits[0].timestamp > commits[1].timestamp);
    }

    #[test]
    fn test_mock_repository_commits_since_tag() {
        let repo = MockRepository::new();
        repo.add_commit("feat: first");
        repo.add_tag("1.0.0");
        repo.add_commit("fix: after release");

        let commits = repo.list_commits(Some("1.0.0")).unwrap();
        assert_eq!(commits.len(), 1);
        assert_eq!(commits[0].message, "fix: after release");
    }

    #[test]
    fn test_mock_repository_unknown_revision() {
        let repo = MockRepository::new();
        repo.add_commit("feat: first");
        assert!(repo.list_commits(Some("9.9.9")).is_err());
    }

    #[test]
    fn test_mock_repository_tags() {
        let repo = MockRepository::new();
        repo.add_commit("feat: first");
        repo.add_tag("v1.0.0");

        assert!(repo.tag_exists("v1.0.0").unwrap());
        assert!(!repo.tag_exists("v2.0.0").unwrap());
    }

    #[test]
    fn test_mock_repository_records_writes() {
        let repo = MockRepository::new();
        repo.add_commit("feat: first");

        let out = repo
            .commit("bump: version 0.1.0 → 0.2.0", &CommitOptions::default())
            .unwrap();
        assert!(out.is_success());
        let out = repo.tag("0.2.0", Some("## 0.2.0")).unwrap();
        assert!(out.is_success());

        assert_eq!(repo.created_commits().len(), 1);
        assert_eq!(
            repo.created_tags(),
            vec![CreatedTag {
                name: "0.2.0".to_string(),
                annotation: Some("## 0.2.0".to_string()),
            }]
        );
        assert!(!repo.tag("0.2.0", None).unwrap().is_success());
    }

    #[test]
    fn test_mock_repository_configured_failures() {
        let repo = MockRepository::new();
        repo.add_commit("feat: first");
        repo.fail_commit("hook rejected");
        repo.fail_tag("locked");

        let out = repo.commit("msg", &CommitOptions::default()).unwrap();
        assert_eq!(out.stderr, "hook rejected");
        assert!(!repo.tag("1.0.0", None).unwrap().is_success());
        assert!(repo.created_commits().is_empty());
    }
}
