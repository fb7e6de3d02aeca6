use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for git-bump operations
#[derive(Error, Debug)]
pub enum BumpError {
    #[error("Not a git repository: {0}")]
    NotAGitProject(String),

    #[error("[NO_COMMITS_FOUND] No new commits found since {since}")]
    NoCommitsFound { since: String },

    #[error(
        "Tag '{tag}' could not be found and initial release was not confirmed \
         (enable autoconfirm_initial_tag or check the tag format)"
    )]
    CurrentTagNotFound { tag: String },

    #[error("Version '{version}' not found in {}", path.display())]
    VersionInconsistency { path: PathBuf, version: String },

    #[error("Commit failed: {stderr}")]
    CommitFailed { stderr: String },

    #[error("{original}; restoring the version files also failed: {rollback}")]
    RollbackFailed {
        original: Box<BumpError>,
        rollback: std::io::Error,
    },

    #[error("Tag '{tag}' could not be created: {stderr}")]
    TagFailed { tag: String, stderr: String },

    #[error("No tag found for changelog version '{0}'")]
    NoRevision(String),

    #[error("Commit classifier '{0}' is not registered")]
    UnknownClassifier(String),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Version parsing error: {0}")]
    Version(String),

    #[error("Hook error: {0}")]
    Hook(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in git-bump
pub type Result<T> = std::result::Result<T, BumpError>;

impl BumpError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        BumpError::Config(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        BumpError::Version(msg.into())
    }

    /// Create a hook error with context
    pub fn hook(msg: impl Into<String>) -> Self {
        BumpError::Hook(msg.into())
    }
}

impl From<semver::Error> for BumpError {
    fn from(err: semver::Error) -> Self {
        BumpError::Version(err.to_string())
    }
}

impl From<toml::de::Error> for BumpError {
    fn from(err: toml::de::Error) -> Self {
        BumpError::Config(err.to_string())
    }
}

impl From<regex::Error> for BumpError {
    fn from(err: regex::Error) -> Self {
        BumpError::Config(format!("invalid regular expression: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BumpError::config("test config issue");
        assert_eq!(err.to_string(), "Configuration error: test config issue");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: BumpError = io_err.into();
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_error_from_semver() {
        let err: BumpError = semver::Version::parse("not-a-version").unwrap_err().into();
        assert!(err.to_string().starts_with("Version parsing error"));
    }

    #[test]
    fn test_version_inconsistency_names_file() {
        let err = BumpError::VersionInconsistency {
            path: PathBuf::from("pkg/_metadata.py"),
            version: "1.2.0".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("1.2.0"));
        assert!(msg.contains("pkg/_metadata.py"));
    }

    #[test]
    fn test_rollback_failed_reports_both_causes() {
        let err = BumpError::RollbackFailed {
            original: Box::new(BumpError::CommitFailed {
                stderr: "pre-commit hook rejected".to_string(),
            }),
            rollback: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
        };
        let msg = err.to_string();
        assert!(msg.contains("pre-commit hook rejected"));
        assert!(msg.contains("read-only"));
    }

    #[test]
    fn test_error_messages_are_descriptive() {
        let error_pairs = vec![
            (BumpError::config("x"), "Configuration error"),
            (BumpError::version("x"), "Version parsing error"),
            (BumpError::hook("x"), "Hook error"),
            (
                BumpError::NoCommitsFound {
                    since: "1.0.0".to_string(),
                },
                "[NO_COMMITS_FOUND]",
            ),
            (
                BumpError::UnknownClassifier("cz_custom".to_string()),
                "Commit classifier",
            ),
        ];

        for (err, expected_prefix) in error_pairs {
            let msg = err.to_string();
            assert!(
                msg.starts_with(expected_prefix),
                "Error message should start with '{}', but got '{}'",
                expected_prefix,
                msg
            );
        }
    }
}
