use std::fmt;

/// Non-fatal conditions met during a bump.
/// These do not stop the workflow but should be reported to the user.
#[derive(Debug, Clone, PartialEq)]
pub enum BumpWarning {
    /// The current version has no tag; every reachable commit is considered
    InitialRelease { tag: String },
    /// The changelog could not be written; the release goes on without it
    ChangelogFailed { path: String, reason: String },
    /// The bump commit exists but its tag could not be created
    UntaggedCommit { tag: String },
}

impl fmt::Display for BumpWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BumpWarning::InitialRelease { tag } => {
                write!(
                    f,
                    "Tag '{}' not found, treating this as the initial release",
                    tag
                )
            }
            BumpWarning::ChangelogFailed { path, reason } => {
                write!(f, "Changelog '{}' was not updated: {}", path, reason)
            }
            BumpWarning::UntaggedCommit { tag } => {
                write!(
                    f,
                    "The bump commit was kept but is not tagged; create '{}' manually",
                    tag
                )
            }
        }
    }
}
