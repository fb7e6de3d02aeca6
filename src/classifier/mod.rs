//! Commit classification
//!
//! A [CommitClassifier] owns the commit-message grammar: it decides which increment a
//! commit implies and how commits are grouped in the changelog. The workflow receives
//! one explicitly instead of looking it up in global state; [by_name] is only the
//! command-line entry point to the built-in implementations.

pub mod conventional;

pub use conventional::ConventionalCommits;

use crate::config::Config;
use crate::domain::{Increment, ParsedCommit};
use crate::error::{BumpError, Result};
use crate::git::CommitInfo;
use regex::Regex;

/// Grammar and increment rules for commit messages
pub trait CommitClassifier {
    /// Registry name of the classifier
    fn name(&self) -> &str;

    /// Grammar for a commit subject, with `change_type`, `scope`, `breaking` and
    /// `message` named groups
    fn commit_parser(&self) -> &Regex;

    /// Subjects matching this pattern get a changelog entry
    fn changelog_pattern(&self) -> &Regex;

    /// Changelog section title for a change type
    fn section_title(&self, change_type: &str) -> String;

    /// Increment implied by a single commit, if any
    fn increment_for(&self, commit: &CommitInfo) -> Option<Increment>;

    /// Parse a commit subject with [Self::commit_parser]
    fn parse(&self, message: &str) -> Option<ParsedCommit> {
        let subject = crate::domain::commit::subject(message);
        let captures = self.commit_parser().captures(subject)?;
        ParsedCommit::from_captures(&captures, message)
    }
}

/// Highest increment implied by `commits`, or `None` when no commit warrants a release
pub fn find_increment<C: CommitClassifier + ?Sized>(
    classifier: &C,
    commits: &[CommitInfo],
) -> Option<Increment> {
    commits
        .iter()
        .filter_map(|commit| classifier.increment_for(commit))
        .max()
}

/// Names accepted by [by_name]
pub const REGISTERED_CLASSIFIERS: &[&str] = &[conventional::NAME];

/// Look up a built-in classifier by name.
///
/// An unknown name is a fatal configuration error.
pub fn by_name(name: &str, config: &Config) -> Result<Box<dyn CommitClassifier>> {
    match name {
        conventional::NAME => Ok(Box::new(ConventionalCommits::with_bump_map(
            &config.bump_map,
        )?)),
        other => Err(BumpError::UnknownClassifier(other.to_string())),
    }
}
