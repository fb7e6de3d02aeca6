use crate::classifier::conventional::BREAKING_CHANGE_SECTION;
use crate::classifier::CommitClassifier;
use crate::domain::commit::{self, BREAKING_CHANGE_FOOTERS};
use crate::git::{CommitInfo, TagInfo};
use chrono::DateTime;
use std::fmt::Write;

/// Heading used for commits not covered by any tag
pub const UNRELEASED: &str = "Unreleased";

/// A single changelog line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    pub scope: Option<String>,
    pub message: String,
}

/// One version section of the changelog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangelogEntry {
    pub version: String,
    pub date: Option<String>,
    /// Sections in first-seen order
    pub changes: Vec<(String, Vec<Change>)>,
}

impl ChangelogEntry {
    fn new(version: impl Into<String>, date: Option<String>) -> Self {
        ChangelogEntry {
            version: version.into(),
            date,
            changes: Vec::new(),
        }
    }

    fn push(&mut self, section: String, change: Change) {
        match self.changes.iter_mut().find(|(title, _)| *title == section) {
            Some((_, changes)) => changes.push(change),
            None => self.changes.push((section, vec![change])),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Format this entry as Markdown
    pub fn to_markdown(&self) -> String {
        let mut output = String::new();

        let _ = write!(output, "## {}", self.version);
        if let Some(date) = &self.date {
            let _ = write!(output, " ({})", date);
        }
        output.push_str("\n\n");

        for (title, changes) in &self.changes {
            let _ = writeln!(output, "### {}\n", title);
            for change in changes {
                match &change.scope {
                    Some(scope) => {
                        let _ = writeln!(output, "- **{}**: {}", scope, change.message);
                    }
                    None => {
                        let _ = writeln!(output, "- {}", change.message);
                    }
                }
            }
            output.push('\n');
        }

        output
    }
}

/// `YYYY-MM-DD` of a Unix timestamp
pub fn format_date(timestamp: i64) -> Option<String> {
    DateTime::from_timestamp(timestamp, 0).map(|d| d.format("%Y-%m-%d").to_string())
}

/// Group commits (newest first) into version sections.
///
/// The first section collects commits newer than any tag and is headed by
/// `unreleased_version` dated `today`, or by "Unreleased" when no version is given.
/// Each tagged commit opens a new section headed by the tag name. Commits whose subject
/// does not match the classifier's changelog pattern are left out; breaking-change
/// footers of included commits get their own entries.
pub fn build_tree<C: CommitClassifier + ?Sized>(
    commits: &[CommitInfo],
    tags: &[TagInfo],
    classifier: &C,
    unreleased_version: Option<&str>,
    today: &str,
) -> Vec<ChangelogEntry> {
    let mut entries = Vec::new();
    let mut current = match unreleased_version {
        Some(version) => ChangelogEntry::new(version, Some(today.to_string())),
        None => ChangelogEntry::new(UNRELEASED, None),
    };
    let mut used_tags: Vec<&str> = Vec::new();

    for commit in commits {
        if let Some(tag) = tags
            .iter()
            .find(|t| t.commit == commit.hash && !used_tags.contains(&t.name.as_str()))
        {
            used_tags.push(&tag.name);
            let next = ChangelogEntry::new(tag.name.clone(), format_date(tag.timestamp));
            entries.push(std::mem::replace(&mut current, next));
        }

        let subject = commit::subject(&commit.message);
        if !classifier.changelog_pattern().is_match(subject) {
            continue;
        }

        if let Some(parsed) = classifier.parse(&commit.message) {
            current.push(
                classifier.section_title(&parsed.change_type),
                Change {
                    scope: parsed.scope,
                    message: parsed.message,
                },
            );
        }

        for line in commit.message.lines().skip(1) {
            let line = line.trim();
            if let Some(text) = BREAKING_CHANGE_FOOTERS
                .iter()
                .find_map(|token| line.strip_prefix(token))
            {
                current.push(
                    BREAKING_CHANGE_SECTION.to_string(),
                    Change {
                        scope: None,
                        message: text.trim().to_string(),
                    },
                );
            }
        }
    }
    entries.push(current);

    // An empty leading section is dropped unless it announces a version not tagged yet
    let redundant = |first: &ChangelogEntry| {
        first.is_empty()
            && (unreleased_version.is_none() || tags.iter().any(|t| t.name == first.version))
    };
    if entries.first().is_some_and(redundant) {
        entries.remove(0);
    }

    entries
}

/// Render sections newest first
pub fn render(entries: &[ChangelogEntry]) -> String {
    entries
        .iter()
        .map(ChangelogEntry::to_markdown)
        .collect::<String>()
        .trim_start_matches('\n')
        .to_string()
}
