//! Changelog generation from commit history.
//!
//! Sections are rendered newest first. In incremental mode the existing file is kept
//! and only the commits since the latest version it documents are rendered and
//! spliced in (see [metadata::incremental_build]).

pub mod metadata;
pub mod tree;

pub use metadata::{incremental_build, ChangelogMetadata};
pub use tree::{build_tree, render, ChangelogEntry};

use crate::classifier::CommitClassifier;
use crate::domain::TagFormat;
use crate::error::{BumpError, Result};
use crate::git::{Repository, TagInfo};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Options for a single changelog write
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangelogOptions {
    /// Heading of the newest section (the version about to be tagged)
    pub unreleased_version: Option<String>,
    /// Keep the existing file and only add what is new
    pub incremental: bool,
    /// Render without writing
    pub dry_run: bool,
}

/// Output of a changelog write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedChangelog {
    /// Every section rendered by this write
    pub content: String,
    /// Markdown of the newest section only
    pub release_notes: String,
}

/// Builds changelog files from a repository's history
pub struct ChangelogWriter<'a, R: Repository + ?Sized, C: CommitClassifier + ?Sized> {
    repo: &'a R,
    classifier: &'a C,
    tag_format: TagFormat,
}

impl<'a, R: Repository + ?Sized, C: CommitClassifier + ?Sized> ChangelogWriter<'a, R, C> {
    pub fn new(repo: &'a R, classifier: &'a C, tag_format: TagFormat) -> Self {
        ChangelogWriter {
            repo,
            classifier,
            tag_format,
        }
    }

    /// Render the changelog and, unless `dry_run`, write it to `path`.
    ///
    /// Fails with [BumpError::NoCommitsFound] when there are no commits to document
    /// and with [BumpError::NoRevision] when an incremental write cannot find the tag of
    /// the latest documented version.
    pub fn write(&self, path: &Path, options: &ChangelogOptions) -> Result<RenderedChangelog> {
        let today = chrono::Local::now().format("%Y-%m-%d").to_string();
        self.write_dated(path, options, &today)
    }

    pub(crate) fn write_dated(
        &self,
        path: &Path,
        options: &ChangelogOptions,
        today: &str,
    ) -> Result<RenderedChangelog> {
        let tags = self.repo.list_tags()?;

        let existing = if options.incremental && path.is_file() {
            Some(fs::read_to_string(path)?)
        } else {
            None
        };
        let metadata = existing
            .as_deref()
            .map(ChangelogMetadata::parse)
            .unwrap_or_default();

        let start_rev = match (&metadata.latest_version, options.incremental) {
            (Some(latest), true) => Some(self.find_incremental_rev(latest, &tags)?),
            _ => None,
        };
        debug!(start = ?start_rev, incremental = options.incremental, "building changelog");

        let commits = self.repo.list_commits(start_rev.as_deref())?;
        if commits.is_empty() {
            return Err(BumpError::NoCommitsFound {
                since: start_rev.unwrap_or_else(|| "the first commit".to_string()),
            });
        }

        let entries = build_tree(
            &commits,
            &tags,
            self.classifier,
            options.unreleased_version.as_deref(),
            today,
        );
        let rendered = RenderedChangelog {
            content: render(&entries),
            release_notes: entries
                .first()
                .map(ChangelogEntry::to_markdown)
                .unwrap_or_default(),
        };

        if options.dry_run {
            return Ok(rendered);
        }

        let output = match &existing {
            Some(content) => incremental_build(&rendered.content, content, &metadata),
            None => rendered.content.clone(),
        };
        fs::write(path, output)?;
        info!(path = %path.display(), sections = entries.len(), "changelog written");

        Ok(rendered)
    }

    /// Tag name documenting `latest_version`
    fn find_incremental_rev(&self, latest_version: &str, tags: &[TagInfo]) -> Result<String> {
        let candidate = semver::Version::parse(latest_version)
            .map(|v| self.tag_format.render(&v))
            .unwrap_or_else(|_| latest_version.to_string());

        tags.iter()
            .find(|t| t.name == candidate || t.name == latest_version)
            .map(|t| t.name.clone())
            .ok_or_else(|| BumpError::NoRevision(latest_version.to_string()))
    }
}

/// Name of the tag carrying the highest semantic version under `tag_format`
pub fn latest_version_tag(tags: &[TagInfo], tag_format: &TagFormat) -> Result<Option<String>> {
    let mut best: Option<(semver::Version, &str)> = None;
    for tag in tags {
        if let Some(version) = tag_format.parse_tag(&tag.name)? {
            if best.as_ref().map_or(true, |(b, _)| version > *b) {
                best = Some((version, &tag.name));
            }
        }
    }
    Ok(best.map(|(_, name)| name.to_string()))
}
