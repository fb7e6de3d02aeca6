//! The version bump workflow.
//!
//! [Bump::run] goes through resolve, classify and generate without side effects,
//! reports the result, and then updates the version files, the changelog, commits and
//! tags. Only the file update is compensated: a rejected commit restores every file
//! from a [files::FileSnapshot] taken beforehand. A failed tag leaves the bump commit
//! in place.

pub mod files;
pub mod resolver;

pub use files::{update_version_in_files, FileSnapshot, VersionFileEntry};
pub use resolver::{Resolution, VersionResolver};

use crate::changelog::{ChangelogOptions, ChangelogWriter};
use crate::classifier::{find_increment, CommitClassifier};
use crate::domain::{
    create_commit_message, generate_version, parse_version, Increment, PreReleaseType, TagFormat,
    DEFAULT_BUMP_MESSAGE, DEFAULT_TAG_FORMAT,
};
use crate::error::{BumpError, Result};
use crate::git::{CommitOptions, GitOutput, Repository};
use crate::ui;
use crate::warning::BumpWarning;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Changelog settings for a bump
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangelogSettings {
    pub path: PathBuf,
    pub incremental: bool,
}

/// Inputs of a single bump
#[derive(Debug, Clone, PartialEq)]
pub struct BumpOptions {
    /// Version currently released, e.g. "1.2.0"
    pub current_version: String,
    /// Files holding the version, as `path` or `path:regex`
    pub version_files: Vec<String>,
    /// Skip commit classification and use this increment
    pub increment: Option<Increment>,
    pub prerelease: Option<PreReleaseType>,
    pub tag_format: String,
    pub bump_message: String,
    pub check_consistency: bool,
    pub autoconfirm_initial_tag: bool,
    /// Stop after rewriting the version files
    pub update_files_only: bool,
    /// Report only
    pub dry_run: bool,
    /// Skip the repository's commit hooks
    pub no_verify: bool,
    /// Write a changelog section for the new version
    pub changelog: Option<ChangelogSettings>,
}

impl BumpOptions {
    /// Options with default settings for `current_version`
    pub fn new(current_version: impl Into<String>) -> Self {
        BumpOptions {
            current_version: current_version.into(),
            version_files: Vec::new(),
            increment: None,
            prerelease: None,
            tag_format: DEFAULT_TAG_FORMAT.to_string(),
            bump_message: DEFAULT_BUMP_MESSAGE.to_string(),
            check_consistency: true,
            autoconfirm_initial_tag: true,
            update_files_only: false,
            dry_run: false,
            no_verify: false,
            changelog: None,
        }
    }
}

/// What the workflow found before touching anything
#[derive(Debug, Clone, PartialEq)]
pub struct BumpReport {
    /// Message of the bump commit
    pub message: String,
    pub current_version: String,
    pub new_version: String,
    pub current_tag: String,
    pub new_tag: String,
    pub increment: Option<Increment>,
    pub is_initial: bool,
    /// Commits the increment was derived from
    pub commit_count: usize,
}

/// How a bump ended without error
#[derive(Debug, Clone, PartialEq)]
pub enum BumpOutcome {
    /// Files updated, committed and tagged
    Released(BumpReport),
    /// No commit warrants a new version
    NoIncrement(BumpReport),
    /// Nothing was changed on request
    DryRun(BumpReport),
    /// Version files updated, nothing committed
    FilesOnly(BumpReport),
}

impl BumpOutcome {
    pub fn report(&self) -> &BumpReport {
        match self {
            BumpOutcome::Released(report)
            | BumpOutcome::NoIncrement(report)
            | BumpOutcome::DryRun(report)
            | BumpOutcome::FilesOnly(report) => report,
        }
    }
}

/// Progress of the commit and tag stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseState {
    FilesUpdated,
    CommitAttempted,
    Committed,
    CommitFailed,
    TagAttempted,
    Tagged,
    TagFailed,
}

impl ReleaseState {
    fn advance(&mut self, next: ReleaseState) {
        debug!(from = ?*self, to = ?next, "release state");
        *self = next;
    }
}

/// The bump workflow over a repository and a commit classifier
pub struct Bump<'a, R: Repository + ?Sized, C: CommitClassifier + ?Sized> {
    repo: &'a R,
    classifier: &'a C,
}

impl<'a, R: Repository + ?Sized, C: CommitClassifier + ?Sized> Bump<'a, R, C> {
    pub fn new(repo: &'a R, classifier: &'a C) -> Self {
        Bump { repo, classifier }
    }

    /// Resolve, classify and generate the next version without side effects.
    pub fn plan(&self, options: &BumpOptions) -> Result<BumpReport> {
        let current = parse_version(&options.current_version)?;
        let tag_format = TagFormat::new(options.tag_format.as_str());

        let resolution = VersionResolver::new(self.repo, options.autoconfirm_initial_tag)
            .resolve(&current, &tag_format)?;
        if resolution.is_initial {
            ui::display_warning(&BumpWarning::InitialRelease {
                tag: resolution.current_tag.clone(),
            });
        }

        ui::display_commit_analysis(&resolution.commits, &resolution.current_tag);

        let mut increment = options
            .increment
            .or_else(|| find_increment(self.classifier, &resolution.commits));
        // A prerelease of a prerelease only moves the iteration
        if options.prerelease.is_some() && !current.pre.is_empty() {
            increment = None;
        }
        debug!(
            classifier = self.classifier.name(),
            increment = ?increment,
            commits = resolution.commits.len(),
            "classified commits"
        );

        let new_version = generate_version(&current, increment, options.prerelease.as_ref())?;
        let new_tag = tag_format.render(&new_version);
        let current_version = current.to_string();
        let new_version = new_version.to_string();

        Ok(BumpReport {
            message: create_commit_message(
                &current_version,
                &new_version,
                Some(&options.bump_message),
            ),
            current_version,
            new_version,
            current_tag: resolution.current_tag,
            new_tag,
            increment,
            is_initial: resolution.is_initial,
            commit_count: resolution.commits.len(),
        })
    }

    /// Run the whole workflow.
    ///
    /// Clean early exits are [BumpOutcome] variants; every error is fatal. Changelog
    /// failures are reported as warnings and never block the release.
    pub fn run(&self, options: &BumpOptions) -> Result<BumpOutcome> {
        let entries = files::parse_entries(&options.version_files)?;
        let report = self.plan(options)?;
        ui::display_report(&report);

        if report.increment.is_none() && report.new_tag == report.current_tag {
            info!(tag = %report.current_tag, "no increment, nothing to release");
            return Ok(BumpOutcome::NoIncrement(report));
        }

        if options.dry_run {
            return Ok(BumpOutcome::DryRun(report));
        }

        let changelog_path = options.changelog.as_ref().map(|c| c.path.as_path());
        let snapshot = FileSnapshot::capture(
            entries
                .iter()
                .map(|e| e.path.as_path())
                .chain(changelog_path),
        )?;

        if let Err(e) = update_version_in_files(
            &report.current_version,
            &report.new_version,
            &entries,
            options.check_consistency,
        ) {
            return Err(restore_after(e, &snapshot));
        }
        let mut state = ReleaseState::FilesUpdated;
        debug!(state = ?state, files = snapshot.len(), "release state");

        if options.update_files_only {
            ui::display_success(&format!(
                "Done updating files: {}",
                options.version_files.join(", ")
            ));
            return Ok(BumpOutcome::FilesOnly(report));
        }

        let mut commit_options = CommitOptions {
            no_verify: options.no_verify,
            extra_paths: Vec::new(),
        };
        let mut release_notes = None;
        if let Some(settings) = &options.changelog {
            let tag_format = TagFormat::new(options.tag_format.as_str());
            if let Some(notes) = self.write_changelog(settings, &report, tag_format) {
                commit_options.extra_paths.push(settings.path.clone());
                release_notes = Some(notes);
            }
        }

        state.advance(ReleaseState::CommitAttempted);
        let output = self
            .repo
            .commit(&report.message, &commit_options)
            .unwrap_or_else(|e| GitOutput::failure(e.to_string()));
        if !output.is_success() {
            state.advance(ReleaseState::CommitFailed);
            let error = BumpError::CommitFailed {
                stderr: output.stderr.trim().to_string(),
            };
            return Err(restore_after(error, &snapshot));
        }
        state.advance(ReleaseState::Committed);
        ui::display_success(&format!("Committed: {}", report.message));

        state.advance(ReleaseState::TagAttempted);
        let output = self
            .repo
            .tag(&report.new_tag, release_notes.as_deref())
            .unwrap_or_else(|e| GitOutput::failure(e.to_string()));
        if !output.is_success() {
            state.advance(ReleaseState::TagFailed);
            warn!(tag = %report.new_tag, "bump commit left untagged");
            ui::display_warning(&BumpWarning::UntaggedCommit {
                tag: report.new_tag.clone(),
            });
            return Err(BumpError::TagFailed {
                tag: report.new_tag.clone(),
                stderr: output.stderr.trim().to_string(),
            });
        }
        state.advance(ReleaseState::Tagged);

        ui::display_success(&format!("Done! Created tag {}", report.new_tag));
        info!(tag = %report.new_tag, version = %report.new_version, "released");
        Ok(BumpOutcome::Released(report))
    }

    /// Release notes of the new section, or `None` when the changelog was not written
    fn write_changelog(
        &self,
        settings: &ChangelogSettings,
        report: &BumpReport,
        tag_format: TagFormat,
    ) -> Option<String> {
        let writer = ChangelogWriter::new(self.repo, self.classifier, tag_format);
        let options = ChangelogOptions {
            unreleased_version: Some(report.new_tag.clone()),
            incremental: settings.incremental,
            dry_run: false,
        };

        match writer.write(&settings.path, &options) {
            Ok(rendered) => Some(rendered.release_notes),
            Err(e) => {
                warn!(path = %settings.path.display(), error = %e, "changelog not updated");
                ui::display_warning(&BumpWarning::ChangelogFailed {
                    path: settings.path.display().to_string(),
                    reason: e.to_string(),
                });
                None
            }
        }
    }
}

/// Restore `snapshot` after `error`, folding a failed restore into the error
fn restore_after(error: BumpError, snapshot: &FileSnapshot) -> BumpError {
    match snapshot.restore() {
        Ok(()) => {
            info!(files = snapshot.len(), "restored files after failure");
            error
        }
        Err(rollback) => {
            warn!(error = %rollback, "restoring files failed");
            BumpError::RollbackFailed {
                original: Box::new(error),
                rollback,
            }
        }
    }
}
