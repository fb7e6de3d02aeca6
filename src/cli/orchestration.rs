//! Workflow orchestration behind the subcommands
//!
//! Each `run_*` function merges command-line arguments over the configuration file,
//! opens the repository in the working directory and runs one workflow. Keeping this
//! out of `main` lets the workflows be driven without going through clap.

use std::path::Path;

use tracing::debug;

use crate::bump::{Bump, BumpOptions, BumpOutcome, ChangelogSettings};
use crate::changelog::{latest_version_tag, ChangelogOptions, ChangelogWriter, RenderedChangelog};
use crate::classifier;
use crate::cli::metadata;
use crate::cli::{BumpArgs, ChangelogArgs, MetadataArgs};
use crate::config::Config;
use crate::domain::TagFormat;
use crate::error::Result;
use crate::git::{Git2Repository, Repository};

/// Bump options from arguments, falling back to `config` for anything not given
pub fn bump_options(args: &BumpArgs, config: &Config) -> BumpOptions {
    let bump = &config.bump;
    let version_files = if args.version_files.is_empty() {
        bump.version_files.clone()
    } else {
        args.version_files.clone()
    };
    let changelog = (args.changelog || bump.update_changelog_on_bump).then(|| ChangelogSettings {
        path: args
            .changelog_file
            .clone()
            .unwrap_or_else(|| bump.changelog_file.clone().into()),
        incremental: bump.changelog_incremental,
    });

    BumpOptions {
        current_version: args.current_version.clone(),
        version_files,
        increment: args.increment,
        prerelease: args.prerelease.clone(),
        tag_format: args
            .tag_format
            .clone()
            .unwrap_or_else(|| bump.tag_format.clone()),
        bump_message: args
            .bump_message
            .clone()
            .unwrap_or_else(|| bump.bump_message.clone()),
        check_consistency: bump.check_consistency && !args.no_check_consistency,
        autoconfirm_initial_tag: bump.autoconfirm_initial_tag,
        update_files_only: args.files_only,
        dry_run: args.dry_run,
        no_verify: args.no_verify,
        changelog,
    }
}

/// Run the bump workflow in the repository containing `workdir`
pub fn run_bump(args: &BumpArgs, config: &Config, workdir: &Path) -> Result<BumpOutcome> {
    let repo = Git2Repository::discover(workdir)?;
    let classifier = classifier::by_name(&config.bump.classifier, config)?;
    let options = bump_options(args, config);
    debug!(?options, "bump options");

    Bump::new(&repo, classifier.as_ref()).run(&options)
}

/// Run the changelog workflow in the repository containing `workdir`.
///
/// Without an explicit version the newest section is headed by the highest tagged
/// version, so commits after it are attributed to that release.
pub fn run_changelog(
    args: &ChangelogArgs,
    config: &Config,
    workdir: &Path,
) -> Result<RenderedChangelog> {
    let repo = Git2Repository::discover(workdir)?;
    let classifier = classifier::by_name(&config.bump.classifier, config)?;
    let tag_format = TagFormat::new(config.bump.tag_format.as_str());

    let unreleased_version = match &args.last_version {
        Some(version) => Some(version.clone()),
        None => latest_version_tag(&repo.list_tags()?, &tag_format)?,
    };
    let path = args
        .output
        .clone()
        .unwrap_or_else(|| config.bump.changelog_file.clone().into());
    debug!(path = %path.display(), unreleased = ?unreleased_version, "changelog options");

    let options = ChangelogOptions {
        unreleased_version,
        incremental: args.incremental,
        dry_run: args.dry_run,
    };
    ChangelogWriter::new(&repo, classifier.as_ref(), tag_format).write(&path, &options)
}

/// Read the requested metadata field
pub fn run_metadata(args: &MetadataArgs) -> Result<String> {
    metadata::read_field(&args.metadata_path, &args.field_name)
}
