//! Command-line interface
//!
//! Argument definitions live here; [orchestration] merges them with the
//! configuration file and runs the workflows.

pub mod metadata;
pub mod orchestration;

use crate::domain::{Increment, PreReleaseType};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "git-bump",
    version,
    about = "Bump versions, write changelogs and tag releases from conventional commits"
)]
pub struct Cli {
    #[arg(short, long, global = true, help = "Custom configuration file path")]
    pub config: Option<String>,

    #[arg(long, global = true, help = "Log workflow details to stderr")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Update version files, commit and tag the next release
    Bump(BumpArgs),
    /// Generate the changelog from the commit history
    Changelog(ChangelogArgs),
    /// Print one field of a `KEY = value` metadata file
    Metadata(MetadataArgs),
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct BumpArgs {
    #[arg(short = 'v', long, help = "Semantic version currently released, like 1.0.23")]
    pub current_version: String,

    #[arg(
        short = 'P',
        long = "version-files",
        num_args = 1..,
        help = "Files holding the version, as path or path:regex"
    )]
    pub version_files: Vec<String>,

    #[arg(long, help = "Print what would happen without changing anything")]
    pub dry_run: bool,

    #[arg(long, help = "Write the changelog section of the new version")]
    pub changelog: bool,

    #[arg(long, help = "Stop after updating the version files")]
    pub files_only: bool,

    #[arg(long, help = "Skip the pre-commit and commit-msg hooks")]
    pub no_verify: bool,

    #[arg(long, help = "Force the increment: major, minor or patch")]
    pub increment: Option<Increment>,

    #[arg(long, help = "Cut a prerelease: alpha, beta, rc or a custom label")]
    pub prerelease: Option<PreReleaseType>,

    #[arg(long, help = "Tag template, e.g. v{version}")]
    pub tag_format: Option<String>,

    #[arg(long, help = "Commit message template with {old} and {new}")]
    pub bump_message: Option<String>,

    #[arg(long, help = "Do not require every version file to hold the current version")]
    pub no_check_consistency: bool,

    #[arg(long, help = "Changelog path")]
    pub changelog_file: Option<PathBuf>,
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct ChangelogArgs {
    #[arg(short, long = "out-path", help = "Output path for the changelog file")]
    pub output: Option<PathBuf>,

    #[arg(
        short = 'v',
        long = "last-version",
        help = "Heading of the newest section; defaults to the highest tagged version"
    )]
    pub last_version: Option<String>,

    #[arg(long, help = "Only add what is new since the latest version in the file")]
    pub incremental: bool,

    #[arg(long, help = "Print the changelog without writing it")]
    pub dry_run: bool,
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct MetadataArgs {
    #[arg(short = 'p', long, help = "Path of the metadata file")]
    pub metadata_path: PathBuf,

    #[arg(short = 'f', long, help = "Field to print")]
    pub field_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bump() {
        let cli = Cli::try_parse_from([
            "git-bump",
            "bump",
            "-v",
            "1.2.0",
            "-P",
            "pkg/_metadata.py",
            "pyproject.toml:^version",
            "--increment",
            "minor",
            "--prerelease",
            "rc",
            "--dry-run",
        ])
        .unwrap();

        let Command::Bump(args) = cli.command else {
            panic!("expected the bump command");
        };
        assert_eq!(args.current_version, "1.2.0");
        assert_eq!(args.version_files.len(), 2);
        assert_eq!(args.increment, Some(Increment::Minor));
        assert_eq!(args.prerelease, Some(PreReleaseType::ReleaseCandidate));
        assert!(args.dry_run);
        assert!(!args.changelog);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "git-bump",
            "metadata",
            "-p",
            "pkg/_metadata.py",
            "-f",
            "__version__",
            "--verbose",
            "-c",
            "ci/gitbump.toml",
        ])
        .unwrap();

        assert!(cli.verbose);
        assert_eq!(cli.config.as_deref(), Some("ci/gitbump.toml"));
    }

    #[test]
    fn test_invalid_increment_is_rejected() {
        let result = Cli::try_parse_from(["git-bump", "bump", "-v", "1.0.0", "--increment", "huge"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_bump_requires_current_version() {
        assert!(Cli::try_parse_from(["git-bump", "bump"]).is_err());
    }
}
