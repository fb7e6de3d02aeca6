//! Pure formatting functions for UI output.
//!
//! The `format_*` functions build the text and are tested; the `display_*` functions
//! only print it.

use console::style;

use crate::bump::BumpReport;
use crate::domain::describe_increment;
use crate::git::CommitInfo;
use crate::warning::BumpWarning;

/// Maximum number of commits listed by [display_commit_analysis]
const MAX_LISTED_COMMITS: usize = 10;

/// Maximum subject width in the commit listing
const MAX_SUBJECT_WIDTH: usize = 60;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Display a non-fatal workflow warning.
pub fn display_warning(warning: &BumpWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// The three report lines of a bump: commit message, tag and detected increment.
pub fn format_report(report: &BumpReport) -> String {
    format!(
        "{}\ntag to create: {}\nincrement detected: {}",
        report.message,
        report.new_tag,
        describe_increment(report.increment)
    )
}

/// Print the bump report to stdout.
pub fn display_report(report: &BumpReport) {
    println!("{}", style(format_report(report)).bold());
}

/// Subject line cut to fit the commit listing
pub fn short_subject(message: &str) -> &str {
    let subject = crate::domain::commit::subject(message);
    match subject.char_indices().nth(MAX_SUBJECT_WIDTH) {
        Some((end, _)) => &subject[..end],
        None => subject,
    }
}

/// Display the commits a release is computed from.
///
/// Shows up to 10 subjects; the rest are summarized with a count.
///
/// # Arguments
/// * `commits` - Commits since the current tag, newest first
/// * `current_tag` - Tag the range starts from
pub fn display_commit_analysis(commits: &[CommitInfo], current_tag: &str) {
    println!(
        "\n{}",
        style(format!("Analyzing commits since '{}'", current_tag)).bold()
    );
    println!(
        "{}",
        style(format!("{} commits:", commits.len())).underlined()
    );

    for (i, commit) in commits.iter().take(MAX_LISTED_COMMITS).enumerate() {
        println!("  {}. {}", i + 1, short_subject(&commit.message));
    }

    if commits.len() > MAX_LISTED_COMMITS {
        println!(
            "  ... and {} more commits",
            commits.len() - MAX_LISTED_COMMITS
        );
    }
}
