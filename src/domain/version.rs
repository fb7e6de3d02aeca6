use crate::domain::prerelease::{PreRelease, PreReleaseType};
use crate::error::{BumpError, Result};
use semver::{Prerelease, Version};
use std::fmt;
use std::str::FromStr;

/// Commit message template used when none is configured
pub const DEFAULT_BUMP_MESSAGE: &str = "bump: version {old} → {new}";

/// Magnitude of a semantic version change.
///
/// "No increment" is represented as `Option::<Increment>::None` throughout the crate.
/// Variants are ordered by severity so the highest increment of a commit range is
/// simply the maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Increment {
    Patch,
    Minor,
    Major,
}

impl FromStr for Increment {
    type Err = BumpError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "major" => Ok(Increment::Major),
            "minor" => Ok(Increment::Minor),
            "patch" => Ok(Increment::Patch),
            other => Err(BumpError::version(format!(
                "Invalid increment '{}' - expected major, minor or patch",
                other
            ))),
        }
    }
}

impl fmt::Display for Increment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Increment::Major => write!(f, "MAJOR"),
            Increment::Minor => write!(f, "MINOR"),
            Increment::Patch => write!(f, "PATCH"),
        }
    }
}

/// Render an optional increment the way the bump report prints it.
pub fn describe_increment(increment: Option<Increment>) -> String {
    increment
        .map(|i| i.to_string())
        .unwrap_or_else(|| "None".to_string())
}

/// Parse a strict semantic version (no tag prefix allowed).
pub fn parse_version(version: &str) -> Result<Version> {
    Version::parse(version.trim())
        .map_err(|e| BumpError::version(format!("Invalid version '{}': {}", version, e)))
}

/// Computes the next version from the current one.
///
/// The release components are bumped by `increment` (lower components reset to 0);
/// with no increment they are kept. A prerelease current version ignores the increment
/// and becomes its own release, so `1.3.0-rc.2` plus a minor bump is `1.3.0`.
/// When `prerelease` is given the prerelease field becomes `label.N`: N continues the
/// current iteration if the current version is already a prerelease of the same label,
/// otherwise it starts at 0.
///
/// # Example
/// ```ignore
/// let v = parse_version("1.2.0")?;
/// assert_eq!(generate_version(&v, Some(Increment::Minor), None)?.to_string(), "1.3.0");
/// assert_eq!(
///     generate_version(&v, Some(Increment::Minor), Some(&PreReleaseType::Beta))?.to_string(),
///     "1.3.0-beta.0"
/// );
/// ```
pub fn generate_version(
    current: &Version,
    increment: Option<Increment>,
    prerelease: Option<&PreReleaseType>,
) -> Result<Version> {
    let mut next = Version::new(current.major, current.minor, current.patch);
    // A prerelease already carries the pending bump
    let increment = if current.pre.is_empty() { increment } else { None };

    match increment {
        Some(Increment::Major) => {
            next.major += 1;
            next.minor = 0;
            next.patch = 0;
        }
        Some(Increment::Minor) => {
            next.minor += 1;
            next.patch = 0;
        }
        Some(Increment::Patch) => {
            next.patch += 1;
        }
        None => {}
    }

    if let Some(label) = prerelease {
        let pre = next_prerelease(current, label);
        next.pre = Prerelease::new(&pre.to_string())?;
    }

    Ok(next)
}

fn next_prerelease(current: &Version, label: &PreReleaseType) -> PreRelease {
    if current.pre.is_empty() {
        return PreRelease::new(label.clone(), Some(0));
    }

    match PreRelease::parse(current.pre.as_str()) {
        Ok(previous) if previous.identifier == *label => previous.increment_iteration(),
        _ => PreRelease::new(label.clone(), Some(0)),
    }
}

/// Builds the bump commit message from a template containing `{old}` and `{new}`.
pub fn create_commit_message(old: &str, new: &str, template: Option<&str>) -> String {
    template
        .unwrap_or(DEFAULT_BUMP_MESSAGE)
        .replace("{old}", old)
        .replace("{new}", new)
}
