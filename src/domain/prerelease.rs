//! Pre-release identifiers for semantic versions
//!
//! A prerelease is a label (alpha, beta, rc, or custom) with an optional iteration,
//! rendered into the semver prerelease field as `label.N`.
//! See https://semver.org/#spec-item-9

use crate::error::{BumpError, Result};
use std::fmt;
use std::str::FromStr;

/// Pre-release identifier type (alpha, beta, rc, or custom)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum PreReleaseType {
    /// Alpha pre-release
    Alpha,
    /// Beta pre-release
    Beta,
    /// Release candidate
    ReleaseCandidate,
    /// Custom pre-release identifier
    Custom(String),
}

impl PreReleaseType {
    /// Parse a pre-release type from a string
    ///
    /// Accepts: "alpha", "a", "beta", "b", "rc", or any custom ASCII alphanumeric-hyphen string
    pub fn parse(s: &str) -> Result<Self> {
        s.parse()
    }
}

impl FromStr for PreReleaseType {
    type Err = BumpError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "alpha" | "a" => Ok(PreReleaseType::Alpha),
            "beta" | "b" => Ok(PreReleaseType::Beta),
            "rc" => Ok(PreReleaseType::ReleaseCandidate),
            other => {
                if !other.is_empty()
                    && other.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
                {
                    Ok(PreReleaseType::Custom(other.to_string()))
                } else {
                    Err(BumpError::version(format!(
                        "Invalid pre-release identifier: '{}'",
                        s
                    )))
                }
            }
        }
    }
}

impl fmt::Display for PreReleaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreReleaseType::Alpha => write!(f, "alpha"),
            PreReleaseType::Beta => write!(f, "beta"),
            PreReleaseType::ReleaseCandidate => write!(f, "rc"),
            PreReleaseType::Custom(s) => write!(f, "{}", s),
        }
    }
}

/// Pre-release version with optional iteration number
///
/// # Examples
/// - "alpha" -> PreRelease { identifier: Alpha, iteration: None }
/// - "beta.1" -> PreRelease { identifier: Beta, iteration: Some(1) }
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreRelease {
    pub identifier: PreReleaseType,
    pub iteration: Option<u32>,
}

impl PreRelease {
    pub fn new(identifier: PreReleaseType, iteration: Option<u32>) -> Self {
        PreRelease {
            identifier,
            iteration,
        }
    }

    /// Parse a pre-release field like "beta", "beta.1" or "rc.2"
    pub fn parse(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(BumpError::version("Empty pre-release identifier"));
        }

        let parts: Vec<&str> = s.split('.').collect();
        if parts.len() > 2 {
            return Err(BumpError::version(format!(
                "Unsupported pre-release field: '{}'",
                s
            )));
        }

        let identifier = PreReleaseType::parse(parts[0])?;

        let iteration = if parts.len() > 1 {
            Some(parts[1].parse::<u32>().map_err(|_| {
                BumpError::version(format!("Invalid iteration number: '{}'", parts[1]))
            })?)
        } else {
            None
        };

        Ok(PreRelease {
            identifier,
            iteration,
        })
    }

    /// Next iteration of the same label; a label without iteration continues at 1
    pub fn increment_iteration(&self) -> Self {
        let new_iteration = match self.iteration {
            Some(n) => Some(n + 1),
            None => Some(1),
        };

        PreRelease {
            identifier: self.identifier.clone(),
            iteration: new_iteration,
        }
    }
}

impl fmt::Display for PreRelease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identifier)?;
        if let Some(iter) = self.iteration {
            write!(f, ".{}", iter)?;
        }
        Ok(())
    }
}
