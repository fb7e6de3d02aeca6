use crate::error::{BumpError, Result};
use regex::Regex;
use semver::Version;

/// Tag format used when none is configured: the bare version
pub const DEFAULT_TAG_FORMAT: &str = "{version}";

/// Template rendering a version into a tag name.
///
/// Supported placeholders: `{version}`, `{major}`, `{minor}`, `{patch}`, `{prerelease}`.
/// Examples: "{version}" -> "1.2.3", "v{version}" -> "v1.2.3",
/// "release-{major}.{minor}" -> "release-1.2".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagFormat {
    pub template: String,
}

impl TagFormat {
    pub fn new(template: impl Into<String>) -> Self {
        TagFormat {
            template: template.into(),
        }
    }

    /// Render a version according to the template
    pub fn render(&self, version: &Version) -> String {
        self.template
            .replace("{version}", &version.to_string())
            .replace("{major}", &version.major.to_string())
            .replace("{minor}", &version.minor.to_string())
            .replace("{patch}", &version.patch.to_string())
            .replace("{prerelease}", version.pre.as_str())
    }

    /// Recover the version a tag was rendered from, if the tag matches this template.
    ///
    /// Returns `Ok(None)` for tags that do not follow the template or do not carry a
    /// full semantic version.
    pub fn parse_tag(&self, tag: &str) -> Result<Option<Version>> {
        let escaped = regex::escape(&self.template);
        let pattern = escaped
            .replace(r"\{version\}", r"(?P<version>\d+\.\d+\.\d+(?:-[0-9A-Za-z.-]+)?)")
            .replace(r"\{major\}", r"(?P<major>\d+)")
            .replace(r"\{minor\}", r"(?P<minor>\d+)")
            .replace(r"\{patch\}", r"(?P<patch>\d+)")
            .replace(r"\{prerelease\}", r"(?P<prerelease>[0-9A-Za-z.-]*)");

        let re = Regex::new(&format!("^{}$", pattern))
            .map_err(|e| BumpError::config(format!("Invalid tag format '{}': {}", self.template, e)))?;

        let Some(captures) = re.captures(tag) else {
            return Ok(None);
        };

        if let Some(version) = captures.name("version") {
            return Ok(Version::parse(version.as_str()).ok());
        }

        let component = |name: &str| captures.name(name).and_then(|m| m.as_str().parse().ok());
        match (component("major"), component("minor"), component("patch")) {
            (Some(major), Some(minor), Some(patch)) => {
                let mut version = Version::new(major, minor, patch);
                if let Some(pre) = captures.name("prerelease").filter(|m| !m.as_str().is_empty()) {
                    version.pre = semver::Prerelease::new(pre.as_str())?;
                }
                Ok(Some(version))
            }
            _ => Ok(None),
        }
    }
}

impl Default for TagFormat {
    fn default() -> Self {
        TagFormat::new(DEFAULT_TAG_FORMAT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    #[test]
    fn test_default_format_is_bare_version() {
        assert_eq!(TagFormat::default().render(&v("1.2.1")), "1.2.1");
    }

    #[test]
    fn test_format_with_prefix() {
        let format = TagFormat::new("v{version}");
        assert_eq!(format.render(&v("1.2.3-rc.1")), "v1.2.3-rc.1");
    }

    #[test]
    fn test_format_with_components() {
        let format = TagFormat::new("release-{major}.{minor}.{patch}{prerelease}");
        assert_eq!(format.render(&v("2.0.1")), "release-2.0.1");
    }

    #[test]
    fn test_parse_tag_round_trips_prefix() {
        let format = TagFormat::new("v{version}");
        assert_eq!(format.parse_tag("v1.4.0").unwrap(), Some(v("1.4.0")));
        assert_eq!(format.parse_tag("1.4.0").unwrap(), None);
        assert_eq!(format.parse_tag("vnext").unwrap(), None);
    }

    #[test]
    fn test_parse_tag_from_components() {
        let format = TagFormat::new("rel/{major}_{minor}_{patch}");
        assert_eq!(format.parse_tag("rel/3_1_4").unwrap(), Some(v("3.1.4")));
    }

    #[test]
    fn test_parse_tag_with_prerelease() {
        let format = TagFormat::default();
        assert_eq!(format.parse_tag("0.9.0-beta.2").unwrap(), Some(v("0.9.0-beta.2")));
    }
}
