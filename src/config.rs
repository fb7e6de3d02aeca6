use crate::classifier::conventional::{self, default_bump_map};
use crate::domain::{DEFAULT_BUMP_MESSAGE, DEFAULT_TAG_FORMAT};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Configuration file looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "gitbump.toml";

/// Represents the complete configuration for git-bump.
///
/// Contains the bump workflow settings and the change type to increment map used by
/// the conventional commits classifier.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub bump: BumpConfig,

    #[serde(default = "default_bump_map")]
    pub bump_map: BTreeMap<String, String>,
}

fn default_tag_format() -> String {
    DEFAULT_TAG_FORMAT.to_string()
}

fn default_bump_message() -> String {
    DEFAULT_BUMP_MESSAGE.to_string()
}

fn default_changelog_file() -> String {
    "CHANGELOG.md".to_string()
}

fn default_classifier() -> String {
    conventional::NAME.to_string()
}

fn default_true() -> bool {
    true
}

/// Settings of the bump workflow.
///
/// Every field can be overridden from the command line.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct BumpConfig {
    /// Template rendering a version into a tag name
    #[serde(default = "default_tag_format")]
    pub tag_format: String,

    /// Commit message template with `{old}` and `{new}` placeholders
    #[serde(default = "default_bump_message")]
    pub bump_message: String,

    /// Files holding the version, as `path` or `path:regex`
    #[serde(default)]
    pub version_files: Vec<String>,

    #[serde(default = "default_true")]
    pub check_consistency: bool,

    /// Treat a missing current tag as the first release instead of failing
    #[serde(default = "default_true")]
    pub autoconfirm_initial_tag: bool,

    #[serde(default)]
    pub update_changelog_on_bump: bool,

    #[serde(default = "default_changelog_file")]
    pub changelog_file: String,

    #[serde(default = "default_true")]
    pub changelog_incremental: bool,

    /// Registry name of the commit classifier
    #[serde(default = "default_classifier")]
    pub classifier: String,
}

impl Default for BumpConfig {
    fn default() -> Self {
        BumpConfig {
            tag_format: default_tag_format(),
            bump_message: default_bump_message(),
            version_files: Vec::new(),
            check_consistency: true,
            autoconfirm_initial_tag: true,
            update_changelog_on_bump: false,
            changelog_file: default_changelog_file(),
            changelog_incremental: true,
            classifier: default_classifier(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bump: BumpConfig::default(),
            bump_map: default_bump_map(),
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Lookup order:
/// 1. Custom path provided as parameter
/// 2. `gitbump.toml` in current directory
/// 3. `.gitbump.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If a file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        debug!(path, "loading configuration");
        fs::read_to_string(path)?
    } else if Path::new(CONFIG_FILE_NAME).exists() {
        debug!(path = CONFIG_FILE_NAME, "loading configuration");
        fs::read_to_string(CONFIG_FILE_NAME)?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(format!(".{}", CONFIG_FILE_NAME));
        if config_path.exists() {
            debug!(path = %config_path.display(), "loading configuration");
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    let config: Config = toml::from_str(&config_str)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.bump.tag_format, "{version}");
        assert_eq!(config.bump.bump_message, "bump: version {old} → {new}");
        assert!(config.bump.check_consistency);
        assert!(config.bump.autoconfirm_initial_tag);
        assert!(!config.bump.update_changelog_on_bump);
        assert_eq!(config.bump.classifier, "cz_conventional_commits");
        assert_eq!(config.bump_map.get("feat"), Some(&"minor".to_string()));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
[bump]
tag_format = "v{version}"
version_files = ["pkg/_metadata.py", "pyproject.toml:^version"]
"#,
        )
        .unwrap();

        assert_eq!(config.bump.tag_format, "v{version}");
        assert_eq!(config.bump.version_files.len(), 2);
        assert_eq!(config.bump.changelog_file, "CHANGELOG.md");
        assert_eq!(config.bump_map, default_bump_map());
    }

    #[test]
    fn test_bump_map_replaces_defaults() {
        let config: Config = toml::from_str(
            r#"
[bump_map]
feat = "major"
"#,
        )
        .unwrap();

        assert_eq!(config.bump_map.len(), 1);
        assert_eq!(config.bump_map.get("feat"), Some(&"major".to_string()));
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = toml::from_str::<Config>("[bump\n").map_err(crate::error::BumpError::from);
        assert!(err.unwrap_err().to_string().starts_with("Configuration error"));
    }
}
