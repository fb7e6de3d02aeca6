use crate::classifier::CommitClassifier;
use crate::domain::commit::breaking_footer;
use crate::domain::Increment;
use crate::error::Result;
use crate::git::CommitInfo;
use regex::Regex;
use std::collections::BTreeMap;

/// Registry name of the conventional commits classifier
pub const NAME: &str = "cz_conventional_commits";

/// Section title for breaking-change footers
pub const BREAKING_CHANGE_SECTION: &str = "BREAKING CHANGE";

const COMMIT_PARSER: &str =
    r"^(?P<change_type>BREAKING[\- ]CHANGE|[A-Za-z]+)(?:\((?P<scope>[^()\r\n]*)\))?(?P<breaking>!)?:\s*(?P<message>.*)$";
const CHANGELOG_PATTERN: &str = r"^(BREAKING[\- ]CHANGE|feat|fix|refactor|perf)(\(.+\))?(!)?:";

/// Change type to increment mapping used when the configuration does not override it
pub fn default_bump_map() -> BTreeMap<String, String> {
    [
        ("feat", "minor"),
        ("fix", "patch"),
        ("refactor", "patch"),
        ("perf", "patch"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

/// Classifier for https://www.conventionalcommits.org messages
///
/// Breaking changes (a `!` after the type/scope or a `BREAKING CHANGE:` footer) are
/// major; other types are looked up in the bump map (by default `feat` is minor and
/// `fix`, `refactor`, `perf` are patch). Everything else implies no release.
pub struct ConventionalCommits {
    commit_parser: Regex,
    changelog_pattern: Regex,
    bump_map: BTreeMap<String, Increment>,
}

impl ConventionalCommits {
    pub fn new() -> Self {
        Self::with_bump_map(&default_bump_map())
            .expect("default conventional commit rules are valid")
    }

    /// Build with a custom change type to increment map (`"feat" = "minor"`, ...)
    pub fn with_bump_map(bump_map: &BTreeMap<String, String>) -> Result<Self> {
        let bump_map = bump_map
            .iter()
            .map(|(change_type, increment)| -> Result<(String, Increment)> {
                Ok((change_type.clone(), increment.parse::<Increment>()?))
            })
            .collect::<Result<BTreeMap<String, Increment>>>()?;

        Ok(ConventionalCommits {
            commit_parser: Regex::new(COMMIT_PARSER)?,
            changelog_pattern: Regex::new(CHANGELOG_PATTERN)?,
            bump_map,
        })
    }
}

impl Default for ConventionalCommits {
    fn default() -> Self {
        Self::new()
    }
}

impl CommitClassifier for ConventionalCommits {
    fn name(&self) -> &str {
        NAME
    }

    fn commit_parser(&self) -> &Regex {
        &self.commit_parser
    }

    fn changelog_pattern(&self) -> &Regex {
        &self.changelog_pattern
    }

    fn section_title(&self, change_type: &str) -> String {
        if change_type.starts_with("BREAKING") {
            return BREAKING_CHANGE_SECTION.to_string();
        }

        let mut chars = change_type.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    fn increment_for(&self, commit: &CommitInfo) -> Option<Increment> {
        match self.parse(&commit.message) {
            Some(parsed) if parsed.is_breaking_change => Some(Increment::Major),
            Some(parsed) => self.bump_map.get(&parsed.change_type).copied(),
            None => breaking_footer(&commit.message).map(|_| Increment::Major),
        }
    }
}
