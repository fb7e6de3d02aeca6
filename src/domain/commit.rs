use regex::Captures;

/// Footer tokens marking a breaking change in a commit body
pub const BREAKING_CHANGE_FOOTERS: [&str; 2] = ["BREAKING CHANGE:", "BREAKING-CHANGE:"];

/// Parsed representation of a conventional commit header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommit {
    pub change_type: String,
    pub scope: Option<String>,
    pub message: String,
    pub is_breaking_change: bool,
}

impl ParsedCommit {
    /// Build from a match of a commit grammar with `change_type`, `scope`,
    /// `breaking` and `message` named groups.
    ///
    /// The whole commit message is needed to detect breaking-change footers.
    pub fn from_captures(captures: &Captures<'_>, full_message: &str) -> Option<Self> {
        let change_type = captures.name("change_type")?.as_str().to_string();
        let scope = captures
            .name("scope")
            .map(|m| m.as_str().trim().to_string())
            .filter(|s| !s.is_empty());
        let message = captures
            .name("message")
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_default();
        let is_breaking_change = captures.name("breaking").is_some()
            || change_type.starts_with("BREAKING")
            || breaking_footer(full_message).is_some();

        Some(ParsedCommit {
            change_type,
            scope,
            message,
            is_breaking_change,
        })
    }
}

/// Subject line of a commit message
pub fn subject(message: &str) -> &str {
    message.lines().next().unwrap_or("").trim()
}

/// Text of the first breaking-change footer in the commit body, if any
pub fn breaking_footer(message: &str) -> Option<&str> {
    message.lines().skip(1).find_map(|line| {
        let line = line.trim();
        BREAKING_CHANGE_FOOTERS
            .iter()
            .find_map(|token| line.strip_prefix(token))
            .map(str::trim)
    })
}
