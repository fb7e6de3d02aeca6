use regex::Regex;
use std::sync::OnceLock;

fn version_in_heading() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?P<version>\d+\.\d+\.\d+(?:-[0-9A-Za-z-]+(?:\.[0-9A-Za-z-]+)*)?(?:\+[0-9A-Za-z-]+)?)",
        )
        .expect("version heading pattern is valid")
    })
}

/// What an existing changelog says about itself.
///
/// Line indexes count lines as split on `\n`, starting at 0.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangelogMetadata {
    /// Newest version found in a heading
    pub latest_version: Option<String>,
    /// Line of that heading
    pub latest_version_position: Option<usize>,
    /// First line of an "Unreleased" block
    pub unreleased_start: Option<usize>,
    /// First line after the "Unreleased" block (exclusive end)
    pub unreleased_end: Option<usize>,
}

impl ChangelogMetadata {
    /// Scan changelog content down to the first versioned heading.
    pub fn parse(content: &str) -> Self {
        let mut metadata = ChangelogMetadata::default();
        let mut unreleased_level: Option<usize> = None;
        let mut line_count = 0;

        for (index, raw) in content.split_inclusive('\n').enumerate() {
            line_count = index + 1;
            let line = raw.trim();
            let level = heading_level(line);

            if level.is_some()
                && line.to_lowercase().contains("unreleased")
                && metadata.unreleased_start.is_none()
            {
                metadata.unreleased_start = Some(index);
                unreleased_level = level;
                continue;
            }

            if unreleased_level.is_some()
                && metadata.unreleased_end.is_none()
                && level.is_some_and(|l| l <= unreleased_level.unwrap_or(0))
            {
                metadata.unreleased_end = Some(index);
            }

            if let Some(version) = version_from_heading(line) {
                metadata.latest_version = Some(version);
                metadata.latest_version_position = Some(index);
                break;
            }
        }

        if metadata.unreleased_start.is_some() && metadata.unreleased_end.is_none() {
            metadata.unreleased_end = Some(line_count);
        }

        metadata
    }
}

/// Number of leading `#` of a markdown heading
fn heading_level(line: &str) -> Option<usize> {
    let level = line.chars().take_while(|&c| c == '#').count();
    (level > 0).then_some(level)
}

/// Version carried by a markdown heading such as `## v1.2.0 (2024-03-01)`
pub fn version_from_heading(line: &str) -> Option<String> {
    if !line.trim_start().starts_with('#') {
        return None;
    }
    version_in_heading()
        .captures(line)
        .and_then(|c| c.name("version"))
        .map(|m| m.as_str().to_string())
}

/// Splice `new_content` into `existing` according to `metadata`.
///
/// An "Unreleased" block is dropped. The new content goes right before the latest
/// version heading, else where the dropped block was, else at the end. Every other
/// line of `existing` is kept byte for byte.
pub fn incremental_build(new_content: &str, existing: &str, metadata: &ChangelogMetadata) -> String {
    let new_content = format!("{}\n\n", new_content.trim_end());
    let insert_at = metadata
        .latest_version_position
        .or(metadata.unreleased_start);
    let skipped = match (metadata.unreleased_start, metadata.unreleased_end) {
        (Some(start), Some(end)) => start..end,
        _ => 0..0,
    };

    let mut output = String::with_capacity(existing.len() + new_content.len());
    let mut inserted = false;

    for (index, line) in existing.split_inclusive('\n').enumerate() {
        if Some(index) == insert_at {
            output.push_str(&new_content);
            inserted = true;
        }
        if skipped.contains(&index) {
            continue;
        }
        output.push_str(line);
    }

    if !inserted {
        if !output.is_empty() {
            if !output.ends_with('\n') {
                output.push('\n');
            }
            if !output.ends_with("\n\n") {
                output.push('\n');
            }
        }
        output.push_str(&new_content);
    }

    output
}
