//! `KEY = value` metadata files such as a package's `_metadata.py`

use crate::error::{BumpError, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Collect every `KEY = value` line.
///
/// Keys and values are trimmed and anything after a `#` in the value is dropped.
/// Quotes are kept as written.
pub fn parse_metadata(content: &str) -> BTreeMap<String, String> {
    content
        .lines()
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| {
            let value = value.split('#').next().unwrap_or_default();
            (key.trim().to_string(), value.trim().to_string())
        })
        .collect()
}

/// Read one field of the metadata file at `path`
pub fn read_field(path: &Path, field: &str) -> Result<String> {
    let content = fs::read_to_string(path)?;
    parse_metadata(&content)
        .remove(field)
        .ok_or_else(|| {
            BumpError::config(format!(
                "Field '{}' not found in {}",
                field,
                path.display()
            ))
        })
}
