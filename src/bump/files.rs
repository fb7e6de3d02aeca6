//! Version strings inside project files

use crate::error::{BumpError, Result};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// A file holding the version, optionally restricted to lines matching a regex.
///
/// Written as `path` or `path:regex`, e.g. `pyproject.toml:^version`.
#[derive(Debug, Clone)]
pub struct VersionFileEntry {
    pub path: PathBuf,
    pub line_filter: Option<Regex>,
}

impl VersionFileEntry {
    /// Parse a `path[:regex]` location.
    ///
    /// A single-letter prefix before the first colon is treated as a Windows drive,
    /// not as a path/regex separator.
    pub fn parse(location: &str) -> Result<Self> {
        let split_at = location
            .char_indices()
            .filter(|&(_, c)| c == ':')
            .map(|(i, _)| i)
            .find(|&i| !(i == 1 && location.as_bytes()[0].is_ascii_alphabetic()));

        let (path, filter) = match split_at {
            Some(i) => (&location[..i], Some(&location[i + 1..])),
            None => (location, None),
        };

        if path.is_empty() {
            return Err(BumpError::config(format!(
                "Version file location '{}' has no path",
                location
            )));
        }

        let line_filter = match filter.filter(|f| !f.is_empty()) {
            Some(pattern) => Some(Regex::new(pattern)?),
            None => None,
        };

        Ok(VersionFileEntry {
            path: PathBuf::from(path),
            line_filter,
        })
    }

    fn considers(&self, line: &str) -> bool {
        self.line_filter
            .as_ref()
            .map_or(true, |re| re.is_match(line))
    }

    /// Whether `version` occurs on a considered line of `content`
    fn contains(&self, content: &str, version: &str) -> bool {
        content
            .split_inclusive('\n')
            .any(|line| self.considers(line) && line.contains(version))
    }

    /// `content` with `old` replaced by `new` on every considered line
    fn replace(&self, content: &str, old: &str, new: &str) -> String {
        content
            .split_inclusive('\n')
            .map(|line| {
                if self.considers(line) && line.contains(old) {
                    line.replace(old, new)
                } else {
                    line.to_string()
                }
            })
            .collect()
    }
}

/// Parse every location, failing on the first invalid one
pub fn parse_entries<S: AsRef<str>>(locations: &[S]) -> Result<Vec<VersionFileEntry>> {
    locations
        .iter()
        .map(|l| VersionFileEntry::parse(l.as_ref()))
        .collect()
}

/// Replace `old_version` with `new_version` in every entry.
///
/// With `check_consistency` every entry is read and checked for `old_version` before
/// anything is written, and the call fails with [BumpError::VersionInconsistency] on
/// the first entry lacking it. Without it, entries lacking the version are left alone.
///
/// Files are rewritten one after the other; the update is not atomic across files. A
/// crash between two writes leaves the set in a mixed state, and restoring it is up to
/// the caller (see [FileSnapshot]).
pub fn update_version_in_files(
    old_version: &str,
    new_version: &str,
    entries: &[VersionFileEntry],
    check_consistency: bool,
) -> Result<()> {
    let mut contents = Vec::with_capacity(entries.len());
    for entry in entries {
        let content = fs::read_to_string(&entry.path)?;
        if check_consistency && !entry.contains(&content, old_version) {
            return Err(BumpError::VersionInconsistency {
                path: entry.path.clone(),
                version: old_version.to_string(),
            });
        }
        contents.push(content);
    }

    for (index, entry) in entries.iter().enumerate() {
        // Entries may repeat a path with different filters; later ones see earlier edits
        let content = if entries[..index].iter().any(|e| e.path == entry.path) {
            fs::read_to_string(&entry.path)?
        } else {
            std::mem::take(&mut contents[index])
        };

        let updated = entry.replace(&content, old_version, new_version);
        if updated != content {
            fs::write(&entry.path, updated)?;
            debug!(path = %entry.path.display(), "updated version");
        }
    }

    info!(
        from = old_version,
        to = new_version,
        files = entries.len(),
        "version files updated"
    );
    Ok(())
}

/// In-memory copy of files taken before the workflow touches them.
///
/// Restoring writes the captured bytes back verbatim and deletes files that did not
/// exist at capture time.
#[derive(Debug, Default)]
pub struct FileSnapshot {
    files: Vec<(PathBuf, Option<Vec<u8>>)>,
}

impl FileSnapshot {
    pub fn capture<'a, I>(paths: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a Path>,
    {
        let mut files: Vec<(PathBuf, Option<Vec<u8>>)> = Vec::new();
        for path in paths {
            if files.iter().any(|(p, _)| p == path) {
                continue;
            }
            let content = match fs::read(path) {
                Ok(bytes) => Some(bytes),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
                Err(e) => return Err(e.into()),
            };
            files.push((path.to_path_buf(), content));
        }
        Ok(FileSnapshot { files })
    }

    /// Write every captured file back, attempting all files before reporting the
    /// first error
    pub fn restore(&self) -> std::io::Result<()> {
        let mut first_error = None;

        for (path, content) in &self.files {
            let result = match content {
                Some(bytes) => fs::write(path, bytes),
                None => match fs::remove_file(path) {
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                    other => other,
                },
            };
            if let Err(e) = result {
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn entry(path: &Path) -> VersionFileEntry {
        VersionFileEntry::parse(path.to_str().unwrap()).unwrap()
    }

    #[test]
    fn test_parse_location_with_filter() {
        let e = VersionFileEntry::parse("pyproject.toml:^version").unwrap();
        assert_eq!(e.path, PathBuf::from("pyproject.toml"));
        assert!(e.line_filter.unwrap().is_match("version = \"1.0.0\""));
    }

    #[test]
    fn test_parse_location_windows_drive() {
        let e = VersionFileEntry::parse(r"C:\repo\setup.py").unwrap();
        assert_eq!(e.path, PathBuf::from(r"C:\repo\setup.py"));
        assert!(e.line_filter.is_none());
    }

    #[test]
    fn test_parse_location_errors() {
        assert!(VersionFileEntry::parse(":^version").is_err());
        assert!(VersionFileEntry::parse("setup.py:(").is_err());
    }

    #[test]
    fn test_update_replaces_all_occurrences() {
        let dir = TempDir::new().unwrap();
        let a = write(&dir, "_metadata.py", "VERSION = \"1.2.0\"  # 1.2.0\n");
        let b = write(&dir, "README.md", "Install 1.2.0\r\nDone\r\n");

        update_version_in_files("1.2.0", "1.3.0", &[entry(&a), entry(&b)], true).unwrap();

        assert_eq!(fs::read_to_string(&a).unwrap(), "VERSION = \"1.3.0\"  # 1.3.0\n");
        assert_eq!(fs::read_to_string(&b).unwrap(), "Install 1.3.0\r\nDone\r\n");
    }

    #[test]
    fn test_line_filter_limits_replacement() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "Cargo.toml",
            "version = \"1.2.0\"\n[dependencies]\nfoo = \"1.2.0\"\n",
        );
        let e = VersionFileEntry::parse(&format!("{}:^version", path.display())).unwrap();

        update_version_in_files("1.2.0", "1.2.1", &[e], true).unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "version = \"1.2.1\"\n[dependencies]\nfoo = \"1.2.0\"\n"
        );
    }

    #[test]
    fn test_consistency_failure_touches_nothing() {
        let dir = TempDir::new().unwrap();
        let a = write(&dir, "a.py", "VERSION = \"1.2.0\"\n");
        let b = write(&dir, "b.py", "VERSION = \"1.1.9\"\n");

        let err = update_version_in_files("1.2.0", "1.3.0", &[entry(&a), entry(&b)], true)
            .unwrap_err();

        assert!(matches!(err, BumpError::VersionInconsistency { ref path, .. } if *path == b));
        assert_eq!(fs::read_to_string(&a).unwrap(), "VERSION = \"1.2.0\"\n");
        assert_eq!(fs::read_to_string(&b).unwrap(), "VERSION = \"1.1.9\"\n");
    }

    #[test]
    fn test_without_consistency_skips_mismatched_files() {
        let dir = TempDir::new().unwrap();
        let a = write(&dir, "a.py", "VERSION = \"1.2.0\"\n");
        let b = write(&dir, "b.py", "VERSION = \"1.1.9\"\n");

        update_version_in_files("1.2.0", "1.3.0", &[entry(&a), entry(&b)], false).unwrap();

        assert_eq!(fs::read_to_string(&a).unwrap(), "VERSION = \"1.3.0\"\n");
        assert_eq!(fs::read_to_string(&b).unwrap(), "VERSION = \"1.1.9\"\n");
    }

    #[test]
    fn test_repeated_path_with_different_filters() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "pkg.toml", "version = \"0.1.0\"\nmin = \"0.1.0\"\n");
        let first = VersionFileEntry::parse(&format!("{}:^version", path.display())).unwrap();
        let second = VersionFileEntry::parse(&format!("{}:^min", path.display())).unwrap();

        update_version_in_files("0.1.0", "0.2.0", &[first, second], true).unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "version = \"0.2.0\"\nmin = \"0.2.0\"\n"
        );
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.py");
        let err = update_version_in_files("1.0.0", "1.0.1", &[entry(&missing)], false).unwrap_err();
        assert!(matches!(err, BumpError::Io(_)));
    }

    #[test]
    fn test_snapshot_restores_bytes_and_removes_new_files() {
        let dir = TempDir::new().unwrap();
        let existing = write(&dir, "a.py", "VERSION = \"1.2.0\"\n");
        let created = dir.path().join("CHANGELOG.md");

        let snapshot =
            FileSnapshot::capture([existing.as_path(), created.as_path(), existing.as_path()])
                .unwrap();
        assert_eq!(snapshot.len(), 2);

        fs::write(&existing, "VERSION = \"9.9.9\"\n").unwrap();
        fs::write(&created, "## 9.9.9\n").unwrap();
        snapshot.restore().unwrap();

        assert_eq!(fs::read_to_string(&existing).unwrap(), "VERSION = \"1.2.0\"\n");
        assert!(!created.exists());
    }
}
