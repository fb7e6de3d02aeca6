#![allow(dead_code)]

use git2::{Oid, Repository};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A throwaway repository with a configured identity
pub struct TestRepo {
    pub dir: TempDir,
    pub repo: Repository,
}

impl TestRepo {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        {
            let mut config = repo.config().unwrap();
            config.set_str("user.name", "Test Author").unwrap();
            config.set_str("user.email", "test@example.com").unwrap();
        }
        TestRepo { dir, repo }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn file(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn read(&self, name: &str) -> String {
        fs::read_to_string(self.file(name)).unwrap()
    }

    /// Write `content` to `name` and commit it
    pub fn commit_file(&self, name: &str, content: &str, message: &str) -> Oid {
        fs::write(self.file(name), content).unwrap();

        let mut index = self.repo.index().unwrap();
        index.add_path(Path::new(name)).unwrap();
        index.write().unwrap();

        let tree = self.repo.find_tree(index.write_tree().unwrap()).unwrap();
        let signature = self.repo.signature().unwrap();
        let parent = self.repo.head().ok().map(|h| h.peel_to_commit().unwrap());
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();

        self.repo
            .commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)
            .unwrap()
    }

    /// Commit a change to a scratch file
    pub fn commit(&self, message: &str) -> Oid {
        let content = format!("{}\n", message);
        self.commit_file("notes.txt", &content, message)
    }

    pub fn tag_head(&self, name: &str) {
        let head = self.repo.head().unwrap().peel_to_commit().unwrap();
        self.repo
            .tag_lightweight(name, head.as_object(), false)
            .unwrap();
    }

    pub fn head_message(&self) -> String {
        let head = self.repo.head().unwrap().peel_to_commit().unwrap();
        head.message().unwrap().to_string()
    }

    pub fn has_tag(&self, name: &str) -> bool {
        self.repo
            .find_reference(&format!("refs/tags/{}", name))
            .is_ok()
    }

    /// Content of `name` as committed at HEAD
    pub fn committed(&self, name: &str) -> String {
        let tree = self.repo.head().unwrap().peel_to_tree().unwrap();
        let entry = tree.get_path(Path::new(name)).unwrap();
        let blob = self.repo.find_blob(entry.id()).unwrap();
        String::from_utf8(blob.content().to_vec()).unwrap()
    }

    /// Content of `name` in the index as stored on disk, `None` when not staged
    pub fn staged(&self, name: &str) -> Option<String> {
        let repo = Repository::open(self.path()).unwrap();
        let index = repo.index().unwrap();
        let entry = index.get_path(Path::new(name), 0)?;
        let blob = repo.find_blob(entry.id).unwrap();
        Some(String::from_utf8(blob.content().to_vec()).unwrap())
    }

    #[cfg(unix)]
    pub fn install_hook(&self, name: &str, body: &str) {
        use std::os::unix::fs::PermissionsExt;

        let path = self.repo.path().join("hooks").join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, body).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    }
}

/// Released `1.2.0` with the version in `_metadata.py`, followed by `messages`
pub fn released_repo(messages: &[&str]) -> TestRepo {
    let repo = TestRepo::new();
    repo.commit_file("_metadata.py", "__version__ = \"1.2.0\"\n", "feat: first release");
    repo.tag_head("1.2.0");
    for message in messages {
        repo.commit(message);
    }
    repo
}
