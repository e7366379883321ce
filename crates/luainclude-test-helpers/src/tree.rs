use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary directory of script files, removed on drop
pub struct ScriptTree {
    dir: TempDir,
}

impl ScriptTree {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("failed to create temp dir"),
        }
    }

    /// Root directory of the tree
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Absolute path of a root-relative file
    pub fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    /// Write a file, creating parent directories as needed
    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        self.write_bytes(relative, content.as_bytes())
    }

    pub fn write_bytes(&self, relative: &str, content: &[u8]) -> PathBuf {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("failed to create script dir");
        }
        fs::write(&path, content).expect("failed to write script");
        path
    }
}

impl Default for ScriptTree {
    fn default() -> Self {
        Self::new()
    }
}
