use rustc_hash::FxHashSet;
use std::path::{Path, PathBuf};

/// Files currently being resolved
///
/// A path is entered before its includes are expanded and left once its
/// result is recorded. Entering a path that is already present means the
/// file includes itself, directly or through other files.
#[derive(Debug, Default)]
pub struct CycleGuard {
    resolving: FxHashSet<PathBuf>,
}

impl CycleGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `path` as in flight, `false` if it already was
    pub fn enter(&mut self, path: &Path) -> bool {
        self.resolving.insert(path.to_path_buf())
    }

    pub fn leave(&mut self, path: &Path) {
        self.resolving.remove(path);
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.resolving.contains(path)
    }

    pub fn len(&self) -> usize {
        self.resolving.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolving.is_empty()
    }

    pub fn clear(&mut self) {
        self.resolving.clear();
    }
}
