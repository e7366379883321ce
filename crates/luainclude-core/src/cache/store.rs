use rustc_hash::FxHashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

use super::{digest, CycleGuard};

/// Expanded content of a script and the SHA-1 of that content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedScript {
    pub code: String,
    pub digest: String,
}

impl LoadedScript {
    /// Wrap fully expanded content, computing its digest
    pub fn new(code: String) -> Self {
        let digest = digest(&code);
        Self { code, digest }
    }
}

/// Per-engine cache of resolved scripts
///
/// Entries are written once per key and never mutated afterwards; the only
/// way to drop them is [`ScriptCache::clear`], which also empties the cycle
/// guard so that nothing half resolved before the clear survives it.
#[derive(Debug, Default)]
pub struct ScriptCache {
    /// Resolved file path -> script, shared by every name pointing at the file
    by_path: FxHashMap<PathBuf, Arc<LoadedScript>>,

    /// Logical name (or alias) -> script
    by_name: FxHashMap<String, Arc<LoadedScript>>,

    guard: CycleGuard,
}

impl ScriptCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expanded code of a loaded name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.by_name.get(name).map(|s| s.code.as_str())
    }

    /// Digest of a loaded name
    pub fn get_digest(&self, name: &str) -> Option<&str> {
        self.by_name.get(name).map(|s| s.digest.as_str())
    }

    pub fn get_path(&self, path: &Path) -> Option<&Arc<LoadedScript>> {
        self.by_path.get(path)
    }

    pub fn has_path(&self, path: &Path) -> bool {
        self.by_path.contains_key(path)
    }

    /// Record a freshly expanded script under its path, name and optional alias
    pub fn put(
        &mut self,
        path: &Path,
        name: &str,
        script: LoadedScript,
        alias: Option<&str>,
    ) -> Arc<LoadedScript> {
        let script = self
            .by_path
            .entry(path.to_path_buf())
            .or_insert_with(|| Arc::new(script))
            .clone();
        self.register(name, &script, alias);
        script
    }

    /// Point a name (and alias) at an already cached script
    ///
    /// Existing names keep their first entry.
    pub fn register(&mut self, name: &str, script: &Arc<LoadedScript>, alias: Option<&str>) {
        for key in std::iter::once(name).chain(alias) {
            self.by_name
                .entry(key.to_string())
                .or_insert_with(|| Arc::clone(script));
        }
    }

    /// Mark `path` as in flight; `false` when it already was
    pub fn enter(&mut self, path: &Path) -> bool {
        self.guard.enter(path)
    }

    pub fn leave(&mut self, path: &Path) {
        self.guard.leave(path);
    }

    pub fn is_resolving(&self, path: &Path) -> bool {
        self.guard.contains(path)
    }

    /// Number of names (including aliases) that resolve to a script
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Drop every cached script and every in-flight marker
    pub fn clear(&mut self) {
        debug!(
            "Clearing {} cached names, {} files, {} in-flight paths",
            self.by_name.len(),
            self.by_path.len(),
            self.guard.len()
        );
        self.by_path.clear();
        self.by_name.clear();
        self.guard.clear();
    }
}
