//! The script engine: loading, include expansion and cached lookups
//!
//! ```no_run
//! use luainclude_core::ScriptEngine;
//!
//! let mut engine = ScriptEngine::new("/srv/app/scripts")?;
//! engine.load_all(&["ratelimit", "queue/pop.lua"])?;
//!
//! let code = engine.code("ratelimit")?;
//! let sha = engine.digest("queue/pop")?;
//! # let _ = (code, sha);
//! # Ok::<(), luainclude_core::ScriptError>(())
//! ```

use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, trace, warn};

use crate::cache::{LoadedScript, ScriptCache};
use crate::config::{ConfigSource, ScriptConfig};
use crate::directive::DirectiveMatcher;
use crate::errors::{Result, ScriptError};
use crate::fs::{FileSystem, RealFileSystem};
use crate::resolver::{PathResolver, ScriptPath};
use crate::scan;

/// Resolves scripts into their expanded form and keeps them for the life of the engine
pub struct ScriptEngine {
    config: ScriptConfig,
    file_system: Arc<dyn FileSystem>,
    /// `None` when include expansion is disabled
    matcher: Option<Arc<DirectiveMatcher>>,
    cache: ScriptCache,
}

impl ScriptEngine {
    /// Create an engine reading from the real file system
    pub fn new(source: impl Into<ConfigSource>) -> Result<Self> {
        let config = ScriptConfig::new(source)?;
        Self::with_file_system(config, Arc::new(RealFileSystem::new()))
    }

    /// Create an engine with a custom file system (for testing)
    pub fn with_file_system(
        config: ScriptConfig,
        file_system: Arc<dyn FileSystem>,
    ) -> Result<Self> {
        let matcher = config
            .macro_directive()
            .map(DirectiveMatcher::new)
            .transpose()?
            .map(Arc::new);

        debug!(
            "Script engine rooted at {} (macro: {:?}, extension: {:?})",
            config.root().display(),
            config.macro_directive(),
            config.extension()
        );

        Ok(Self {
            config,
            file_system,
            matcher,
            cache: ScriptCache::new(),
        })
    }

    pub fn config(&self) -> &ScriptConfig {
        &self.config
    }

    pub fn cache(&self) -> &ScriptCache {
        &self.cache
    }

    /// Load one script and return its expanded code
    pub fn load(&mut self, name: &str) -> Result<String> {
        validate_name(name)?;
        let target = PathResolver::new(&self.config).resolve(name)?;
        let script = self.resolve(name, &target)?;
        Ok(script.code.clone())
    }

    /// Load several scripts in order, stopping at the first failure
    ///
    /// Scripts loaded before the failure stay cached. On success the names
    /// are returned in the order they were loaded.
    pub fn load_all<S: AsRef<str>>(&mut self, names: &[S]) -> Result<Vec<String>> {
        if names.is_empty() {
            return Err(ScriptError::Usage(
                "at least one script name is required".to_string(),
            ));
        }
        for name in names {
            validate_name(name.as_ref())?;
        }

        let mut loaded = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref();
            if let Err(e) = self.load(name) {
                warn!("Failed to load script {}: {}", name, e);
                return Err(e);
            }
            loaded.push(name.to_string());
        }

        info!("Loaded {} script(s)", loaded.len());
        Ok(loaded)
    }

    /// Load every script file directly inside `dir` (relative to the root)
    ///
    /// `None` loads the root directory. Subdirectories are not descended into.
    pub fn load_dir(&mut self, dir: Option<&Path>) -> Result<Vec<String>> {
        let names = scan::script_names(self.file_system.as_ref(), &self.config, dir)?;
        if names.is_empty() {
            return Ok(names);
        }
        self.load_all(&names)
    }

    /// Expanded code of a loaded script
    pub fn code(&self, name: &str) -> Result<&str> {
        self.cache.get(name).ok_or_else(|| ScriptError::NotLoaded {
            name: name.to_string(),
        })
    }

    /// Hex SHA-1 of a loaded script's expanded code
    pub fn digest(&self, name: &str) -> Result<&str> {
        self.cache
            .get_digest(name)
            .ok_or_else(|| ScriptError::NotLoaded {
                name: name.to_string(),
            })
    }

    pub fn is_loaded(&self, name: &str) -> bool {
        self.cache.get(name).is_some()
    }

    /// Forget every loaded script and every in-flight resolution
    pub fn clear_cache(&mut self) {
        self.cache.clear();
        info!("Script cache cleared");
    }

    fn resolve(&mut self, name: &str, target: &ScriptPath) -> Result<Arc<LoadedScript>> {
        let alias = PathResolver::new(&self.config).alias(name);

        if let Some(script) = self.cache.get_path(&target.path).cloned() {
            trace!("Cache hit for {} ({})", name, target.path.display());
            self.cache.register(name, &script, alias);
            return Ok(script);
        }

        if !self.cache.enter(&target.path) {
            return Err(ScriptError::CircularDependency {
                path: target.path.clone(),
            });
        }

        // Failures from here on leave `target` in the guard until the cache is cleared.
        debug!("Resolving {} from {}", name, target.path.display());
        let bytes = self
            .file_system
            .read(&target.path)
            .map_err(|e| ScriptError::io(&target.path, e))?;
        let raw = self
            .config
            .encoding()
            .decode(bytes)
            .ok_or_else(|| ScriptError::Decode {
                path: target.path.clone(),
            })?;

        let code = match self.matcher.clone() {
            Some(matcher) => self.expand_includes(&matcher, target, raw)?,
            None => raw,
        };

        let script = self
            .cache
            .put(&target.path, name, LoadedScript::new(code), alias);
        self.cache.leave(&target.path);

        debug!("Resolved {} (sha1 {})", name, script.digest);
        Ok(script)
    }

    /// Replace every include directive in `code`, left to right
    ///
    /// Scanning resumes at the start of each inserted block, so text brought
    /// in by a replacement is scanned as well.
    fn expand_includes(
        &mut self,
        matcher: &DirectiveMatcher,
        target: &ScriptPath,
        mut code: String,
    ) -> Result<String> {
        let mut cursor = 0;

        while let Some(directive) = matcher.find_at(&code, cursor) {
            let line = directive.line.clone();
            let argument = directive.argument.to_string();

            let include =
                PathResolver::new(&self.config).resolve_from(target.dir(), &argument)?;
            trace!("{} includes {}", target.name, include.name);

            let included = self.resolve(&include.name, &include)?;
            let block = matcher.block(&argument, &included.code);
            code.replace_range(line.clone(), &block);
            cursor = line.start;
        }

        Ok(code)
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(ScriptError::Usage(
            "script names must not be empty".to_string(),
        ));
    }
    Ok(())
}
