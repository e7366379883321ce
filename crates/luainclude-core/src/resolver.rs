//! Logical script names to files under the root directory
//!
//! A logical name is what callers and include directives use (`"util"`,
//! `"lib/json.lua"`, `"../shared"`). Resolution normalizes it lexically,
//! re-expresses it relative to the root and appends the configured extension
//! when the name does not already carry it. Existence is never checked here.

use std::path::{Component, Path, PathBuf};

use crate::config::ScriptConfig;
use crate::errors::{Result, ScriptError};

/// A script name resolved against the root directory
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScriptPath {
    /// Root-relative logical name, `/` separated, without `.` or `..`
    pub name: String,
    /// Absolute file path, always under the root
    pub path: PathBuf,
}

impl ScriptPath {
    /// Root-relative directory of this script, empty for scripts in the root
    pub fn dir(&self) -> &str {
        self.name.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("")
    }
}

pub struct PathResolver<'a> {
    config: &'a ScriptConfig,
}

impl<'a> PathResolver<'a> {
    pub fn new(config: &'a ScriptConfig) -> Self {
        Self { config }
    }

    /// Resolve a name requested directly by a caller
    pub fn resolve(&self, name: &str) -> Result<ScriptPath> {
        self.resolve_from("", name)
    }

    /// Resolve a name relative to the root-relative directory `from_dir`
    pub fn resolve_from(&self, from_dir: &str, name: &str) -> Result<ScriptPath> {
        let mut segments: Vec<&str> = from_dir.split('/').filter(|s| !s.is_empty()).collect();

        for component in Path::new(name).components() {
            match component {
                Component::Normal(segment) => match segment.to_str() {
                    Some(segment) => segments.push(segment),
                    None => {
                        return Err(ScriptError::Usage(format!(
                            "script name {:?} is not valid unicode",
                            name
                        )))
                    }
                },
                Component::CurDir => {}
                Component::ParentDir => {
                    if segments.pop().is_none() {
                        return Err(ScriptError::OutsideRoot {
                            name: name.to_string(),
                        });
                    }
                }
                Component::RootDir | Component::Prefix(_) => segments.clear(),
            }
        }

        if segments.is_empty() {
            return Err(ScriptError::Usage(format!(
                "script name {:?} does not name a file",
                name
            )));
        }

        let logical = segments.join("/");
        let ext = self.config.extension();
        let file_name = if extname(&logical) == ext {
            logical.clone()
        } else {
            format!("{}{}", logical, ext)
        };

        Ok(ScriptPath {
            path: self.config.root().join(file_name),
            name: logical,
        })
    }

    /// The extension-less alias of `name`, when `name` carries the configured extension
    pub fn alias<'n>(&self, name: &'n str) -> Option<&'n str> {
        let ext = self.config.extension();
        if ext.is_empty() || extname(name) != ext {
            return None;
        }
        Some(&name[..name.len() - ext.len()])
    }
}

/// Extension of the last path segment including the dot, empty when there is none
///
/// A leading dot (`.hidden`) does not start an extension.
pub fn extname(name: &str) -> &str {
    let start = name.rfind(|c| c == '/' || c == '\\').map(|i| i + 1).unwrap_or(0);
    let file = &name[start..];
    match file.rfind('.') {
        Some(0) | None => "",
        Some(dot) => &file[dot..],
    }
}

/// Lexically normalize a path, dropping `.` and folding `..`
///
/// `..` never climbs above the filesystem root.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() && !path.has_root() {
                    normalized.push("..");
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}
