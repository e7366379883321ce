use std::path::{Component, Path};
use tracing::debug;

use crate::config::ScriptConfig;
use crate::errors::{Result, ScriptError};
use crate::fs::FileSystem;
use crate::resolver::{extname, normalize_path};

/// Root-relative names of the script files directly inside `dir`
///
/// `dir` is taken relative to the root; `None` scans the root itself.
/// Subdirectories are not descended into, and only regular files carrying
/// the configured extension are kept (any file when the extension is empty).
pub fn script_names(
    fs: &dyn FileSystem,
    config: &ScriptConfig,
    dir: Option<&Path>,
) -> Result<Vec<String>> {
    let root = config.root();
    let dir_path = match dir {
        Some(dir) => normalize_path(&root.join(dir)),
        None => root.to_path_buf(),
    };

    let relative_dir = dir_path
        .strip_prefix(root)
        .map_err(|_| ScriptError::OutsideRoot {
            name: dir_path.display().to_string(),
        })?;

    let ext = config.extension();
    let files = fs
        .list_files(&dir_path)
        .map_err(|e| ScriptError::io(&dir_path, e))?;

    let mut names = Vec::with_capacity(files.len());
    for file in files {
        let Some(file_name) = file.file_name().and_then(|f| f.to_str()) else {
            debug!("Skipping non-unicode file name {}", file.display());
            continue;
        };
        if !ext.is_empty() && extname(file_name) != ext {
            continue;
        }
        names.push(join_relative(relative_dir, file_name));
    }

    debug!(
        "Found {} script file(s) in {}",
        names.len(),
        dir_path.display()
    );
    Ok(names)
}

fn join_relative(dir: &Path, file_name: &str) -> String {
    let mut name = String::new();
    for component in dir.components() {
        if let Component::Normal(segment) = component {
            name.push_str(&segment.to_string_lossy());
            name.push('/');
        }
    }
    name.push_str(file_name);
    name
}
