use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Failed to read script file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Script file {path} is not valid UTF-8")]
    Decode { path: PathBuf },

    #[error("Circular file resolution detected for file {path}")]
    CircularDependency { path: PathBuf },

    #[error("Script \"{name}\" has not been loaded yet")]
    NotLoaded { name: String },

    #[error("Invalid usage: {0}")]
    Usage(String),

    #[error("Script name \"{name}\" resolves outside of the root directory")]
    OutsideRoot { name: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ScriptError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ScriptError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ScriptError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circular_message_names_path() {
        let err = ScriptError::CircularDependency {
            path: PathBuf::from("/scripts/a.lua"),
        };
        assert_eq!(
            err.to_string(),
            "Circular file resolution detected for file /scripts/a.lua"
        );
    }

    #[test]
    fn test_not_loaded_message() {
        let err = ScriptError::NotLoaded {
            name: "test".to_string(),
        };
        assert_eq!(err.to_string(), "Script \"test\" has not been loaded yet");
    }
}
