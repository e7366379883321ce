pub mod cache;
pub mod config;
pub mod directive;
pub mod engine;
pub mod errors;
pub mod fs;
pub mod resolver;
pub mod scan;

pub use cache::{digest, LoadedScript, ScriptCache};
pub use config::{CliOverrides, ConfigSource, Encoding, ScriptConfig, ScriptOptions};
pub use directive::{Directive, DirectiveMatcher};
pub use engine::ScriptEngine;
pub use errors::{Result, ScriptError};
pub use fs::{FileSystem, MockFileSystem, RealFileSystem};
pub use resolver::{PathResolver, ScriptPath};
