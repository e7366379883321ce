use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::errors::{Result, ScriptError};
use crate::resolver::normalize_path;

/// Directive used when no macro is configured
pub const DEFAULT_MACRO: &str = "#include";

/// Script extension used when no extension is configured
pub const DEFAULT_EXTENSION: &str = "lua";

/// Config file picked up from the working directory by the CLI
pub const CONFIG_FILE_NAME: &str = "luainclude.yaml";

/// How raw script bytes are turned into text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Encoding {
    /// Strict UTF-8, invalid input is an error
    #[serde(rename = "utf8", alias = "utf-8")]
    Utf8,
    /// UTF-8 with invalid sequences replaced by U+FFFD (the default)
    #[serde(rename = "utf8-lossy")]
    Utf8Lossy,
    /// One byte per character (ISO-8859-1)
    #[serde(rename = "latin1", alias = "binary")]
    Latin1,
}

impl Default for Encoding {
    fn default() -> Self {
        Encoding::Utf8Lossy
    }
}

impl Encoding {
    /// Decode raw file content, `None` when the bytes are invalid for this encoding
    pub fn decode(self, bytes: Vec<u8>) -> Option<String> {
        match self {
            Encoding::Utf8 => String::from_utf8(bytes).ok(),
            Encoding::Utf8Lossy => Some(String::from_utf8_lossy(&bytes).into_owned()),
            Encoding::Latin1 => Some(bytes.into_iter().map(char::from).collect()),
        }
    }
}

impl FromStr for Encoding {
    type Err = ScriptError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "utf8" | "utf-8" => Ok(Encoding::Utf8),
            "utf8-lossy" | "lossy" => Ok(Encoding::Utf8Lossy),
            "latin1" | "binary" => Ok(Encoding::Latin1),
            other => Err(ScriptError::Config(format!(
                "Unknown encoding '{}'. Supported encodings: utf8, utf8-lossy, latin1",
                other
            ))),
        }
    }
}

/// User supplied options, every key optional
///
/// Present keys override the defaults, absent keys keep them. Unknown keys in
/// a config file are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptOptions {
    /// Root directory of all script files
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,

    /// Include directive; an empty string disables include expansion
    #[serde(default, rename = "macro", skip_serializing_if = "Option::is_none")]
    pub macro_directive: Option<String>,

    /// The only valid extension for script files; empty means any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,

    /// Script file encoding
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding: Option<Encoding>,
}

/// CLI flags that take precedence over a config file
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub root: Option<PathBuf>,
    pub macro_directive: Option<String>,
    pub extension: Option<String>,
    pub encoding: Option<Encoding>,
}

impl ScriptOptions {
    /// Load options from a YAML or JSON file
    ///
    /// A relative `root` is taken relative to the directory holding the file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ScriptError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;

        let is_json = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let mut options: ScriptOptions = if is_json {
            serde_json::from_str(&content)
                .map_err(|e| ScriptError::Config(format!("{}: {}", path.display(), e)))?
        } else if content.trim().is_empty() {
            ScriptOptions::default()
        } else {
            serde_yaml::from_str(&content)
                .map_err(|e| ScriptError::Config(format!("{}: {}", path.display(), e)))?
        };

        if let Some(root) = options.root.take() {
            let base = path.parent().unwrap_or_else(|| Path::new(""));
            options.root = Some(if root.is_relative() {
                base.join(root)
            } else {
                root
            });
        }

        Ok(options)
    }

    /// Write a default configuration file
    pub fn init_file(path: &Path) -> Result<()> {
        let template = format!(
            r#"# luainclude configuration

root: "."               # Root directory of all script files
macro: "{}"       # Include directive, "" disables expansion
extension: "{}"          # Only valid script extension, "" allows any
encoding: "utf8-lossy"  # utf8-lossy, utf8 (strict) or latin1
"#,
            DEFAULT_MACRO, DEFAULT_EXTENSION
        );
        std::fs::write(path, template).map_err(|e| {
            ScriptError::Config(format!("cannot write {}: {}", path.display(), e))
        })
    }

    /// Merge CLI overrides into these options
    pub fn merge(&mut self, overrides: &CliOverrides) {
        if let Some(ref root) = overrides.root {
            self.root = Some(root.clone());
        }
        if let Some(ref macro_directive) = overrides.macro_directive {
            self.macro_directive = Some(macro_directive.clone());
        }
        if let Some(ref extension) = overrides.extension {
            self.extension = Some(extension.clone());
        }
        if let Some(encoding) = overrides.encoding {
            self.encoding = Some(encoding);
        }
    }
}

/// Where a [`ScriptConfig`] comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Only the root directory, everything else default
    FromPath(PathBuf),
    /// Structured options
    Options(ScriptOptions),
}

impl From<PathBuf> for ConfigSource {
    fn from(root: PathBuf) -> Self {
        ConfigSource::FromPath(root)
    }
}

impl From<&Path> for ConfigSource {
    fn from(root: &Path) -> Self {
        ConfigSource::FromPath(root.to_path_buf())
    }
}

impl From<&str> for ConfigSource {
    fn from(root: &str) -> Self {
        ConfigSource::FromPath(PathBuf::from(root))
    }
}

impl From<ScriptOptions> for ConfigSource {
    fn from(options: ScriptOptions) -> Self {
        ConfigSource::Options(options)
    }
}

/// Validated engine configuration, immutable once built
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptConfig {
    root: PathBuf,
    macro_directive: Option<String>,
    extension: String,
    encoding: Encoding,
}

impl ScriptConfig {
    pub fn new(source: impl Into<ConfigSource>) -> Result<Self> {
        let options = match source.into() {
            ConfigSource::FromPath(root) => ScriptOptions {
                root: Some(root),
                ..ScriptOptions::default()
            },
            ConfigSource::Options(options) => options,
        };

        let cwd = std::env::current_dir().map_err(|e| {
            ScriptError::Config(format!("cannot determine working directory: {}", e))
        });
        let root = match options.root {
            Some(root) if root.is_absolute() => root,
            Some(root) => cwd?.join(root),
            None => cwd?,
        };

        let macro_directive = match options.macro_directive {
            Some(m) if m.is_empty() => None,
            Some(m) => Some(m),
            None => Some(DEFAULT_MACRO.to_string()),
        };

        let extension =
            normalize_extension(options.extension.as_deref().unwrap_or(DEFAULT_EXTENSION));

        Ok(Self {
            root: normalize_path(&root),
            macro_directive,
            extension,
            encoding: options.encoding.unwrap_or_default(),
        })
    }

    /// Absolute root directory of all scripts
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Include directive, `None` when expansion is disabled
    pub fn macro_directive(&self) -> Option<&str> {
        self.macro_directive.as_deref()
    }

    /// Required script extension including the leading dot, or empty
    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }
}

fn normalize_extension(extension: &str) -> String {
    if extension.is_empty() || extension.starts_with('.') {
        extension.to_string()
    } else {
        format!(".{}", extension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = ScriptConfig::new(ScriptOptions::default()).unwrap();
        assert_eq!(config.macro_directive(), Some("#include"));
        assert_eq!(config.extension(), ".lua");
        assert_eq!(config.encoding(), Encoding::Utf8Lossy);
        assert!(config.root().is_absolute());
    }

    #[test]
    fn test_from_path_keeps_other_defaults() {
        let config = ScriptConfig::new("/srv/scripts/./lua/..").unwrap();
        assert_eq!(config.root(), Path::new("/srv/scripts"));
        assert_eq!(config.extension(), ".lua");
    }

    #[test]
    fn test_extension_normalization() {
        let options = ScriptOptions {
            root: Some(PathBuf::from("/tmp")),
            extension: Some("redis".to_string()),
            ..Default::default()
        };
        assert_eq!(ScriptConfig::new(options).unwrap().extension(), ".redis");

        let options = ScriptOptions {
            root: Some(PathBuf::from("/tmp")),
            extension: Some(".lua".to_string()),
            ..Default::default()
        };
        assert_eq!(ScriptConfig::new(options).unwrap().extension(), ".lua");

        let options = ScriptOptions {
            root: Some(PathBuf::from("/tmp")),
            extension: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(ScriptConfig::new(options).unwrap().extension(), "");
    }

    #[test]
    fn test_empty_macro_disables_expansion() {
        let options = ScriptOptions {
            root: Some(PathBuf::from("/tmp")),
            macro_directive: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(ScriptConfig::new(options).unwrap().macro_directive(), None);
    }

    #[test]
    fn test_deserialize_ignores_unknown_keys() {
        let yaml = "macro: \"--@import\"\nencoding: latin1\nverbose: true\n";
        let options: ScriptOptions = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(options.macro_directive.as_deref(), Some("--@import"));
        assert_eq!(options.encoding, Some(Encoding::Latin1));
        assert!(options.extension.is_none());
    }

    #[test]
    fn test_from_file_rebases_relative_root() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("luainclude.json");
        std::fs::write(&path, r#"{"root": "scripts", "extension": "txt"}"#).unwrap();

        let options = ScriptOptions::from_file(&path).unwrap();
        assert_eq!(options.root, Some(dir.path().join("scripts")));
        assert_eq!(options.extension.as_deref(), Some("txt"));
    }

    #[test]
    fn test_init_file_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        ScriptOptions::init_file(&path).unwrap();

        let options = ScriptOptions::from_file(&path).unwrap();
        assert_eq!(options.root, Some(dir.path().join(".")));
        assert_eq!(options.macro_directive.as_deref(), Some(DEFAULT_MACRO));
        assert_eq!(options.extension.as_deref(), Some(DEFAULT_EXTENSION));
        assert_eq!(options.encoding, Some(Encoding::Utf8Lossy));
    }

    #[test]
    fn test_merge_cli_overrides() {
        let mut options = ScriptOptions {
            extension: Some("lua".to_string()),
            encoding: Some(Encoding::Latin1),
            ..Default::default()
        };
        let overrides = CliOverrides {
            extension: Some("txt".to_string()),
            ..Default::default()
        };
        options.merge(&overrides);

        assert_eq!(options.extension.as_deref(), Some("txt"));
        assert_eq!(options.encoding, Some(Encoding::Latin1));
    }

    #[test]
    fn test_encoding_decode() {
        assert_eq!(Encoding::Utf8.decode(b"abc".to_vec()).as_deref(), Some("abc"));
        assert!(Encoding::Utf8.decode(vec![0xff, 0xfe]).is_none());
        assert_eq!(
            Encoding::Utf8Lossy.decode(vec![b'a', 0xff]).as_deref(),
            Some("a\u{fffd}")
        );
        assert_eq!(
            Encoding::Latin1.decode(vec![0xe9]).as_deref(),
            Some("\u{e9}")
        );
    }

    #[test]
    fn test_encoding_from_str() {
        assert_eq!("UTF-8".parse::<Encoding>().unwrap(), Encoding::Utf8);
        assert_eq!("binary".parse::<Encoding>().unwrap(), Encoding::Latin1);
        assert!("ucs2".parse::<Encoding>().is_err());
    }
}
