use regex::Regex;
use std::ops::Range;

use crate::errors::{Result, ScriptError};

/// Comment leader written before the boundary markers around included code
pub const MARKER_PREFIX: &str = "--";

/// An include directive found in script text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive<'t> {
    /// Byte range of the whole directive line, without its line terminator
    pub line: Range<usize>,
    /// Included name exactly as written between the quotes
    pub argument: &'t str,
}

/// Finds include directives for one configured macro
///
/// A directive starts a line (after optional spaces or tabs), spells the
/// macro literally and is followed by a single or double quoted name. The
/// closing quote must match the opening one.
#[derive(Debug, Clone)]
pub struct DirectiveMatcher {
    macro_directive: String,
    pattern: Regex,
}

impl DirectiveMatcher {
    pub fn new(macro_directive: &str) -> Result<Self> {
        let pattern = format!(
            r#"(?m)^[ \t]*{}[ \t]*(?:"([^"\r\n]+)"|'([^'\r\n]+)')[^\r\n]*"#,
            regex::escape(macro_directive)
        );
        let pattern = Regex::new(&pattern).map_err(|e| {
            ScriptError::Config(format!("invalid macro {:?}: {}", macro_directive, e))
        })?;

        Ok(Self {
            macro_directive: macro_directive.to_string(),
            pattern,
        })
    }

    /// First directive whose line starts at or after `start`
    ///
    /// `start` must be a line boundary for line-anchored matching to hold.
    pub fn find_at<'t>(&self, text: &'t str, start: usize) -> Option<Directive<'t>> {
        let captures = self.pattern.captures_at(text, start)?;
        let line = captures.get(0)?.range();
        let argument = captures.get(1).or_else(|| captures.get(2))?.as_str();
        Some(Directive { line, argument })
    }

    /// Included code wrapped in its opening and closing marker lines
    pub fn block(&self, argument: &str, included: &str) -> String {
        format!(
            "{prefix} {directive} {arg}:\n{included}\n{prefix} End of {arg}",
            prefix = MARKER_PREFIX,
            directive = self.macro_directive,
            arg = argument,
            included = included,
        )
    }
}
