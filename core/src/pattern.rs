//! `Pattern` - compiled `matches` option
//!
//! Wraps a [`regex::Regex`] so rules can be compared and displayed by their
//! source text. Matching is an unanchored search: `[A-Z]{3}` accepts
//! `"xSXFx"`. Anchor with `^...$` for whole-string matches.

use crate::{ConfigError, MAX_PATTERN_LENGTH};
use std::fmt;

/// A compiled regular expression with its source kept for display.
///
/// Uses Rust's `regex` crate, which guarantees linear time matching (no `ReDoS`).
///
/// # Example
///
/// ```
/// use exemplar::Pattern;
///
/// let pattern = Pattern::new("[A-Z]{3}").unwrap();
/// assert!(pattern.is_match("TXL"));
/// assert!(!pattern.is_match("txl"));
/// assert_eq!(pattern.to_string(), "/[A-Z]{3}/");
/// ```
#[derive(Debug, Clone)]
pub struct Pattern {
    regex: regex::Regex,
}

impl Pattern {
    /// Compile a pattern.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::PatternTooLong`] past [`MAX_PATTERN_LENGTH`], or
    /// [`ConfigError::InvalidPattern`] if the regex does not compile.
    pub fn new(source: &str) -> Result<Self, ConfigError> {
        if source.len() > MAX_PATTERN_LENGTH {
            return Err(ConfigError::PatternTooLong {
                len: source.len(),
                max: MAX_PATTERN_LENGTH,
            });
        }
        regex::Regex::new(source)
            .map(|regex| Self { regex })
            .map_err(|e| ConfigError::InvalidPattern {
                pattern: source.to_string(),
                reason: e.to_string(),
            })
    }

    /// Returns `true` if the pattern matches anywhere in `text`.
    #[inline]
    #[must_use]
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// Returns the pattern source.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

// Compiled automata have no equality; two patterns are equal when their
// sources are.
impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for Pattern {}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/", self.as_str())
    }
}
