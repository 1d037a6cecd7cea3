//! `Mismatch` - one point where the candidate diverges from the template

use crate::path::Escaped;
use crate::{Kind, Path, Template};
use serde_json::Value;
use std::fmt;

/// Why a position failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reason {
    /// The candidate's type class differs from the template's.
    TypeMismatch {
        /// Kind the template expects.
        expected: Kind,
        /// Kind the candidate has.
        actual: Kind,
    },

    /// A rule without `allow_nil` received null.
    UnexpectedNil,

    /// Exactly one of template and candidate is null at a non-rule position.
    NilMismatch,

    /// Mapping key sets differ.
    KeysMismatch {
        /// Template keys, in template order.
        expected: Vec<String>,
        /// Candidate keys, in candidate order.
        actual: Vec<String>,
        /// Template keys absent from the candidate.
        missing: Vec<String>,
        /// Candidate keys absent from the template.
        extra: Vec<String>,
    },

    /// Same kind, different value.
    ValueMismatch,

    /// The candidate's text does not match the rule's pattern.
    PatternMismatch {
        /// The pattern source.
        pattern: String,
    },

    /// The candidate is not one of the rule's `included_in` members.
    NotIncluded,

    /// An empty template sequence received a non-empty candidate.
    LengthMismatch {
        /// Expected length.
        expected: usize,
        /// Actual length.
        actual: usize,
    },

    /// The candidate nests deeper than [`MAX_DEPTH`](crate::MAX_DEPTH).
    DepthExceeded {
        /// The depth limit.
        max: usize,
    },
}

impl Reason {
    /// Stable machine-readable tag, e.g. `"pattern_mismatch"`.
    #[must_use]
    pub fn tag(&self) -> &'static str {
        match self {
            Self::TypeMismatch { .. } => "type_mismatch",
            Self::UnexpectedNil => "unexpected_nil",
            Self::NilMismatch => "nil_mismatch",
            Self::KeysMismatch { .. } => "keys_mismatch",
            Self::ValueMismatch => "value_mismatch",
            Self::PatternMismatch { .. } => "pattern_mismatch",
            Self::NotIncluded => "not_included",
            Self::LengthMismatch { .. } => "length_mismatch",
            Self::DepthExceeded { .. } => "depth_exceeded",
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TypeMismatch { expected, actual } => {
                write!(f, "expected {expected}, got {actual}")
            }
            Self::UnexpectedNil => f.write_str("unexpected null"),
            Self::NilMismatch => f.write_str("null does not match"),
            Self::KeysMismatch { missing, extra, .. } => {
                f.write_str("keys don't match")?;
                if !missing.is_empty() {
                    f.write_str("; missing: ")?;
                    write_names(f, missing)?;
                }
                if !extra.is_empty() {
                    f.write_str("; extra: ")?;
                    write_names(f, extra)?;
                }
                Ok(())
            }
            Self::ValueMismatch => f.write_str("values differ"),
            Self::PatternMismatch { pattern } => {
                write!(f, "does not match /{}/", Escaped(pattern))
            }
            Self::NotIncluded => f.write_str("not one of the allowed values"),
            Self::LengthMismatch { expected, actual } => {
                write!(f, "expected {expected} elements, got {actual}")
            }
            Self::DepthExceeded { max } => write!(f, "nesting exceeds maximum depth {max}"),
        }
    }
}

fn write_names(f: &mut fmt::Formatter<'_>, names: &[String]) -> fmt::Result {
    for (i, name) in names.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", Escaped(name))?;
    }
    Ok(())
}

/// A single divergence: where, why, and both sides.
///
/// `expected` is the template node at that position (a rule shows up as
/// itself, not its example), `actual` the candidate value there.
#[derive(Debug, Clone, PartialEq)]
pub struct Mismatch {
    path: Path,
    reason: Reason,
    expected: Template,
    actual: Value,
}

impl Mismatch {
    /// Create a new mismatch record.
    #[must_use]
    pub fn new(path: Path, reason: Reason, expected: Template, actual: Value) -> Self {
        Self {
            path,
            reason,
            expected,
            actual,
        }
    }

    /// Where the divergence is.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Why the position failed.
    #[must_use]
    pub fn reason(&self) -> &Reason {
        &self.reason
    }

    /// The template node at the path.
    #[must_use]
    pub fn expected(&self) -> &Template {
        &self.expected
    }

    /// The candidate value at the path.
    #[must_use]
    pub fn actual(&self) -> &Value {
        &self.actual
    }
}

/// Single-line summary: `<path>: <reason>`.
impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.reason)
    }
}
