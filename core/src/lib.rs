//! exemplar - validate nested data against example templates
//!
//! A template is an ordinary data value that doubles as schema and as
//! documentation example. Any position in it may be replaced by a [`Rule`]
//! ("must match this regex", "must be one of these values", "may be null").
//! Comparison walks template and candidate in lockstep and reports the exact
//! path where they diverge.
//!
//! # Architecture
//!
//! - [`Template`] - Closed tagged union: `Rule`, `Mapping`, `Sequence`, `Scalar`
//! - [`Rule`] - Example template plus typed options ([`RuleOptions`])
//! - [`compare`] - Top-level entry (template root must be a mapping)
//! - [`Template::diff`] - Recursive engine, any node type
//! - [`Failure`] / [`Mismatch`] - Structured outcome, rendered per [`Format`]
//!
//! # Key Design Insights
//!
//! 1. **First element is the schema**: a template sequence is never compared
//!    positionally. Element 0 describes every candidate element, and an empty
//!    candidate sequence is valid ("can be empty, but not null").
//!
//! 2. **Exact key sets**: mappings must carry exactly the template's keys.
//!    The only tolerated absence is a key governed by an `allow_nil` rule.
//!
//! 3. **Numbers are one kind**: `2` and `2.0` are equal.
//!
//! # Example
//!
//! ```
//! use exemplar::prelude::*;
//! use serde_json::json;
//!
//! let code = Rule::new("TXL", RuleOptions::new().matches("^[A-Z]{3}$")).unwrap();
//! let template = Template::mapping([
//!     ("flights", Template::sequence([Template::mapping([("code", code)])])),
//! ]);
//!
//! let ok = json!({ "flights": [{ "code": "SXF" }] });
//! assert!(compare(&template, &ok, CompareOptions::default()).is_ok());
//!
//! let bad = json!({ "flights": [{ "code": "SXF" }, { "code": "xxx" }] });
//! let Err(Error::Mismatch(failure)) = compare(&template, &bad, CompareOptions::default()) else {
//!     panic!("expected a mismatch");
//! };
//! assert_eq!(failure.first().path().to_string(), "root/flights/1/code");
//! ```

// ═══════════════════════════════════════════════════════════════════════════════
// Modules
// ═══════════════════════════════════════════════════════════════════════════════

pub mod assert;
mod compare;
mod mismatch;
mod path;
mod pattern;
mod report;
mod rule;
mod template;
mod value;

// ═══════════════════════════════════════════════════════════════════════════════
// Public API
// ═══════════════════════════════════════════════════════════════════════════════

pub use compare::{compare, CompareOptions, Mode};
pub use mismatch::{Mismatch, Reason};
pub use path::{Path, Segment, ROOT_SEGMENT, SEPARATOR};
pub use pattern::Pattern;
pub use report::{Failure, Format};
pub use rule::{Rule, RuleOptions, KNOWN_OPTIONS};
pub use template::Template;
pub use value::{text_of, values_equal, Kind};

// ═══════════════════════════════════════════════════════════════════════════════
// Prelude
// ═══════════════════════════════════════════════════════════════════════════════

/// Prelude module for convenient imports.
///
/// ```
/// use exemplar::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        compare, CompareOptions, ConfigError, Error, Failure, Format, Kind, Mismatch, Mode,
        Path, Reason, Rule, RuleOptions, Segment, Template,
    };
}

// ═══════════════════════════════════════════════════════════════════════════════
// Constants
// ═══════════════════════════════════════════════════════════════════════════════

/// Maximum nesting depth the engine descends into.
///
/// Deeper candidates produce a [`Reason::DepthExceeded`] mismatch instead of
/// recursing further, which keeps pathological input off the call stack.
pub const MAX_DEPTH: usize = 128;

/// Maximum length for a `matches` regex pattern.
///
/// Regex compilation is expensive even with the linear-time Rust `regex` crate.
pub const MAX_PATTERN_LENGTH: usize = 4096;

// ═══════════════════════════════════════════════════════════════════════════════
// Errors
// ═══════════════════════════════════════════════════════════════════════════════

/// Caller misuse detected at construction or entry time.
///
/// These are never produced by a comparison itself. Fix the template or
/// the rule options and try again.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// An option name is not one of [`KNOWN_OPTIONS`].
    #[error("unknown rule option \"{name}\"; known options: {}", .known.join(", "))]
    UnknownOption {
        /// The unrecognized option name.
        name: String,
        /// Option names that ARE recognized (for self-correcting error messages).
        known: &'static [&'static str],
    },

    /// The option bag passed to [`Rule::from_options`] is not a mapping.
    #[error("rule options must be a mapping, got {found}")]
    InvalidOptions {
        /// Kind of the value that was supplied instead.
        found: Kind,
    },

    /// A `matches` pattern is not a string or does not compile.
    #[error("invalid pattern \"{pattern}\": {reason}")]
    InvalidPattern {
        /// The pattern as supplied.
        pattern: String,
        /// The underlying error message.
        reason: String,
    },

    /// A `matches` pattern exceeds [`MAX_PATTERN_LENGTH`].
    #[error("pattern length is {len}, but maximum allowed is {max}")]
    PatternTooLong {
        /// Actual length of the pattern.
        len: usize,
        /// Maximum allowed length.
        max: usize,
    },

    /// `includedIn` is not an enumerable value.
    #[error("includedIn must be a sequence of allowed values, got {found}")]
    InvalidMembership {
        /// Kind of the value that was supplied instead.
        found: Kind,
    },

    /// A boolean option (`allowNil`, `compareEach`) holds a non-boolean.
    #[error("option \"{name}\" must be a boolean, got {found}")]
    InvalidFlag {
        /// The option name.
        name: String,
        /// Kind of the value that was supplied instead.
        found: Kind,
    },

    /// The template passed to [`compare`] is not a mapping.
    #[error("template root must be a mapping, got {found}; use Template::diff for sub-templates")]
    RootNotMapping {
        /// Kind of the template root.
        found: Kind,
    },
}

/// Outcome of [`compare`] when it does not succeed.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// The call itself was malformed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The candidate does not conform to the template.
    #[error(transparent)]
    Mismatch(#[from] Failure),
}

impl Error {
    /// Returns the validation failure, if this is one.
    #[must_use]
    pub fn as_failure(&self) -> Option<&Failure> {
        match self {
            Self::Mismatch(failure) => Some(failure),
            Self::Config(_) => None,
        }
    }
}
