//! Rule - a declarative constraint attached to one template position
//!
//! A rule pairs an example [`Template`] with typed options. The example is
//! both documentation and the structural reference; the options narrow or
//! relax what a candidate at that position may be.
//!
//! # Evaluation order
//!
//! Evaluation short-circuits on the first decision:
//!
//! 1. `allow_nil` and the candidate is null: pass.
//! 2. The candidate is null: fail with [`Reason::UnexpectedNil`].
//! 3. `compare_each` and the candidate is a sequence: check every element
//!    with the steps below against the element template, path extended by
//!    the index.
//! 4. The candidate's [`Kind`] must equal the example's.
//! 5. `matches`: the candidate's [`text_of`] must contain a match.
//! 6. `included_in`: the candidate must equal one of the members.
//! 7. If neither 5 nor 6 applied, compare the example structurally.
//!
//! `matches` and `included_in` are independent constraints; both must hold.

use crate::compare::{Comparator, Expected, Flow, Mode};
use crate::{
    text_of, values_equal, ConfigError, Format, Kind, Mismatch, Path, Pattern, Reason, Segment,
    Template,
};
use serde_json::Value;
use std::fmt;

/// Option names accepted by [`Rule::from_options`].
///
/// The snake_case spellings (`included_in`, `allow_nil`, `compare_each`) are
/// accepted as aliases.
pub const KNOWN_OPTIONS: &[&str] = &["matches", "includedIn", "allowNil", "compareEach"];

/// Typed rule options. Unset options are disabled.
///
/// # Example
///
/// ```
/// use exemplar::RuleOptions;
///
/// let options = RuleOptions::new()
///     .matches("^[A-Z]{3}$")
///     .allow_nil();
/// assert!(options.allow_nil);
/// assert!(!options.compare_each);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleOptions {
    /// Regex the candidate's textual form must contain a match for.
    pub matches: Option<String>,
    /// Acceptable values; the candidate must equal one of them.
    pub included_in: Option<Vec<Value>>,
    /// A null or absent candidate passes unconditionally.
    pub allow_nil: bool,
    /// A sequence candidate is checked element by element.
    pub compare_each: bool,
}

impl RuleOptions {
    /// No options set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the `matches` pattern.
    #[must_use]
    pub fn matches(mut self, pattern: impl Into<String>) -> Self {
        self.matches = Some(pattern.into());
        self
    }

    /// Set the `included_in` membership list.
    #[must_use]
    pub fn included_in<V: Into<Value>>(mut self, members: impl IntoIterator<Item = V>) -> Self {
        self.included_in = Some(members.into_iter().map(Into::into).collect());
        self
    }

    /// Enable `allow_nil`.
    #[must_use]
    pub fn allow_nil(mut self) -> Self {
        self.allow_nil = true;
        self
    }

    /// Enable `compare_each`.
    #[must_use]
    pub fn compare_each(mut self) -> Self {
        self.compare_each = true;
        self
    }
}

/// A declarative constraint: an example template plus compiled options.
///
/// Rules are immutable once built and cheap to share (`Template::Rule`
/// holds them behind an [`Arc`](std::sync::Arc)).
///
/// # Example
///
/// ```
/// use exemplar::{Reason, Rule, RuleOptions};
/// use serde_json::json;
///
/// let airport = Rule::new("TXL", RuleOptions::new().matches("^[A-Z]{3}$")).unwrap();
///
/// assert!(airport.evaluate(&json!("SXF")).is_ok());
///
/// let mismatch = airport.evaluate(&json!("xxx")).unwrap_err();
/// assert!(matches!(mismatch.reason(), Reason::PatternMismatch { .. }));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    example: Template,
    pattern: Option<Pattern>,
    included_in: Option<Vec<Value>>,
    allow_nil: bool,
    compare_each: bool,
}

impl Rule {
    /// Build a rule from an example and typed options.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPattern`] or [`ConfigError::PatternTooLong`]
    /// if the `matches` pattern cannot be compiled.
    pub fn new(example: impl Into<Template>, options: RuleOptions) -> Result<Self, ConfigError> {
        let pattern = options.matches.as_deref().map(Pattern::new).transpose()?;
        Ok(Self {
            example: example.into(),
            pattern,
            included_in: options.included_in,
            allow_nil: options.allow_nil,
            compare_each: options.compare_each,
        })
    }

    /// A rule with no options: the example is compared structurally.
    #[must_use]
    pub fn plain(example: impl Into<Template>) -> Self {
        Self {
            example: example.into(),
            pattern: None,
            included_in: None,
            allow_nil: false,
            compare_each: false,
        }
    }

    /// Build a rule from an untyped option bag.
    ///
    /// ```
    /// use exemplar::{ConfigError, Rule};
    /// use serde_json::json;
    ///
    /// let rule = Rule::from_options("EUR", &json!({ "includedIn": ["EUR", "USD"] })).unwrap();
    /// assert!(rule.evaluate(&json!("USD")).is_ok());
    ///
    /// let err = Rule::from_options("EUR", &json!({ "oneOf": ["EUR"] })).unwrap_err();
    /// assert!(matches!(err, ConfigError::UnknownOption { .. }));
    /// ```
    ///
    /// # Errors
    ///
    /// - [`ConfigError::InvalidOptions`] if `options` is not a mapping
    /// - [`ConfigError::UnknownOption`] for a name outside [`KNOWN_OPTIONS`]
    /// - [`ConfigError::InvalidMembership`] if `includedIn` is not a sequence
    /// - [`ConfigError::InvalidPattern`] if `matches` is not a string or does not compile
    /// - [`ConfigError::InvalidFlag`] if `allowNil` / `compareEach` is not a boolean
    pub fn from_options(
        example: impl Into<Template>,
        options: &Value,
    ) -> Result<Self, ConfigError> {
        let Value::Object(bag) = options else {
            return Err(ConfigError::InvalidOptions {
                found: Kind::of(options),
            });
        };

        let mut typed = RuleOptions::new();
        for (name, value) in bag {
            match name.as_str() {
                "matches" => match value {
                    Value::String(pattern) => typed.matches = Some(pattern.clone()),
                    other => {
                        return Err(ConfigError::InvalidPattern {
                            pattern: other.to_string(),
                            reason: format!("expected a string, got {}", Kind::of(other)),
                        })
                    }
                },
                "includedIn" | "included_in" => match value {
                    Value::Array(members) => typed.included_in = Some(members.clone()),
                    other => {
                        return Err(ConfigError::InvalidMembership {
                            found: Kind::of(other),
                        })
                    }
                },
                "allowNil" | "allow_nil" => typed.allow_nil = flag(name, value)?,
                "compareEach" | "compare_each" => typed.compare_each = flag(name, value)?,
                _ => {
                    return Err(ConfigError::UnknownOption {
                        name: name.clone(),
                        known: KNOWN_OPTIONS,
                    })
                }
            }
        }

        Self::new(example, typed)
    }

    /// The example template.
    #[must_use]
    pub fn example(&self) -> &Template {
        &self.example
    }

    /// The compiled `matches` pattern, if set.
    #[must_use]
    pub fn pattern(&self) -> Option<&Pattern> {
        self.pattern.as_ref()
    }

    /// The `included_in` members, if set.
    #[must_use]
    pub fn included_in(&self) -> Option<&[Value]> {
        self.included_in.as_deref()
    }

    /// Whether a null or absent candidate passes.
    #[must_use]
    pub fn allow_nil(&self) -> bool {
        self.allow_nil
    }

    /// Whether sequence candidates are checked element-wise.
    #[must_use]
    pub fn compare_each(&self) -> bool {
        self.compare_each
    }

    /// Evaluate a candidate against this rule alone.
    ///
    /// The mismatch path is relative to the rule's position: it is empty
    /// unless `compare_each` or a nested example descended further.
    ///
    /// # Errors
    ///
    /// Returns the first [`Mismatch`] found.
    pub fn evaluate(&self, candidate: &Value) -> Result<(), Mismatch> {
        let mut cx = Comparator::new(Mode::First);
        let mut path = Path::root();
        // Halt only signals early exit; the mismatch is in the comparator.
        let _ = self.visit(Expected::Rule(self), &mut cx, candidate, &mut path);
        match cx.finish(Format::default()) {
            Ok(()) => Ok(()),
            Err(failure) => Err(failure.into_first()),
        }
    }

    /// `expected` is the node reported on failure: the template position
    /// holding this rule, or the bare rule itself.
    pub(crate) fn visit(
        &self,
        expected: Expected<'_>,
        cx: &mut Comparator,
        candidate: &Value,
        path: &mut Path,
    ) -> Flow {
        if let (true, Value::Array(items)) = (self.compare_each, candidate) {
            return self.visit_each(cx, items, path, expected);
        }

        self.visit_one(Some(&self.example), cx, candidate, path, expected)
    }

    fn visit_each(
        &self,
        cx: &mut Comparator,
        items: &[Value],
        path: &mut Path,
        expected: Expected<'_>,
    ) -> Flow {
        let element = match &self.example {
            Template::Sequence(schema) => schema.first(),
            other => Some(other),
        };

        for (index, item) in items.iter().enumerate() {
            path.push(Segment::Index(index));
            let flow = self.visit_one(element, cx, item, path, expected);
            path.pop();
            flow?;
        }
        Ok(())
    }

    /// Steps 1, 2 and 4-7 for a single value. `example` is `None` when an
    /// empty example sequence leaves no element template.
    fn visit_one(
        &self,
        example: Option<&Template>,
        cx: &mut Comparator,
        candidate: &Value,
        path: &mut Path,
        expected: Expected<'_>,
    ) -> Flow {
        if candidate.is_null() {
            if self.allow_nil {
                return Ok(());
            }
            return cx.fail(path, Reason::UnexpectedNil, expected, candidate);
        }

        if let Some(example) = example {
            let (want, got) = (example.kind(), Kind::of(candidate));
            if want != got {
                return cx.fail(
                    path,
                    Reason::TypeMismatch {
                        expected: want,
                        actual: got,
                    },
                    expected,
                    candidate,
                );
            }
        }

        if let Some(pattern) = &self.pattern {
            if !pattern.is_match(&text_of(candidate)) {
                return cx.fail(
                    path,
                    Reason::PatternMismatch {
                        pattern: pattern.as_str().to_string(),
                    },
                    expected,
                    candidate,
                );
            }
        }

        if let Some(members) = &self.included_in {
            if !members.iter().any(|m| values_equal(m, candidate)) {
                return cx.fail(path, Reason::NotIncluded, expected, candidate);
            }
        }

        if self.pattern.is_some() || self.included_in.is_some() {
            return Ok(());
        }

        match example {
            Some(example) => cx.visit(example, candidate, path),
            None => Ok(()),
        }
    }
}

fn flag(name: &str, value: &Value) -> Result<bool, ConfigError> {
    value.as_bool().ok_or_else(|| ConfigError::InvalidFlag {
        name: name.to_string(),
        found: Kind::of(value),
    })
}

/// One-line summary: `rule(<example>, matches: /re/, included_in: [..], allow_nil, compare_each)`.
impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rule({}", self.example)?;
        if let Some(pattern) = &self.pattern {
            write!(f, ", matches: {pattern}")?;
        }
        if let Some(members) = &self.included_in {
            write!(f, ", included_in: {}", Value::Array(members.clone()))?;
        }
        if self.allow_nil {
            f.write_str(", allow_nil")?;
        }
        if self.compare_each {
            f.write_str(", compare_each")?;
        }
        f.write_str(")")
    }
}
