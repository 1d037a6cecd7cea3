//! Comparison engine - lockstep walk over template and candidate
//!
//! The engine dispatches on the template node tag:
//!
//! - `Rule` → rule evaluation (see [`Rule`](crate::Rule))
//! - `Mapping` → exact key sets, then every key in template order
//! - `Sequence` → element 0 is the schema for every candidate element
//! - `Scalar` → same kind, equal value (integers and floats coerce)
//!
//! Traversal is depth-first, left to right. In [`Mode::First`] the first
//! mismatch halts the walk; in [`Mode::All`] every sibling is visited and
//! all mismatches are collected.

use crate::{
    values_equal, ConfigError, Error, Failure, Format, Kind, Mismatch, Path, Reason, Rule,
    Segment, Template, MAX_DEPTH,
};
use serde_json::{Map, Value};

/// Stand-in for a key the candidate omits but an `allow_nil` rule tolerates.
static ABSENT: Value = Value::Null;

/// How many mismatches a comparison reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    /// Stop at the first mismatch.
    #[default]
    First,
    /// Visit every position and report all mismatches.
    All,
}

/// Per-call comparison settings.
///
/// ```
/// use exemplar::{CompareOptions, Format, Mode};
///
/// let options = CompareOptions::new().mode(Mode::All).format(Format::Mini);
/// assert_eq!(options.mode, Mode::All);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompareOptions {
    /// First mismatch only, or all of them.
    pub mode: Mode,
    /// How the resulting [`Failure`] renders.
    pub format: Format,
}

impl CompareOptions {
    /// `First` / `Full`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the mode.
    #[must_use]
    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the rendering format.
    #[must_use]
    pub fn format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }
}

/// Compare a candidate against a template whose root is a mapping.
///
/// # Example
///
/// ```
/// use exemplar::{compare, CompareOptions, Error, Template};
/// use serde_json::json;
///
/// let template = Template::from(json!({ "a": 1, "b": 2 }));
///
/// assert!(compare(&template, &json!({ "b": 2, "a": 1.0 }), CompareOptions::new()).is_ok());
///
/// let err = compare(&template, &json!({ "a": 1 }), CompareOptions::new()).unwrap_err();
/// assert!(err.to_string().contains("missing: b"));
/// ```
///
/// # Errors
///
/// - [`Error::Config`] with [`ConfigError::RootNotMapping`] if the template
///   root is not a mapping (a rule whose example is a mapping is accepted)
/// - [`Error::Mismatch`] if the candidate does not conform
pub fn compare(
    template: &Template,
    candidate: &Value,
    options: CompareOptions,
) -> Result<(), Error> {
    let kind = template.kind();
    if kind != Kind::Mapping {
        return Err(ConfigError::RootNotMapping { found: kind }.into());
    }
    template.diff(candidate, options)?;
    Ok(())
}

impl Template {
    /// Compare a candidate against this node, whatever its kind.
    ///
    /// This is the recursive engine behind [`compare`]; use it directly for
    /// sub-templates that are sequences or scalars.
    ///
    /// ```
    /// use exemplar::{CompareOptions, Reason, Template};
    /// use serde_json::json;
    ///
    /// let template = Template::from(json!([{ "x": 1 }]));
    /// assert!(template.diff(&json!([]), CompareOptions::new()).is_ok());
    ///
    /// let failure = template
    ///     .diff(&json!([{ "x": 1 }, { "x": 2 }]), CompareOptions::new())
    ///     .unwrap_err();
    /// assert_eq!(failure.first().path().to_string(), "root/1/x");
    /// assert_eq!(*failure.first().reason(), Reason::ValueMismatch);
    /// ```
    ///
    /// # Errors
    ///
    /// Returns a [`Failure`] holding one mismatch in [`Mode::First`], or every
    /// mismatch in [`Mode::All`].
    pub fn diff(&self, candidate: &Value, options: CompareOptions) -> Result<(), Failure> {
        let mut cx = Comparator::new(options.mode);
        let mut path = Path::root();
        // Halt only signals early exit; the mismatch is in the comparator.
        let _ = cx.visit(self, candidate, &mut path);
        cx.finish(options.format)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Traversal
// ═══════════════════════════════════════════════════════════════════════════════

/// Early exit signal for [`Mode::First`].
#[derive(Debug)]
pub(crate) struct Halt;

/// Result of visiting one node: keep going, or halt.
pub(crate) type Flow = Result<(), Halt>;

/// The node a mismatch reports as expected. Only cloned when something fails.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Expected<'a> {
    /// A template node, usually the one being visited.
    Node(&'a Template),
    /// A bare rule evaluated outside any template.
    Rule(&'a Rule),
}

impl Expected<'_> {
    fn to_template(self) -> Template {
        match self {
            Self::Node(template) => template.clone(),
            Self::Rule(rule) => Template::from(rule.clone()),
        }
    }
}

impl<'a> From<&'a Template> for Expected<'a> {
    fn from(template: &'a Template) -> Self {
        Self::Node(template)
    }
}

/// Traversal state for one comparison.
pub(crate) struct Comparator {
    mode: Mode,
    mismatches: Vec<Mismatch>,
}

impl Comparator {
    pub(crate) fn new(mode: Mode) -> Self {
        Self {
            mode,
            mismatches: Vec::new(),
        }
    }

    /// Record a mismatch at `path`; halts unless collecting all.
    pub(crate) fn fail<'t>(
        &mut self,
        path: &Path,
        reason: Reason,
        expected: impl Into<Expected<'t>>,
        actual: &Value,
    ) -> Flow {
        self.mismatches.push(Mismatch::new(
            path.clone(),
            reason,
            expected.into().to_template(),
            actual.clone(),
        ));
        match self.mode {
            Mode::First => Err(Halt),
            Mode::All => Ok(()),
        }
    }

    pub(crate) fn finish(self, format: Format) -> Result<(), Failure> {
        match Failure::new(self.mismatches, format) {
            Some(failure) => Err(failure),
            None => Ok(()),
        }
    }

    pub(crate) fn visit(
        &mut self,
        template: &Template,
        candidate: &Value,
        path: &mut Path,
    ) -> Flow {
        if path.len() > MAX_DEPTH {
            return self.fail(
                path,
                Reason::DepthExceeded { max: MAX_DEPTH },
                template,
                candidate,
            );
        }

        match template {
            Template::Rule(rule) => rule.visit(Expected::Node(template), self, candidate, path),
            Template::Mapping(entries) => self.visit_mapping(template, entries, candidate, path),
            Template::Sequence(items) => self.visit_sequence(template, items, candidate, path),
            Template::Scalar(expected) => self.visit_scalar(template, expected, candidate, path),
        }
    }

    fn visit_mapping(
        &mut self,
        template: &Template,
        entries: &[(String, Template)],
        candidate: &Value,
        path: &mut Path,
    ) -> Flow {
        let object = match candidate {
            Value::Object(object) => object,
            Value::Null => return self.fail(path, Reason::NilMismatch, template, candidate),
            other => {
                return self.fail(path, type_mismatch(Kind::Mapping, other), template, candidate)
            }
        };

        if let Some(reason) = keys_mismatch(entries, object) {
            self.fail(path, reason, template, candidate)?;
        }

        for (key, child) in effective(entries) {
            let value = match object.get(key) {
                Some(value) => value,
                None if child.tolerates_absence() => &ABSENT,
                None => continue,
            };
            path.push(Segment::Key(key.clone()));
            let flow = self.visit(child, value, path);
            path.pop();
            flow?;
        }
        Ok(())
    }

    fn visit_sequence(
        &mut self,
        template: &Template,
        items: &[Template],
        candidate: &Value,
        path: &mut Path,
    ) -> Flow {
        let values = match candidate {
            Value::Array(values) => values,
            Value::Null => return self.fail(path, Reason::NilMismatch, template, candidate),
            other => {
                return self.fail(path, type_mismatch(Kind::Sequence, other), template, candidate)
            }
        };

        let Some(schema) = items.first() else {
            if values.is_empty() {
                return Ok(());
            }
            return self.fail(
                path,
                Reason::LengthMismatch {
                    expected: 0,
                    actual: values.len(),
                },
                template,
                candidate,
            );
        };

        for (index, value) in values.iter().enumerate() {
            path.push(Segment::Index(index));
            let flow = self.visit(schema, value, path);
            path.pop();
            flow?;
        }
        Ok(())
    }

    fn visit_scalar(
        &mut self,
        template: &Template,
        expected: &Value,
        candidate: &Value,
        path: &mut Path,
    ) -> Flow {
        match (expected.is_null(), candidate.is_null()) {
            (true, true) => return Ok(()),
            (true, false) | (false, true) => {
                return self.fail(path, Reason::NilMismatch, template, candidate)
            }
            (false, false) => {}
        }

        let (want, got) = (Kind::of(expected), Kind::of(candidate));
        if want != got {
            return self.fail(
                path,
                Reason::TypeMismatch {
                    expected: want,
                    actual: got,
                },
                template,
                candidate,
            );
        }

        if values_equal(expected, candidate) {
            Ok(())
        } else {
            self.fail(path, Reason::ValueMismatch, template, candidate)
        }
    }
}

fn type_mismatch(expected: Kind, actual: &Value) -> Reason {
    Reason::TypeMismatch {
        expected,
        actual: Kind::of(actual),
    }
}

/// Mapping entries with repeated keys resolved: the last occurrence wins.
fn effective(entries: &[(String, Template)]) -> impl Iterator<Item = &(String, Template)> {
    entries
        .iter()
        .enumerate()
        .filter(move |(i, (key, _))| !entries[i + 1..].iter().any(|(later, _)| later == key))
        .map(|(_, entry)| entry)
}

/// `None` when the key sets agree, allowing for absent `allow_nil` keys.
fn keys_mismatch(entries: &[(String, Template)], object: &Map<String, Value>) -> Option<Reason> {
    let missing: Vec<String> = effective(entries)
        .filter(|(key, child)| !object.contains_key(key) && !child.tolerates_absence())
        .map(|(key, _)| key.clone())
        .collect();
    let extra: Vec<String> = object
        .keys()
        .filter(|key| !entries.iter().any(|(k, _)| k == *key))
        .cloned()
        .collect();

    if missing.is_empty() && extra.is_empty() {
        return None;
    }
    Some(Reason::KeysMismatch {
        expected: effective(entries).map(|(key, _)| key.clone()).collect(),
        actual: object.keys().cloned().collect(),
        missing,
        extra,
    })
}
