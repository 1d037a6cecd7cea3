//! Assertion helpers for test suites.
//!
//! Thin wrappers over [`compare`]: [`check`] answers yes/no, and
//! [`assert_conforms`] (or the [`assert_conforms!`](crate::assert_conforms)
//! macro) panics with the rendered failure, which is what test harnesses
//! report.
//!
//! ```
//! use exemplar::{assert_conforms, Template};
//! use serde_json::json;
//!
//! let template = Template::from(json!({ "status": "ok", "items": [{ "id": 1 }] }));
//! assert_conforms!(template, json!({ "status": "ok", "items": [] }));
//! ```

use crate::{compare, CompareOptions, Error, Format, Template};
use serde_json::Value;

/// Returns `true` if `candidate` conforms to `template`.
///
/// A malformed call (template root not a mapping) also returns `false`;
/// it is logged at `warn` so it does not go unnoticed.
#[must_use]
pub fn check(template: &Template, candidate: &Value, format: Format) -> bool {
    match compare(template, candidate, CompareOptions::new().format(format)) {
        Ok(()) => true,
        Err(Error::Mismatch(failure)) => {
            tracing::debug!(
                path = %failure.first().path(),
                reason = failure.first().reason().tag(),
                "candidate does not conform\n{failure}"
            );
            false
        }
        Err(Error::Config(err)) => {
            tracing::warn!(error = %err, "template cannot be compared");
            false
        }
    }
}

/// Panic unless `candidate` conforms to `template`.
///
/// # Panics
///
/// With the rendered failure when the candidate does not conform, or with
/// the configuration error when the template root is not a mapping.
#[track_caller]
pub fn assert_conforms(template: &Template, candidate: &Value, format: Format) {
    match compare(template, candidate, CompareOptions::new().format(format)) {
        Ok(()) => {}
        Err(Error::Mismatch(failure)) => {
            tracing::debug!(path = %failure.first().path(), "assertion failed");
            panic!("candidate does not conform to template\n{failure}");
        }
        Err(Error::Config(err)) => panic!("invalid template: {err}"),
    }
}

/// Assert that a candidate conforms to a template.
///
/// Accepts anything that borrows as `Template` / `serde_json::Value`, and an
/// optional [`Format`] (default [`Format::Full`]).
///
/// ```should_panic
/// use exemplar::{assert_conforms, Format, Template};
/// use serde_json::json;
///
/// let template = Template::from(json!({ "a": 1 }));
/// assert_conforms!(template, json!({ "a": 2 }), Format::Mini);
/// ```
#[macro_export]
macro_rules! assert_conforms {
    ($template:expr, $candidate:expr $(,)?) => {
        $crate::assert::assert_conforms(&$template, &$candidate, $crate::Format::Full)
    };
    ($template:expr, $candidate:expr, $format:expr $(,)?) => {
        $crate::assert::assert_conforms(&$template, &$candidate, $format)
    };
}
