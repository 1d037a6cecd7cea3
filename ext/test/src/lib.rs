//! exemplar-test: conformance tooling for exemplar
//!
//! Fixture templates are plain data. Rules have no native encoding in JSON or
//! YAML, so fixtures spell them as a single-key mapping under [`RULE_KEY`]:
//!
//! ```yaml
//! code:
//!   $rule:
//!     example: TXL
//!     matches: "^[A-Z]{3}$"
//! ```
//!
//! # Example
//!
//! ```
//! use exemplar_test::template_from_fixture;
//! use serde_json::json;
//!
//! let template = template_from_fixture(&json!({
//!     "code": { "$rule": { "example": "TXL", "matches": "^[A-Z]{3}$" } },
//!     "gates": [1],
//! }))
//! .unwrap();
//!
//! assert!(template.get("code").unwrap().is_rule());
//! assert_eq!(template.to_example_value(), json!({ "code": "TXL", "gates": [1] }));
//! ```

use exemplar::{ConfigError, Kind, Path, Rule, Segment, Template};
use serde_json::{Map, Value};

#[cfg(feature = "fixtures")]
pub mod fixture;

/// Marker key of a rule node in fixture data.
pub const RULE_KEY: &str = "$rule";

/// Key holding the rule's example inside a [`RULE_KEY`] mapping.
pub const EXAMPLE_KEY: &str = "example";

/// A fixture template that cannot be turned into a [`Template`].
#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    /// `$rule` holds something other than a mapping.
    #[error("`$rule` at {path} must be a mapping, got {found}")]
    RuleNotMapping { path: String, found: Kind },

    /// `$rule` mapping without `example`.
    #[error("rule at {path} has no `example`")]
    MissingExample { path: String },

    /// The rule options were rejected.
    #[error("invalid rule at {path}: {source}")]
    InvalidRule {
        path: String,
        #[source]
        source: ConfigError,
    },

    /// The fixture file is not valid YAML for the fixture schema.
    #[cfg(feature = "fixtures")]
    #[error("invalid fixture: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Build a [`Template`] from fixture data, turning `$rule` nodes into rules.
///
/// # Errors
///
/// Returns [`FixtureError`] naming the template path of the first malformed
/// rule node.
pub fn template_from_fixture(value: &Value) -> Result<Template, FixtureError> {
    build(value, &mut Path::root())
}

fn build(value: &Value, path: &mut Path) -> Result<Template, FixtureError> {
    match value {
        Value::Object(map) if map.len() == 1 && map.contains_key(RULE_KEY) => {
            build_rule(&map[RULE_KEY], path)
        }
        Value::Object(map) => {
            let mut entries = Vec::with_capacity(map.len());
            for (key, child) in map {
                path.push(Segment::Key(key.clone()));
                let child = build(child, path);
                path.pop();
                entries.push((key.clone(), child?));
            }
            Ok(Template::Mapping(entries))
        }
        Value::Array(items) => {
            let mut built = Vec::with_capacity(items.len());
            for (index, item) in items.iter().enumerate() {
                path.push(Segment::Index(index));
                let item = build(item, path);
                path.pop();
                built.push(item?);
            }
            Ok(Template::Sequence(built))
        }
        scalar => Ok(Template::Scalar(scalar.clone())),
    }
}

fn build_rule(node: &Value, path: &mut Path) -> Result<Template, FixtureError> {
    let Value::Object(fields) = node else {
        return Err(FixtureError::RuleNotMapping {
            path: path.to_string(),
            found: Kind::of(node),
        });
    };
    let example = fields
        .get(EXAMPLE_KEY)
        .ok_or_else(|| FixtureError::MissingExample {
            path: path.to_string(),
        })?;
    let example = build(example, path)?;

    let options: Map<String, Value> = fields
        .iter()
        .filter(|(name, _)| name.as_str() != EXAMPLE_KEY)
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect();

    let rule = Rule::from_options(example, &Value::Object(options)).map_err(|source| {
        FixtureError::InvalidRule {
            path: path.to_string(),
            source,
        }
    })?;
    tracing::trace!(%path, %rule, "built fixture rule");
    Ok(rule.into())
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use super::{template_from_fixture, FixtureError, RULE_KEY};
    pub use exemplar::prelude::*;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn plain_data_is_a_plain_template() {
        let value = json!({ "a": [1, { "b": null }], "c": "x" });
        let template = template_from_fixture(&value).unwrap();
        assert_eq!(template, Template::from(value));
    }

    #[test]
    fn rule_node_carries_options() {
        let template = template_from_fixture(&json!({
            "status": {
                "$rule": { "example": "ok", "includedIn": ["ok", "degraded"], "allowNil": true }
            }
        }))
        .unwrap();
        let rule = template.get("status").and_then(Template::as_rule).unwrap();
        assert!(rule.allow_nil());
        assert_eq!(rule.included_in().unwrap(), &[json!("ok"), json!("degraded")]);
        assert_eq!(rule.example(), &Template::from("ok"));
    }

    #[test]
    fn rule_example_may_nest_rules() {
        let template = template_from_fixture(&json!({
            "tags": { "$rule": {
                "example": [{ "$rule": { "example": "a", "matches": "^[a-z]$" } }],
                "compareEach": true
            } }
        }))
        .unwrap();
        let outer = template.get("tags").and_then(Template::as_rule).unwrap();
        let Template::Sequence(items) = outer.example() else {
            panic!("expected sequence example");
        };
        assert!(items[0].is_rule());
    }

    #[test]
    fn rule_key_with_siblings_is_plain_data() {
        let value = json!({ "x": { "$rule": 1, "other": 2 } });
        assert_eq!(template_from_fixture(&value).unwrap(), Template::from(value));
    }

    #[test]
    fn missing_example_names_path() {
        let fixture = json!({ "a": [{ "b": { "$rule": { "allowNil": true } } }] });
        let err = template_from_fixture(&fixture).unwrap_err();
        assert_eq!(err.to_string(), "rule at root/a/0/b has no `example`");
    }

    #[test]
    fn rule_node_must_be_mapping() {
        let err = template_from_fixture(&json!({ "a": { "$rule": "TXL" } })).unwrap_err();
        assert!(matches!(
            err,
            FixtureError::RuleNotMapping { ref path, found: Kind::String } if path == "root/a"
        ));
    }

    #[test]
    fn invalid_options_are_reported() {
        let err = template_from_fixture(&json!({
            "a": { "$rule": { "example": "x", "matches": "(" } }
        }))
        .unwrap_err();
        match err {
            FixtureError::InvalidRule { path, source } => {
                assert_eq!(path, "root/a");
                assert!(matches!(source, ConfigError::InvalidPattern { .. }));
            }
            other => panic!("expected invalid rule, got {other:?}"),
        }
    }
}
