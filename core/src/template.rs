//! `Template` - the reference value, optionally carrying rules
//!
//! A template is decided once, at construction time, to be one of four node
//! kinds. The engine matches on that tag instead of inspecting values at
//! every step.
//!
//! # Documentation form
//!
//! [`Template::to_example_value`] replaces every rule by its example, which is
//! what a reader expects to see in documentation. The [`Serialize`] impl
//! produces the same shape.

use crate::{Kind, Rule};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// A reference value: plain data with [`Rule`] nodes at any position.
///
/// `Scalar` only ever holds `null`, a boolean, a number or a string; the
/// `From<Value>` conversion routes arrays and objects to the container
/// variants.
///
/// # Example
///
/// ```
/// use exemplar::{Kind, Rule, RuleOptions, Template};
/// use serde_json::json;
///
/// let template = Template::mapping([
///     ("name", Template::from("alice")),
///     ("nickname", Rule::new("al", RuleOptions::new().allow_nil()).unwrap().into()),
/// ]);
///
/// assert_eq!(template.kind(), Kind::Mapping);
/// assert_eq!(
///     template.to_example_value(),
///     json!({ "name": "alice", "nickname": "al" })
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Template {
    /// A declarative constraint governing this position.
    Rule(Arc<Rule>),

    /// Key-value mapping, keys in insertion order.
    ///
    /// Built directly, a repeated key behaves as in [`Template::mapping`]:
    /// the last value is the one compared.
    Mapping(Vec<(String, Template)>),

    /// Ordered sequence. Element 0 is the schema for every candidate element.
    Sequence(Vec<Template>),

    /// `null`, boolean, number or string.
    Scalar(Value),
}

impl Template {
    /// The `null` scalar.
    #[must_use]
    pub fn null() -> Self {
        Self::Scalar(Value::Null)
    }

    /// Build a mapping node.
    ///
    /// A repeated key keeps its first position and takes the last value.
    pub fn mapping<K, T>(entries: impl IntoIterator<Item = (K, T)>) -> Self
    where
        K: Into<String>,
        T: Into<Template>,
    {
        let mut out: Vec<(String, Template)> = Vec::new();
        for (key, value) in entries {
            let key = key.into();
            let value = value.into();
            match out.iter_mut().find(|(existing, _)| *existing == key) {
                Some(slot) => slot.1 = value,
                None => out.push((key, value)),
            }
        }
        Self::Mapping(out)
    }

    /// Build a sequence node.
    pub fn sequence<T: Into<Template>>(items: impl IntoIterator<Item = T>) -> Self {
        Self::Sequence(items.into_iter().map(Into::into).collect())
    }

    /// The type class this node expects.
    ///
    /// A rule reports the kind of its example.
    #[must_use]
    pub fn kind(&self) -> Kind {
        match self {
            Self::Rule(rule) => rule.example().kind(),
            Self::Mapping(_) => Kind::Mapping,
            Self::Sequence(_) => Kind::Sequence,
            Self::Scalar(value) => Kind::of(value),
        }
    }

    /// Returns `true` if this is the `Rule` variant.
    #[inline]
    #[must_use]
    pub fn is_rule(&self) -> bool {
        matches!(self, Self::Rule(_))
    }

    /// Returns the rule at this position, if any.
    #[must_use]
    pub fn as_rule(&self) -> Option<&Rule> {
        match self {
            Self::Rule(rule) => Some(rule),
            _ => None,
        }
    }

    /// Look up a key of a mapping node. A repeated key yields its last value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Template> {
        match self {
            Self::Mapping(entries) => entries
                .iter()
                .rev()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v),
            _ => None,
        }
    }

    /// Returns `true` if a candidate may omit this position entirely.
    ///
    /// Only a rule with `allow_nil` tolerates absence.
    #[must_use]
    pub(crate) fn tolerates_absence(&self) -> bool {
        matches!(self, Self::Rule(rule) if rule.allow_nil())
    }

    /// Strip every rule, leaving its example in place.
    #[must_use]
    pub fn to_example_value(&self) -> Value {
        match self {
            Self::Rule(rule) => rule.example().to_example_value(),
            Self::Mapping(entries) => Value::Object(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_example_value()))
                    .collect::<Map<String, Value>>(),
            ),
            Self::Sequence(items) => {
                Value::Array(items.iter().map(Template::to_example_value).collect())
            }
            Self::Scalar(value) => value.clone(),
        }
    }
}

impl Default for Template {
    fn default() -> Self {
        Self::Mapping(Vec::new())
    }
}

impl From<Value> for Template {
    fn from(value: Value) -> Self {
        match value {
            Value::Array(items) => Self::Sequence(items.into_iter().map(Self::from).collect()),
            Value::Object(map) => {
                Self::Mapping(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
            scalar => Self::Scalar(scalar),
        }
    }
}

impl From<&Value> for Template {
    fn from(value: &Value) -> Self {
        Self::from(value.clone())
    }
}

impl From<Rule> for Template {
    fn from(rule: Rule) -> Self {
        Self::Rule(Arc::new(rule))
    }
}

impl From<Arc<Rule>> for Template {
    fn from(rule: Arc<Rule>) -> Self {
        Self::Rule(rule)
    }
}

impl From<Vec<Template>> for Template {
    fn from(items: Vec<Template>) -> Self {
        Self::Sequence(items)
    }
}

macro_rules! scalar_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Template {
                fn from(value: $ty) -> Self {
                    Self::from(Value::from(value))
                }
            }
        )*
    };
}

scalar_from!(&str, String, bool, i32, i64, u32, u64, f64);

impl Serialize for Template {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Rule(rule) => rule.example().serialize(serializer),
            Self::Mapping(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            Self::Sequence(items) => serializer.collect_seq(items),
            Self::Scalar(value) => value.serialize(serializer),
        }
    }
}

/// Compact, JSON-like rendering. Rules print as their one-line summary.
impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rule(rule) => write!(f, "{rule}"),
            Self::Scalar(value) => write!(f, "{value}"),
            Self::Sequence(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::Mapping(entries) => {
                f.write_str("{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {value}", Value::from(key.as_str()))?;
                }
                f.write_str("}")
            }
        }
    }
}
