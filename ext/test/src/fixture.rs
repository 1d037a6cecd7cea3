//! Conformance test fixture runner
//!
//! Loads YAML fixtures and runs them against the exemplar engine.
//!
//! ```yaml
//! name: airport codes
//! description: pattern rule inside a sequence schema
//! template:
//!   flights:
//!     - code:
//!         $rule: { example: TXL, matches: "^[A-Z]{3}$" }
//! cases:
//!   - name: second flight is lowercase
//!     candidate: { flights: [{ code: SXF }, { code: xxx }] }
//!     format: mini
//!     expect:
//!       mismatch:
//!         - { path: root/flights/1/code, reason: pattern_mismatch }
//!     rendered: "root/flights/1/code: does not match /^[A-Z]{3}$/"
//! ```

use crate::{template_from_fixture, FixtureError};
use exemplar::{compare, CompareOptions, Error, Format, Mode, Template};
use serde::Deserialize;
use serde_json::Value;

/// A complete test fixture
#[derive(Debug, Deserialize)]
pub struct Fixture {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Template in fixture encoding (see [`RULE_KEY`](crate::RULE_KEY)).
    pub template: Value,
    pub cases: Vec<TestCase>,
}

/// Test case
#[derive(Debug, Deserialize)]
pub struct TestCase {
    pub name: String,
    pub candidate: Value,
    #[serde(default)]
    pub mode: ModeConfig,
    #[serde(default)]
    pub format: FormatConfig,
    #[serde(with = "serde_yaml::with::singleton_map")]
    pub expect: Expect,
    /// Exact rendered failure text, if the case pins it.
    #[serde(default)]
    pub rendered: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModeConfig {
    #[default]
    First,
    All,
}

impl From<ModeConfig> for Mode {
    fn from(mode: ModeConfig) -> Self {
        match mode {
            ModeConfig::First => Mode::First,
            ModeConfig::All => Mode::All,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatConfig {
    #[default]
    Full,
    Mini,
}

impl From<FormatConfig> for Format {
    fn from(format: FormatConfig) -> Self {
        match format {
            FormatConfig::Full => Format::Full,
            FormatConfig::Mini => Format::Mini,
        }
    }
}

/// Expected outcome of a case.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expect {
    /// The candidate conforms.
    Pass,
    /// The candidate fails with exactly these mismatches, in order.
    Mismatch(Vec<ExpectedMismatch>),
    /// The template is rejected; the message contains this text.
    ConfigError(String),
}

/// One expected mismatch: rendered path and reason tag.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExpectedMismatch {
    pub path: String,
    pub reason: String,
}

// ═══════════════════════════════════════════════════════════════════════════════
// Runner
// ═══════════════════════════════════════════════════════════════════════════════

/// What a case actually produced, in the shape of [`Expect`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Pass,
    Mismatch {
        mismatches: Vec<ExpectedMismatch>,
        rendered: String,
    },
    ConfigError(String),
}

/// Result of running a single test case
#[derive(Debug)]
pub struct CaseResult {
    pub case_name: String,
    pub passed: bool,
    pub expected: Expect,
    pub actual: Outcome,
}

impl TestCase {
    fn options(&self) -> CompareOptions {
        CompareOptions::new()
            .mode(self.mode.into())
            .format(self.format.into())
    }

    fn accepts(&self, outcome: &Outcome) -> bool {
        match (&self.expect, outcome) {
            (Expect::Pass, Outcome::Pass) => true,
            (Expect::Mismatch(expected), Outcome::Mismatch { mismatches, rendered }) => {
                expected == mismatches
                    && self.rendered.as_ref().map_or(true, |text| text == rendered)
            }
            (Expect::ConfigError(needle), Outcome::ConfigError(message)) => {
                message.contains(needle.as_str())
            }
            _ => false,
        }
    }
}

fn run_case(template: &Result<Template, FixtureError>, case: &TestCase) -> Outcome {
    let template = match template {
        Ok(template) => template,
        Err(err) => return Outcome::ConfigError(err.to_string()),
    };
    match compare(template, &case.candidate, case.options()) {
        Ok(()) => Outcome::Pass,
        Err(Error::Mismatch(failure)) => Outcome::Mismatch {
            mismatches: failure
                .iter()
                .map(|m| ExpectedMismatch {
                    path: m.path().to_string(),
                    reason: m.reason().tag().to_string(),
                })
                .collect(),
            rendered: failure.to_string(),
        },
        Err(Error::Config(err)) => Outcome::ConfigError(err.to_string()),
    }
}

impl Fixture {
    /// Parse a fixture from YAML
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::Yaml`] if the document does not fit the schema.
    pub fn from_yaml(yaml: &str) -> Result<Self, FixtureError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Parse multiple fixtures from a YAML file with `---` separators
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::Yaml`] for the first document that does not
    /// fit the schema.
    pub fn from_yaml_multi(yaml: &str) -> Result<Vec<Self>, FixtureError> {
        let mut fixtures = Vec::new();
        for doc in serde_yaml::Deserializer::from_str(yaml) {
            fixtures.push(Self::deserialize(doc)?);
        }
        Ok(fixtures)
    }

    /// Run all test cases and return results
    ///
    /// A template that fails to build is a [`Outcome::ConfigError`] for every
    /// case, so fixtures can assert on construction errors.
    pub fn run(&self) -> Vec<CaseResult> {
        let template = template_from_fixture(&self.template);
        if let Err(err) = &template {
            tracing::debug!(fixture = %self.name, error = %err, "template rejected");
        }
        self.cases
            .iter()
            .map(|case| {
                let actual = run_case(&template, case);
                let passed = case.accepts(&actual);
                tracing::debug!(fixture = %self.name, case = %case.name, passed, "ran case");
                CaseResult {
                    case_name: case.name.clone(),
                    passed,
                    expected: case.expect.clone(),
                    actual,
                }
            })
            .collect()
    }

    /// Run all test cases and panic on first failure
    pub fn run_and_assert(&self) {
        let results = self.run();
        for result in results {
            assert!(
                result.passed,
                "Fixture '{}' case '{}' failed: expected {:?}, got {:?}",
                self.name, result.case_name, result.expected, result.actual
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const YAML: &str = r#"
name: nullable gate
template:
  gate:
    $rule: { example: A1, allowNil: true }
  lat: 52.5
cases:
  - name: null gate
    candidate: { gate: null, lat: 52.5 }
    expect: pass
  - name: absent gate
    candidate: { lat: 52.5 }
    expect: pass
  - name: string latitude
    candidate: { gate: B2, lat: "52.5" }
    format: mini
    expect:
      mismatch:
        - { path: root/lat, reason: type_mismatch }
    rendered: "root/lat: expected number, got string"
---
name: bad pattern
template:
  code:
    $rule: { example: TXL, matches: "(" }
cases:
  - name: rejected
    candidate: { code: TXL }
    expect:
      config_error: "invalid rule at root/code"
"#;

    #[test]
    fn parses_multi_document_file() {
        let fixtures = Fixture::from_yaml_multi(YAML).unwrap();
        assert_eq!(fixtures.len(), 2);
        assert_eq!(fixtures[0].cases.len(), 3);
        assert_eq!(fixtures[0].cases[0].expect, Expect::Pass);
        assert!(matches!(fixtures[0].cases[2].format, FormatConfig::Mini));
    }

    #[test]
    fn runs_cases() {
        for fixture in Fixture::from_yaml_multi(YAML).unwrap() {
            fixture.run_and_assert();
        }
    }

    #[test]
    fn reports_wrong_expectation() {
        let fixture = Fixture::from_yaml(
            r"
name: wrong
template: { a: 1 }
cases:
  - name: expects pass
    candidate: { a: 2 }
    expect: pass
",
        )
        .unwrap();
        let results = fixture.run();
        assert!(!results[0].passed);
        assert!(matches!(results[0].actual, Outcome::Mismatch { .. }));
    }

    #[test]
    fn rendered_text_must_match_when_pinned() {
        let fixture = Fixture::from_yaml(
            r"
name: pinned
template: { a: 1 }
cases:
  - name: wrong text
    candidate: { a: 2 }
    format: mini
    expect:
      mismatch:
        - { path: root/a, reason: value_mismatch }
    rendered: 'root/a: something else'
",
        )
        .unwrap();
        assert!(!fixture.run()[0].passed);
    }

    #[test]
    fn schema_errors_surface_as_yaml_errors() {
        let err = Fixture::from_yaml("name: x\ncases: []\n").unwrap_err();
        assert!(matches!(err, FixtureError::Yaml(_)));
    }
}
