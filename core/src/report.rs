//! Failure rendering.
//!
//! A [`Failure`] is the structured outcome of a comparison that did not
//! succeed. It renders in one of two [`Format`]s:
//!
//! - [`Format::Full`] - header line plus labelled `expected:` / `actual:` blocks
//! - [`Format::Mini`] - exactly one line per mismatch
//!
//! # Example
//!
//! ```
//! use exemplar::{CompareOptions, Format, Template};
//! use serde_json::json;
//!
//! let template = Template::from(json!({ "n": 1 }));
//! let failure = template.diff(&json!({ "n": 2 }), CompareOptions::new()).unwrap_err();
//!
//! assert_eq!(failure.render(Format::Mini), "root/n: values differ");
//! assert!(failure.render(Format::Full).lines().count() > 1);
//! ```

use crate::Mismatch;
use std::fmt::{self, Write};

/// Rendering verbosity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Format {
    /// Path and reason, then the expected node and actual value.
    #[default]
    Full,
    /// Path and reason only, one line.
    Mini,
}

/// One or more mismatches from a single comparison.
///
/// Never empty. In [`Mode::First`](crate::Mode::First) it holds exactly one
/// mismatch.
#[derive(Debug, Clone)]
pub struct Failure {
    first: Mismatch,
    rest: Vec<Mismatch>,
    format: Format,
}

impl Failure {
    /// `None` when there is nothing to report.
    pub(crate) fn new(mismatches: Vec<Mismatch>, format: Format) -> Option<Self> {
        let mut mismatches = mismatches.into_iter();
        let first = mismatches.next()?;
        Some(Self {
            first,
            rest: mismatches.collect(),
            format,
        })
    }

    /// The first mismatch in traversal order.
    #[must_use]
    pub fn first(&self) -> &Mismatch {
        &self.first
    }

    /// Consume into the first mismatch.
    #[must_use]
    pub fn into_first(self) -> Mismatch {
        self.first
    }

    /// All mismatches in traversal order.
    pub fn iter(&self) -> impl Iterator<Item = &Mismatch> {
        std::iter::once(&self.first).chain(&self.rest)
    }

    /// Number of mismatches (at least one).
    #[must_use]
    pub fn len(&self) -> usize {
        1 + self.rest.len()
    }

    /// Always `false`; present for API symmetry with [`len`](Self::len).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The format [`Display`](fmt::Display) uses.
    #[must_use]
    pub fn format(&self) -> Format {
        self.format
    }

    /// Render in the given format, regardless of the stored one.
    #[must_use]
    pub fn render(&self, format: Format) -> String {
        let mut out = String::new();
        for (i, mismatch) in self.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            // Writing to a String cannot fail.
            let _ = match format {
                Format::Mini => write!(out, "{mismatch}"),
                Format::Full => write_full(&mut out, mismatch),
            };
        }
        out
    }
}

fn write_full(out: &mut String, mismatch: &Mismatch) -> fmt::Result {
    writeln!(out, "mismatch at {}: {}", mismatch.path(), mismatch.reason())?;
    writeln!(out, "  expected:")?;
    write_block(out, &mismatch.expected().to_string())?;
    writeln!(out, "  actual:")?;
    let actual = serde_json::to_string_pretty(mismatch.actual())
        .unwrap_or_else(|_| mismatch.actual().to_string());
    write_block(out, &actual)
}

fn write_block(out: &mut String, text: &str) -> fmt::Result {
    for line in text.lines() {
        writeln!(out, "    {line}")?;
    }
    Ok(())
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.render(self.format).trim_end())
    }
}

impl std::error::Error for Failure {}
