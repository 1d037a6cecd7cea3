//! `Path` - where in the candidate a comparison is happening
//!
//! Built up and torn down as the engine descends; cloned into a
//! [`Mismatch`](crate::Mismatch) only when something fails.

use std::fmt;

/// Literal marker rendered as the first path segment.
pub const ROOT_SEGMENT: &str = "root";

/// Separator between rendered segments.
pub const SEPARATOR: &str = "/";

/// One step into a container.
///
/// A key containing control characters renders escaped (`a\nb`), so a
/// rendered path never spans lines.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// A mapping key.
    Key(String),
    /// A sequence index.
    Index(usize),
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => write!(f, "{}", Escaped(key)),
            Self::Index(index) => write!(f, "{index}"),
        }
    }
}

impl From<&str> for Segment {
    fn from(key: &str) -> Self {
        Self::Key(key.to_string())
    }
}

impl From<String> for Segment {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

impl From<usize> for Segment {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

/// An ordered chain of segments below the root.
///
/// # Example
///
/// ```
/// use exemplar::{Path, Segment};
///
/// let mut path = Path::root();
/// path.push(Segment::from("flights"));
/// path.push(Segment::from(1));
/// path.push(Segment::from("code"));
///
/// assert_eq!(path.to_string(), "root/flights/1/code");
/// assert_eq!(path.to_segments(), ["root", "flights", "1", "code"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path {
    segments: Vec<Segment>,
}

impl Path {
    /// The empty path (just the root marker).
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Returns `true` if no segment has been pushed.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of segments below the root.
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Same as [`is_root`](Self::is_root).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Descend one step.
    pub fn push(&mut self, segment: Segment) {
        self.segments.push(segment);
    }

    /// Step back up.
    pub fn pop(&mut self) -> Option<Segment> {
        self.segments.pop()
    }

    /// The segments below the root.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// All segments as strings, root marker first.
    #[must_use]
    pub fn to_segments(&self) -> Vec<String> {
        std::iter::once(ROOT_SEGMENT.to_string())
            .chain(self.segments.iter().map(ToString::to_string))
            .collect()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(ROOT_SEGMENT)?;
        for segment in &self.segments {
            write!(f, "{SEPARATOR}{segment}")?;
        }
        Ok(())
    }
}

impl FromIterator<Segment> for Path {
    fn from_iter<I: IntoIterator<Item = Segment>>(iter: I) -> Self {
        Self {
            segments: iter.into_iter().collect(),
        }
    }
}

/// Text that renders on one line: control characters are written as
/// escapes, anything else verbatim.
pub(crate) struct Escaped<'a>(pub(crate) &'a str);

impl fmt::Display for Escaped<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.0.chars().any(char::is_control) {
            return f.write_str(self.0);
        }
        for c in self.0.chars() {
            if c.is_control() {
                write!(f, "{}", c.escape_debug())?;
            } else {
                write!(f, "{c}")?;
            }
        }
        Ok(())
    }
}
