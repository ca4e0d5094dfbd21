//! Paths into a Value tree
//!
//! A [`Path`] is an ordered list of [`Segment`]s: object keys and array
//! indices. Paths are plain values (`Eq + Hash`) and compose by concatenation.
//!
//! # Path Syntax
//!
//! | Syntax | Meaning | Example |
//! |--------|---------|---------|
//! | `key` | Object key | `data` |
//! | `[n]` | Array index | `[0]` |
//! | `a.b` | Nested keys | `data.name` |
//! | `a[n]` | Key then index | `data.items[0]` |
//! | `["k"]` | Quoted key | `data["a.b"]` |
//! | (empty) | Root | `` |
//!
//! Keys that are empty or contain `.` or `[` are written quoted, with `"` and
//! `\` escaped by a backslash, so every path prints in a form that parses
//! back to itself.

use crate::error::{Error, Result};
use crate::value::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error type for path parsing
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathParseError {
    /// Empty key in path
    #[error("empty key in path at position {0}")]
    EmptyKey(usize),
    /// Unclosed bracket
    #[error("unclosed bracket starting at position {0}")]
    UnclosedBracket(usize),
    /// Invalid array index
    #[error("invalid array index at position {0}: {1}")]
    InvalidIndex(usize, String),
    /// Quoted key without its closing quote
    #[error("unclosed quoted key starting at position {0}")]
    UnclosedQuote(usize),
}

/// A segment in a path
///
/// # Examples
///
/// ```
/// use faunadb_core::Segment;
///
/// let key = Segment::Key("name".to_string());
/// let idx = Segment::Index(0);
/// assert_eq!(key.to_string(), ".name");
/// assert_eq!(idx.to_string(), "[0]");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Segment {
    /// Object key: `.foo`
    Key(String),
    /// Array index: `[0]`
    Index(usize),
}

impl Segment {
    /// Human-readable form used in aggregate failure messages
    pub fn describe(&self) -> String {
        match self {
            Segment::Key(k) => format!("key \"{}\"", k),
            Segment::Index(i) => format!("index {}", i),
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(k) if needs_quoting(k) => write!(f, "{}", quoted_key(k)),
            Segment::Key(k) => write!(f, ".{}", k),
            Segment::Index(i) => write!(f, "[{}]", i),
        }
    }
}

fn needs_quoting(key: &str) -> bool {
    key.is_empty() || key.contains(['.', '['])
}

/// `["key"]` with `"` and `\` escaped
fn quoted_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    out.push_str("[\"");
    for c in key.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push_str("\"]");
    out
}

impl From<&str> for Segment {
    fn from(key: &str) -> Self {
        Segment::Key(key.to_string())
    }
}

impl From<String> for Segment {
    fn from(key: String) -> Self {
        Segment::Key(key)
    }
}

impl From<usize> for Segment {
    fn from(index: usize) -> Self {
        Segment::Index(index)
    }
}

/// A path into a Value tree
///
/// # Examples
///
/// ```
/// use faunadb_core::Path;
///
/// let name = Path::root().key("data").key("name");
/// let parsed: Path = "data.name".parse().unwrap();
/// assert_eq!(parsed, name);
///
/// let first = Path::root().key("data").index(0);
/// assert_eq!(first.to_string(), "data[0]");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Path {
    segments: Vec<Segment>,
}

impl Path {
    /// The empty path, resolving to the value itself
    pub fn root() -> Self {
        Path {
            segments: Vec::new(),
        }
    }

    /// Create a path from segments
    pub fn from_segments(segments: Vec<Segment>) -> Self {
        Path { segments }
    }

    /// Path of object keys navigated in order
    pub fn from_keys<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        Path {
            segments: keys.into_iter().map(|k| Segment::Key(k.into())).collect(),
        }
    }

    /// Path of array indices navigated in order
    pub fn from_indexes<I>(indexes: I) -> Self
    where
        I: IntoIterator<Item = usize>,
    {
        Path {
            segments: indexes.into_iter().map(Segment::Index).collect(),
        }
    }

    /// Get the segments
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Number of segments
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Check if path has no segments
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Check if this is the root path
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Append a key segment (builder)
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.segments.push(Segment::Key(key.into()));
        self
    }

    /// Append an index segment (builder)
    pub fn index(mut self, idx: usize) -> Self {
        self.segments.push(Segment::Index(idx));
        self
    }

    /// Append a segment in place
    pub fn push(&mut self, segment: Segment) {
        self.segments.push(segment);
    }

    /// Concatenate another path after this one
    pub fn concat(&self, other: &Path) -> Path {
        let mut segments = Vec::with_capacity(self.len() + other.len());
        segments.extend_from_slice(&self.segments);
        segments.extend_from_slice(&other.segments);
        Path { segments }
    }

    /// Get parent path (None for root)
    pub fn parent(&self) -> Option<Path> {
        if self.segments.is_empty() {
            None
        } else {
            let mut parent = self.clone();
            parent.segments.pop();
            Some(parent)
        }
    }

    /// Get the last segment
    pub fn last_segment(&self) -> Option<&Segment> {
        self.segments.last()
    }

    /// Walk this path from `root`
    ///
    /// Stops at the first segment that cannot be applied. The returned error
    /// carries the path walked so far.
    pub fn resolve<'v>(&self, root: &'v Value) -> Result<&'v Value> {
        let mut current = root;
        for (depth, segment) in self.segments.iter().enumerate() {
            let walked = || Path::from_segments(self.segments[..depth].to_vec());
            current = match (segment, current) {
                (Segment::Key(key), Value::Object(fields)) => {
                    fields.get(key).ok_or_else(|| Error::KeyNotFound {
                        path: walked(),
                        key: key.clone(),
                    })?
                }
                (Segment::Index(index), Value::Array(items)) => {
                    items.get(*index).ok_or_else(|| Error::IndexNotFound {
                        path: walked(),
                        index: *index,
                    })?
                }
                (segment, other) => {
                    return Err(Error::NotAContainer {
                        path: walked(),
                        segment: segment.clone(),
                        actual: other.type_name(),
                    })
                }
            };
        }
        Ok(current)
    }

    /// Convert to a string representation
    pub fn to_path_string(&self) -> String {
        let mut result = String::new();
        for seg in &self.segments {
            match seg {
                Segment::Key(k) if needs_quoting(k) => result.push_str(&quoted_key(k)),
                Segment::Key(k) => {
                    if !result.is_empty() {
                        result.push('.');
                    }
                    result.push_str(k);
                }
                Segment::Index(i) => {
                    result.push('[');
                    result.push_str(&i.to_string());
                    result.push(']');
                }
            }
        }
        result
    }
}

impl FromStr for Path {
    type Err = PathParseError;

    /// Parse a path from a string
    ///
    /// Keys run until the next `.` or `[`; indices are decimal inside brackets
    /// and quoted keys are `["..."]`.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let chars: Vec<char> = s.chars().collect();
        let mut segments = Vec::new();
        let mut i = 0;

        while i < chars.len() {
            match chars[i] {
                '[' if chars.get(i + 1) == Some(&'"') => {
                    let start = i;
                    i += 2;
                    let mut key = String::new();
                    loop {
                        match chars.get(i) {
                            Some('"') => break,
                            Some('\\') => {
                                let escaped = chars
                                    .get(i + 1)
                                    .ok_or(PathParseError::UnclosedQuote(start))?;
                                key.push(*escaped);
                                i += 2;
                            }
                            Some(c) => {
                                key.push(*c);
                                i += 1;
                            }
                            None => return Err(PathParseError::UnclosedQuote(start)),
                        }
                    }
                    if chars.get(i + 1) != Some(&']') {
                        return Err(PathParseError::UnclosedBracket(start));
                    }
                    segments.push(Segment::Key(key));
                    i += 2;
                }
                '[' => {
                    let start = i;
                    i += 1;
                    let idx_start = i;
                    while i < chars.len() && chars[i] != ']' {
                        i += 1;
                    }
                    if i >= chars.len() {
                        return Err(PathParseError::UnclosedBracket(start));
                    }
                    let idx_str: String = chars[idx_start..i].iter().collect();
                    let idx = idx_str
                        .parse::<usize>()
                        .map_err(|_| PathParseError::InvalidIndex(idx_start, idx_str))?;
                    segments.push(Segment::Index(idx));
                    i += 1;
                }
                '.' => {
                    i += 1;
                    if i >= chars.len() || chars[i] == '.' || chars[i] == '[' {
                        return Err(PathParseError::EmptyKey(i));
                    }
                }
                _ => {
                    let key_start = i;
                    while i < chars.len() && chars[i] != '.' && chars[i] != '[' {
                        i += 1;
                    }
                    let key: String = chars[key_start..i].iter().collect();
                    segments.push(Segment::Key(key));
                }
            }
        }

        Ok(Path { segments })
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_path_string())
    }
}
