//! BindingPath parsing and formatting.
//!
//! Grammar (relative to an animated root):
//!   segment/segment/.../segment
//! - '/' separates node names
//! - the empty string addresses the root itself
//!   Examples:
//!   "Hips/Spine/Chest" -> segments=["Hips","Spine","Chest"]
//!   "Body" -> segments=["Body"]
//!   "" -> segments=[] (root)
//!
//! Node names may contain whitespace and '.', scene graphs routinely use both.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::PathError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BindingPath {
    segments: Vec<String>,
}

impl BindingPath {
    /// The path addressing the root node.
    pub fn root() -> Self {
        Self::default()
    }

    /// Construct a BindingPath from already split segments.
    pub fn from_segments<I, S>(segments: I) -> Result<Self, PathError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if let Some(index) = segments.iter().position(|s| s.is_empty()) {
            return Err(PathError::EmptySegment { index });
        }
        if let Some(index) = segments.iter().position(|s| s.contains('/')) {
            return Err(PathError::SeparatorInSegment { index });
        }
        Ok(Self { segments })
    }

    /// Parse a path string according to the grammar described above.
    pub fn parse(s: &str) -> Result<Self, PathError> {
        if s.is_empty() {
            return Ok(Self::root());
        }
        let mut segments = Vec::new();
        for (index, seg) in s.split('/').enumerate() {
            if seg.is_empty() {
                return Err(PathError::EmptySegment { index });
            }
            segments.push(seg.to_string());
        }
        Ok(Self { segments })
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of name segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Return a segment by index, or `None` if out of bounds.
    pub fn segment(&self, index: usize) -> Option<&str> {
        self.segments.get(index).map(|s| s.as_str())
    }

    /// Iterate over all segments, root first.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().map(|s| s.as_str())
    }

    /// Last segment (the addressed node's own name).
    pub fn leaf(&self) -> Option<&str> {
        self.segments.last().map(|s| s.as_str())
    }

    /// Path of the parent node; the root has no parent.
    pub fn parent(&self) -> Option<BindingPath> {
        if self.segments.is_empty() {
            return None;
        }
        Some(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// Path of a named child below this path.
    pub fn child(&self, name: impl Into<String>) -> Result<BindingPath, PathError> {
        let name = name.into();
        let index = self.segments.len();
        if name.is_empty() {
            return Err(PathError::EmptySegment { index });
        }
        if name.contains('/') {
            return Err(PathError::SeparatorInSegment { index });
        }
        let mut segments = self.segments.clone();
        segments.push(name);
        Ok(Self { segments })
    }

    /// True when `prefix` addresses this node or one of its ancestors.
    pub fn starts_with(&self, prefix: &BindingPath) -> bool {
        self.segments.starts_with(&prefix.segments)
    }
}

impl fmt::Display for BindingPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("/"))
    }
}

impl FromStr for BindingPath {
    type Err = PathError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BindingPath::parse(s)
    }
}

// Serde support: serialize as string, deserialize from string
impl Serialize for BindingPath {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for BindingPath {
    fn deserialize<D>(deserializer: D) -> Result<BindingPath, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        BindingPath::parse(&s).map_err(de::Error::custom)
    }
}
