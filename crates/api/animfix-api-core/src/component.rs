//! Stable component type identity.
//!
//! Hosts issue one `ComponentType` per component kind they expose (usually the
//! type's name, e.g. "SkinnedMeshRenderer"). The registry and the detector only
//! ever compare these by value.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentType(String);

impl ComponentType {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ComponentType {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ComponentType {
    fn from(name: String) -> Self {
        Self(name)
    }
}
