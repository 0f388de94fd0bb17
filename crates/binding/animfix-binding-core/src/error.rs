//! Error types for binding detection and repair.

use serde::{Deserialize, Serialize};

use animfix_api_core::{BindingPath, ComponentType};

use crate::clip::CurveBinding;
use crate::ids::ClipId;

/// Per-binding findings. These are returned inside reports so the operator can
/// act on them; none of them aborts an operation.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum BindingIssue {
    /// Path no longer resolves under the root.
    #[error("path '{path}' does not resolve under the root")]
    PathResolutionFailure { path: BindingPath },

    /// Path resolves but the node lacks the bound component.
    #[error("node at '{path}' has no {component} component")]
    MissingComponent {
        path: BindingPath,
        component: ComponentType,
    },

    /// The conversion's property map is not defined for this property.
    #[error("no property mapping for '{property}' converting {from} to {to}")]
    PropertyMappingUndefined {
        property: String,
        from: ComponentType,
        to: ComponentType,
    },

    /// The operator declined to overwrite an existing destination binding.
    #[error("overwrite of existing binding {binding} declined")]
    OverwriteDeclined { binding: CurveBinding },
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ClipError {
    #[error("clip '{clip}' binds {binding} more than once")]
    DuplicateBinding { clip: ClipId, binding: CurveBinding },

    #[error("clip '{clip}' appears more than once in the library")]
    DuplicateClip { clip: ClipId },

    #[error("clip '{clip}' not found")]
    UnknownClip { clip: ClipId },
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("conversion from {component} to itself is not allowed")]
    SelfConversion { component: ComponentType },
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum FixError {
    #[error("no conversion registered for {from}")]
    ConversionNotRegistered { from: ComponentType },

    #[error("selected node is not below the animated root")]
    NodeNotUnderRoot,

    /// The selected node shares its name with an earlier sibling, so its path
    /// addresses a different node.
    #[error("path '{path}' to the selected node resolves to a different node")]
    AmbiguousTarget { path: BindingPath },

    #[error(transparent)]
    Clip(#[from] ClipError),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("config parse error: {reason}")]
    Parse { reason: String },

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse {
            reason: e.to_string(),
        }
    }
}
