//! Animfix binding core (engine-agnostic)
//!
//! Detects animation curve bindings that no longer resolve against a scene
//! graph and repairs them by rewriting binding identities inside clips: path
//! remaps, registered type conversions and binding copies. Hosts plug in their
//! scene graph, clip storage, undo stack and confirmation prompt through the
//! traits in [`scene`], [`clip`], [`animfix_api_core::history`] and [`prompt`].

pub mod clip;
pub mod config;
pub mod detect;
pub mod error;
pub mod fixer;
pub mod ids;
pub mod index;
pub mod library;
pub mod prompt;
pub mod registry;
pub mod resolve;
pub mod rewrite;
pub mod scene;

// Re-exports for hosts and adapters
pub use clip::{AnimationClip, Curve, CurveBinding, CurveKind, CurveStore, Keyframe, ObjectKeyframe, ObjectRef};
pub use config::{ConversionRuleSpec, FixerConfig};
pub use detect::{classify, conversion_candidates, detect_broken, BindingStatus, BrokenBindings, ConversionCandidate};
pub use error::{BindingIssue, ClipError, ConfigError, FixError, RegistryError};
pub use fixer::{Fixer, Scan};
pub use ids::{ClipId, NodeId};
pub use index::{collect_clips, BindingIndex};
pub use library::ClipLibrary;
pub use prompt::{AlwaysOverwrite, NeverOverwrite, OverwritePrompt};
pub use registry::{
    builtin_conversions, AttachedClips, ClipSource, ConversionRule, Extension, ExtensionRegistry,
    IdentityMap, PropertyMap, StaticClips, TableMap,
};
pub use resolve::{path_to, resolve, PathResolution, Resolution};
pub use rewrite::{
    convert_type, copy_binding, copyable_bindings, remap_path, remap_type, AppliedRewrite, Hooks,
    Operation, RewriteReport, SkippedRewrite,
};
pub use scene::{NodeSpec, SceneGraph, SceneTree};
pub use animfix_api_core::{BindingPath, ComponentType, Diagnostic, HistoryLog, NoHistory, Severity, UndoSink};
