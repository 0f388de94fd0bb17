//! animfix-controller-core
//!
//! Controllers made of named parameters and a layer stack, and the merger
//! that combines several of them into one.

pub mod controller;
pub mod error;
pub mod merge;

pub use controller::{Controller, Layer, ParameterKind, ParameterValue};
pub use error::MergeIssue;
pub use merge::{ControllerMerger, MergeOutcome};
