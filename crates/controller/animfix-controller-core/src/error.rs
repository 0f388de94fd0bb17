use serde::{Deserialize, Serialize};

use animfix_api_core::{Diagnostic, Severity};

use crate::controller::{ParameterKind, ParameterValue};

/// A conflict found while merging parameters.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum MergeIssue {
    /// Same name, different kind. Aborts the layer stage.
    #[error("Parameter type mismatch: {name} was {was}, now {now}")]
    ParameterTypeMismatch {
        name: String,
        was: ParameterKind,
        now: ParameterKind,
    },

    /// Same name and kind, different default. The first default is kept.
    #[error("Parameter default value mismatch: {name} was {was}, now {now}")]
    ParameterDefaultMismatch {
        name: String,
        was: ParameterValue,
        now: ParameterValue,
    },
}

impl MergeIssue {
    pub fn severity(&self) -> Severity {
        match self {
            MergeIssue::ParameterTypeMismatch { .. } => Severity::Error,
            MergeIssue::ParameterDefaultMismatch { .. } => Severity::Warning,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::new(self.severity(), self.to_string())
    }
}
