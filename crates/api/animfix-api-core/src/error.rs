//! Error types shared by the animfix crates.

/// Malformed binding path.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("binding path has an empty segment at index {index}")]
    EmptySegment { index: usize },

    #[error("binding path segment {index} contains '/'")]
    SeparatorInSegment { index: usize },
}
