//! animfix-api-core: shared path, type and diagnostic vocabulary (engine-agnostic)

pub mod binding_path;
pub mod component;
pub mod diagnostic;
pub mod error;
pub mod history;

pub use binding_path::BindingPath;
pub use component::ComponentType;
pub use diagnostic::{Diagnostic, Severity};
pub use error::PathError;
pub use history::{HistoryEntry, HistoryLog, NoHistory, UndoSink};
