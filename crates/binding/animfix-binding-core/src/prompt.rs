//! Overwrite confirmation.
//!
//! Rewrites ask before replacing a binding that already exists at the
//! destination. The answer is synchronous; the calling operation waits for it.

use crate::clip::CurveBinding;
use crate::ids::ClipId;

pub trait OverwritePrompt {
    /// `existing` is the destination binding already present in `clip`.
    fn confirm_overwrite(&mut self, clip: &ClipId, existing: &CurveBinding) -> bool;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct AlwaysOverwrite;

impl OverwritePrompt for AlwaysOverwrite {
    fn confirm_overwrite(&mut self, _clip: &ClipId, _existing: &CurveBinding) -> bool {
        true
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NeverOverwrite;

impl OverwritePrompt for NeverOverwrite {
    fn confirm_overwrite(&mut self, _clip: &ClipId, _existing: &CurveBinding) -> bool {
        false
    }
}

impl<F> OverwritePrompt for F
where
    F: FnMut(&ClipId, &CurveBinding) -> bool,
{
    fn confirm_overwrite(&mut self, clip: &ClipId, existing: &CurveBinding) -> bool {
        self(clip, existing)
    }
}
