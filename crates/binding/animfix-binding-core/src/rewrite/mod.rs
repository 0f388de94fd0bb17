//! Shared rewrite core for path remaps, type conversions and binding copies.
//!
//! Every operation walks the clips one at a time. Inside a clip, scalar
//! bindings are processed before object-reference bindings, each kind from
//! its own snapshot of the clip's bindings. For every selected binding the
//! operation plans a destination identity, asks before replacing an existing
//! destination, records the clip with the undo sink right before its first
//! change, then moves or copies the curve.

mod convert;
mod copy;
mod path;

pub use convert::{convert_type, remap_type};
pub use copy::{copy_binding, copyable_bindings};
pub use path::remap_path;

use serde::Serialize;

use animfix_api_core::UndoSink;

use crate::clip::{CurveBinding, CurveKind, CurveStore};
use crate::error::BindingIssue;
use crate::ids::ClipId;
use crate::prompt::OverwritePrompt;

/// Collaborators consulted while rewriting.
pub struct Hooks<'h> {
    pub undo: &'h mut dyn UndoSink,
    pub prompt: &'h mut dyn OverwritePrompt,
}

impl<'h> Hooks<'h> {
    pub fn new(undo: &'h mut dyn UndoSink, prompt: &'h mut dyn OverwritePrompt) -> Self {
        Self { undo, prompt }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    RemapPath,
    RemapType,
    CopyBinding,
}

impl Operation {
    /// Label handed to the undo sink.
    pub fn description(self) -> &'static str {
        match self {
            Operation::RemapPath => "Edit Binding Path",
            Operation::RemapType => "Edit Binding Type",
            Operation::CopyBinding => "Copy Binding",
        }
    }

    fn keeps_source(self) -> bool {
        matches!(self, Operation::CopyBinding)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AppliedRewrite {
    pub clip: ClipId,
    pub from: CurveBinding,
    pub to: CurveBinding,
    /// The destination existed and was replaced after confirmation.
    pub overwrote: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SkippedRewrite {
    pub clip: ClipId,
    pub binding: CurveBinding,
    pub issue: BindingIssue,
}

/// Outcome of one rewrite invocation across a clip set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RewriteReport {
    pub operation: Operation,
    pub applied: Vec<AppliedRewrite>,
    pub skipped: Vec<SkippedRewrite>,
    /// Clips that were recorded with the undo sink, in processing order.
    pub touched_clips: Vec<ClipId>,
}

impl RewriteReport {
    fn new(operation: Operation) -> Self {
        Self {
            operation,
            applied: Vec::new(),
            skipped: Vec::new(),
            touched_clips: Vec::new(),
        }
    }

    pub fn is_noop(&self) -> bool {
        self.applied.is_empty()
    }
}

/// What to do with one binding.
pub(crate) enum Plan {
    /// Not selected by this operation.
    Ignore,
    Rewrite(CurveBinding),
    Skip(BindingIssue),
}

pub(crate) fn rewrite<'a, C, I, F>(
    clips: I,
    operation: Operation,
    hooks: &mut Hooks<'_>,
    mut plan: F,
) -> RewriteReport
where
    C: CurveStore + 'a,
    I: IntoIterator<Item = &'a mut C>,
    F: FnMut(&CurveBinding) -> Plan,
{
    let mut report = RewriteReport::new(operation);
    hooks.undo.begin_group();

    for clip in clips {
        let mut recorded = false;
        for kind in CurveKind::ALL {
            for source in clip.bindings(kind) {
                let target = match plan(&source) {
                    Plan::Ignore => continue,
                    Plan::Rewrite(target) => target,
                    Plan::Skip(issue) => {
                        log::warn!("{}: skipping {} in '{}': {}", operation.description(), source, clip.id(), issue);
                        report.skipped.push(SkippedRewrite {
                            clip: clip.id().clone(),
                            binding: source,
                            issue,
                        });
                        continue;
                    }
                };
                if target == source {
                    log::debug!("{}: {} already in place", operation.description(), source);
                    continue;
                }

                let overwrote = clip.contains(&target);
                if overwrote && !hooks.prompt.confirm_overwrite(clip.id(), &target) {
                    log::warn!(
                        "{}: overwrite of {} in '{}' declined, {} left in place",
                        operation.description(),
                        target,
                        clip.id(),
                        source
                    );
                    report.skipped.push(SkippedRewrite {
                        clip: clip.id().clone(),
                        binding: source,
                        issue: BindingIssue::OverwriteDeclined { binding: target },
                    });
                    continue;
                }

                if !recorded {
                    hooks.undo.record(clip.id().as_str(), operation.description());
                    report.touched_clips.push(clip.id().clone());
                    recorded = true;
                }

                let curve = if operation.keeps_source() {
                    clip.curve(&source).cloned()
                } else {
                    clip.take_curve(&source)
                };
                // The snapshot was taken from this clip, the source is present.
                let Some(curve) = curve else { continue };
                clip.set_curve(target.clone(), curve);
                log::debug!("{}: {} -> {} in '{}'", operation.description(), source, target, clip.id());
                report.applied.push(AppliedRewrite {
                    clip: clip.id().clone(),
                    from: source,
                    to: target,
                    overwrote,
                });
            }
        }
    }

    log::info!(
        "{}: {} bindings rewritten in {} clips, {} skipped",
        operation.description(),
        report.applied.len(),
        report.touched_clips.len(),
        report.skipped.len()
    );
    report
}
