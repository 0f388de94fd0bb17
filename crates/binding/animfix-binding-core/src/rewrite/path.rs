use animfix_api_core::BindingPath;

use super::{rewrite, Hooks, Operation, Plan, RewriteReport};
use crate::clip::CurveStore;

/// Move every binding at `old` to `new`, keeping type and property.
pub fn remap_path<'a, C, I>(
    clips: I,
    old: &BindingPath,
    new: &BindingPath,
    hooks: &mut Hooks<'_>,
) -> RewriteReport
where
    C: CurveStore + 'a,
    I: IntoIterator<Item = &'a mut C>,
{
    log::info!("remapping binding path '{}' -> '{}'", old, new);
    rewrite(clips, Operation::RemapPath, hooks, |binding| {
        if &binding.path == old {
            Plan::Rewrite(binding.with_path(new.clone()))
        } else {
            Plan::Ignore
        }
    })
}
