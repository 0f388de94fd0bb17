use indexmap::{IndexMap, IndexSet};

use animfix_api_core::BindingPath;

use super::{rewrite, Hooks, Operation, Plan, RewriteReport};
use crate::clip::{CurveBinding, CurveStore};
use crate::ids::ClipId;

/// Duplicate `source` to `new_path` in every clip that has it. The source
/// curve stays where it is.
pub fn copy_binding<'a, C, I>(
    clips: I,
    source: &CurveBinding,
    new_path: &BindingPath,
    hooks: &mut Hooks<'_>,
) -> RewriteReport
where
    C: CurveStore + 'a,
    I: IntoIterator<Item = &'a mut C>,
{
    log::info!("copying {} to '{}'", source, new_path);
    rewrite(clips, Operation::CopyBinding, hooks, |binding| {
        if binding == source {
            Plan::Rewrite(binding.with_path(new_path.clone()))
        } else {
            Plan::Ignore
        }
    })
}

/// Per clip, the bindings at `src` whose type and property are not yet bound
/// at `dst`. Clips with nothing to copy are left out.
pub fn copyable_bindings<'a, C, I>(
    clips: I,
    src: &BindingPath,
    dst: &BindingPath,
) -> IndexMap<ClipId, IndexSet<CurveBinding>>
where
    C: CurveStore + 'a,
    I: IntoIterator<Item = &'a C>,
{
    let mut out = IndexMap::new();
    for clip in clips {
        let candidates: IndexSet<CurveBinding> = clip
            .all_bindings()
            .into_iter()
            .filter(|b| &b.path == src)
            .filter(|b| !clip.contains(&b.with_path(dst.clone())))
            .collect();
        if !candidates.is_empty() {
            out.insert(clip.id().clone(), candidates);
        }
    }
    out
}
