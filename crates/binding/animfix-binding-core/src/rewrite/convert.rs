use animfix_api_core::{BindingPath, ComponentType};

use super::{rewrite, Hooks, Operation, Plan, RewriteReport};
use crate::clip::CurveStore;
use crate::error::{BindingIssue, FixError};
use crate::registry::{ExtensionRegistry, PropertyMap};
use crate::scene::SceneGraph;

/// Rewrite every `old_type` binding at `path` as a `new_type` binding, mapping
/// property names through `properties`. Properties the map does not define
/// are skipped and reported. Converting a type to itself rewrites nothing.
pub fn remap_type<'a, C, I>(
    clips: I,
    path: &BindingPath,
    old_type: &ComponentType,
    new_type: &ComponentType,
    properties: &dyn PropertyMap,
    hooks: &mut Hooks<'_>,
) -> RewriteReport
where
    C: CurveStore + 'a,
    I: IntoIterator<Item = &'a mut C>,
{
    if old_type == new_type {
        log::warn!("refusing to convert {} bindings at '{}' to themselves", old_type, path);
    } else {
        log::info!("converting {} bindings at '{}' to {}", old_type, path, new_type);
    }
    rewrite(clips, Operation::RemapType, hooks, |binding| {
        if old_type == new_type || &binding.path != path || &binding.target_type != old_type {
            return Plan::Ignore;
        }
        match properties.map_property(&binding.property) {
            Some(property) => Plan::Rewrite(binding.with_target(new_type.clone(), property)),
            None => Plan::Skip(BindingIssue::PropertyMappingUndefined {
                property: binding.property.clone(),
                from: old_type.clone(),
                to: new_type.clone(),
            }),
        }
    })
}

/// [`remap_type`] restricted to conversions the registry knows about.
pub fn convert_type<'a, G, C, I>(
    registry: &ExtensionRegistry<G>,
    clips: I,
    path: &BindingPath,
    from: &ComponentType,
    hooks: &mut Hooks<'_>,
) -> Result<RewriteReport, FixError>
where
    G: SceneGraph,
    C: CurveStore + 'a,
    I: IntoIterator<Item = &'a mut C>,
{
    let rule = registry
        .conversion(from)
        .ok_or_else(|| FixError::ConversionNotRegistered { from: from.clone() })?;
    Ok(remap_type(
        clips,
        path,
        &rule.from,
        &rule.to,
        rule.properties.as_ref(),
        hooks,
    ))
}
