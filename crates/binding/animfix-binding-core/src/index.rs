//! Binding index: every binding used by a clip set, deduplicated and grouped
//! by path and by (path, type).

use indexmap::{IndexMap, IndexSet};

use animfix_api_core::{BindingPath, ComponentType};

use crate::clip::{CurveBinding, CurveStore};
use crate::ids::ClipId;
use crate::registry::ExtensionRegistry;
use crate::scene::SceneGraph;

/// Union of every registered clip source applied to `root`.
pub fn collect_clips<G: SceneGraph>(
    registry: &ExtensionRegistry<G>,
    graph: &G,
    root: G::Node,
) -> IndexSet<ClipId> {
    registry.collect_clips(graph, root)
}

/// Iteration order follows first appearance and is only meant for display.
#[derive(Clone, Debug, Default)]
pub struct BindingIndex {
    all: IndexSet<CurveBinding>,
    by_path: IndexMap<BindingPath, IndexMap<ComponentType, Vec<usize>>>,
}

impl BindingIndex {
    /// Index both curve kinds of every clip.
    pub fn build<'a, C, I>(clips: I) -> Self
    where
        C: CurveStore + 'a,
        I: IntoIterator<Item = &'a C>,
    {
        let mut index = Self::default();
        for clip in clips {
            for binding in clip.all_bindings() {
                index.insert(binding);
            }
        }
        index
    }

    fn insert(&mut self, binding: CurveBinding) {
        let (slot, added) = self.all.insert_full(binding);
        if !added {
            return;
        }
        let binding = &self.all[slot];
        self.by_path
            .entry(binding.path.clone())
            .or_default()
            .entry(binding.target_type.clone())
            .or_default()
            .push(slot);
    }

    pub fn len(&self) -> usize {
        self.all.len()
    }

    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }

    pub fn contains(&self, binding: &CurveBinding) -> bool {
        self.all.contains(binding)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CurveBinding> {
        self.all.iter()
    }

    /// Distinct binding paths.
    pub fn paths(&self) -> impl Iterator<Item = &BindingPath> {
        self.by_path.keys()
    }

    /// Distinct target types bound at `path`.
    pub fn types_at<'a>(&'a self, path: &BindingPath) -> impl Iterator<Item = &'a ComponentType> {
        self.by_path.get(path).into_iter().flat_map(|m| m.keys())
    }

    pub fn at_path<'a>(&'a self, path: &BindingPath) -> impl Iterator<Item = &'a CurveBinding> {
        self.by_path
            .get(path)
            .into_iter()
            .flat_map(|m| m.values())
            .flatten()
            .map(|slot| &self.all[*slot])
    }

    pub fn at_path_type<'a>(
        &'a self,
        path: &BindingPath,
        target_type: &ComponentType,
    ) -> impl Iterator<Item = &'a CurveBinding> {
        self.by_path
            .get(path)
            .and_then(|m| m.get(target_type))
            .into_iter()
            .flatten()
            .map(|slot| &self.all[*slot])
    }
}
