//! Host-facing facade: one scan, then operator-driven fixes over the scanned
//! clip set.

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

use animfix_api_core::{BindingPath, ComponentType, Diagnostic};

use crate::clip::CurveBinding;
use crate::config::FixerConfig;
use crate::detect::{conversion_candidates, detect_broken, BrokenBindings, ConversionCandidate};
use crate::error::{ConfigError, FixError};
use crate::ids::ClipId;
use crate::index::BindingIndex;
use crate::library::ClipLibrary;
use crate::registry::ExtensionRegistry;
use crate::resolve::{path_to, resolve};
use crate::rewrite::{self, Hooks, RewriteReport};
use crate::scene::SceneGraph;

const LOG_TARGET: &str = "animfix::fixer";

/// Result of [`Fixer::scan`].
#[derive(Clone, Debug, Serialize)]
pub struct Scan {
    /// Clips animating the root, as reported by the registered clip sources.
    pub clips: IndexSet<ClipId>,
    #[serde(skip)]
    pub index: BindingIndex,
    pub broken: BrokenBindings,
    pub candidates: Vec<ConversionCandidate>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Scan {
    /// No broken bindings were found.
    pub fn is_clean(&self) -> bool {
        self.broken.is_clean()
    }
}

pub struct Fixer<G: SceneGraph> {
    registry: ExtensionRegistry<G>,
    config: FixerConfig,
}

impl<G: SceneGraph> Fixer<G> {
    /// Build the registry from `config`. Clip sources still have to be added
    /// through [`registry_mut`](Self::registry_mut).
    pub fn new(config: FixerConfig) -> Result<Self, ConfigError> {
        let registry = ExtensionRegistry::from_config(&config)?;
        Ok(Self { registry, config })
    }

    pub fn with_registry(registry: ExtensionRegistry<G>, config: FixerConfig) -> Self {
        Self { registry, config }
    }

    pub fn registry(&self) -> &ExtensionRegistry<G> {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ExtensionRegistry<G> {
        &mut self.registry
    }

    pub fn config(&self) -> &FixerConfig {
        &self.config
    }

    /// Collect the clips animating `root`, index their bindings and classify
    /// every binding against the scene.
    pub fn scan(&self, graph: &G, root: G::Node, library: &ClipLibrary) -> Scan {
        let clips = self.registry.collect_clips(graph, root);
        let mut diagnostics = Vec::new();

        if clips.is_empty() {
            diagnostics.push(Diagnostic::warning("no animations found on root"));
        }
        for id in clips.iter().filter(|id| library.get(id).is_none()) {
            diagnostics.push(Diagnostic::warning(format!(
                "clip '{}' is referenced by the root but missing from the library",
                id
            )));
        }

        let index = BindingIndex::build(library.select(&clips));
        let broken = detect_broken(graph, root, &index, self.config.warn_on_ambiguous_paths);
        let candidates = conversion_candidates(&broken, &self.registry);

        if !clips.is_empty() && broken.is_clean() {
            diagnostics.push(Diagnostic::info("no broken bindings"));
        }
        for diagnostic in &diagnostics {
            diagnostic.log(LOG_TARGET);
        }

        Scan {
            clips,
            index,
            broken,
            candidates,
            diagnostics,
        }
    }

    /// Move every binding at `old` to `new` across `clips`.
    pub fn fix_path(
        &self,
        library: &mut ClipLibrary,
        clips: &IndexSet<ClipId>,
        old: &BindingPath,
        new: &BindingPath,
        hooks: &mut Hooks<'_>,
    ) -> Result<RewriteReport, FixError> {
        library.check(clips)?;
        Ok(rewrite::remap_path(library.select_mut(clips), old, new, hooks))
    }

    /// Like [`fix_path`](Self::fix_path), with the new path computed from the
    /// node the operator picked. Fails with [`FixError::AmbiguousTarget`] when
    /// duplicate sibling names make that path address another node.
    #[allow(clippy::too_many_arguments)]
    pub fn fix_path_to_node(
        &self,
        graph: &G,
        root: G::Node,
        node: G::Node,
        library: &mut ClipLibrary,
        clips: &IndexSet<ClipId>,
        old: &BindingPath,
        hooks: &mut Hooks<'_>,
    ) -> Result<RewriteReport, FixError> {
        let new = path_to(graph, root, node).ok_or(FixError::NodeNotUnderRoot)?;
        let resolution = resolve(graph, root, &new);
        if resolution.node() != Some(node) {
            log::warn!(target: LOG_TARGET, "path '{}' to the selected node resolves elsewhere", new);
            return Err(FixError::AmbiguousTarget { path: new });
        }
        if resolution.is_ambiguous() {
            log::warn!(
                target: LOG_TARGET,
                "path '{}' crosses duplicate sibling names at segments {:?}",
                new,
                resolution.ambiguous
            );
        }
        self.fix_path(library, clips, old, &new, hooks)
    }

    /// Convert `from` bindings at `path` with the registered rule for `from`.
    pub fn fix_type(
        &self,
        library: &mut ClipLibrary,
        clips: &IndexSet<ClipId>,
        path: &BindingPath,
        from: &ComponentType,
        hooks: &mut Hooks<'_>,
    ) -> Result<RewriteReport, FixError> {
        library.check(clips)?;
        rewrite::convert_type(&self.registry, library.select_mut(clips), path, from, hooks)
    }

    /// Duplicate `source` to `new_path` across `clips`.
    pub fn copy(
        &self,
        library: &mut ClipLibrary,
        clips: &IndexSet<ClipId>,
        source: &CurveBinding,
        new_path: &BindingPath,
        hooks: &mut Hooks<'_>,
    ) -> Result<RewriteReport, FixError> {
        library.check(clips)?;
        Ok(rewrite::copy_binding(
            library.select_mut(clips),
            source,
            new_path,
            hooks,
        ))
    }

    pub fn copyable(
        &self,
        library: &ClipLibrary,
        clips: &IndexSet<ClipId>,
        src: &BindingPath,
        dst: &BindingPath,
    ) -> Result<IndexMap<ClipId, IndexSet<CurveBinding>>, FixError> {
        library.check(clips)?;
        Ok(rewrite::copyable_bindings(library.select(clips), src, dst))
    }
}

impl<G: SceneGraph> std::fmt::Debug for Fixer<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fixer")
            .field("registry", &self.registry)
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clip::{AnimationClip, Curve, CurveStore};
    use crate::prompt::NeverOverwrite;
    use crate::registry::AttachedClips;
    use crate::scene::SceneTree;
    use animfix_api_core::{HistoryLog, Severity};

    fn p(s: &str) -> BindingPath {
        BindingPath::parse(s).unwrap()
    }

    fn fixer() -> Fixer<SceneTree> {
        let mut fixer = Fixer::new(FixerConfig::default()).unwrap();
        fixer
            .registry_mut()
            .add_clip_source(Box::new(AttachedClips { recursive: false }));
        fixer
    }

    #[test]
    fn empty_root_warns() {
        let tree = SceneTree::new("Avatar");
        let scan = fixer().scan(&tree, tree.root(), &ClipLibrary::new());
        assert!(scan.clips.is_empty());
        assert!(scan.is_clean());
        assert_eq!(scan.diagnostics[0].severity, Severity::Warning);
        assert_eq!(scan.diagnostics[0].message, "no animations found on root");
    }

    #[test]
    fn missing_library_clip_is_reported() {
        let mut tree = SceneTree::new("Avatar");
        tree.attach_clip(tree.root(), "Ghost");
        let scan = fixer().scan(&tree, tree.root(), &ClipLibrary::new());
        assert!(scan.diagnostics.iter().any(|d| d.message.contains("Ghost")));
    }

    #[test]
    fn scan_then_fix_path_to_node() {
        let mut tree = SceneTree::new("Avatar");
        let hips = tree.add_child(tree.root(), "Hips");
        let chest = tree.add_child(hips, "Chest");
        tree.add_component(chest, "Renderer");
        tree.attach_clip(tree.root(), "C1");
        let mut library: ClipLibrary = [AnimationClip::new("C1").with_curve(
            CurveBinding::new(p("Hips/Spine"), "Renderer", "color"),
            Curve::scalar([(0.0, 1.0)]),
        )]
        .into_iter()
        .collect();

        let fixer = fixer();
        let scan = fixer.scan(&tree, tree.root(), &library);
        assert!(scan.broken.path_broken.contains(&p("Hips/Spine")));

        let mut undo = HistoryLog::new();
        let mut prompt = NeverOverwrite;
        let report = fixer
            .fix_path_to_node(
                &tree,
                tree.root(),
                chest,
                &mut library,
                &scan.clips,
                &p("Hips/Spine"),
                &mut Hooks::new(&mut undo, &mut prompt),
            )
            .unwrap();
        assert_eq!(report.applied.len(), 1);
        assert!(fixer.scan(&tree, tree.root(), &library).is_clean());

        let mut orphan_tree = tree.clone();
        let orphan = orphan_tree.add_child(tree.root(), "Orphan");
        orphan_tree.detach(orphan);
        let err = fixer
            .fix_path_to_node(
                &orphan_tree,
                orphan_tree.root(),
                orphan,
                &mut library,
                &scan.clips,
                &p("Hips/Chest"),
                &mut Hooks::new(&mut undo, &mut prompt),
            )
            .unwrap_err();
        assert_eq!(err, FixError::NodeNotUnderRoot);
    }

    #[test]
    fn fix_path_to_node_rejects_shadowed_sibling() {
        let mut tree = SceneTree::new("Avatar");
        let first = tree.add_child(tree.root(), "Arm");
        let second = tree.add_child(tree.root(), "Arm");
        tree.add_component(second, "Renderer");
        tree.attach_clip(tree.root(), "C1");
        let old = CurveBinding::new(p("OldArm"), "Renderer", "color");
        let mut library: ClipLibrary = [AnimationClip::new("C1")
            .with_curve(old.clone(), Curve::scalar([(0.0, 1.0)]))]
        .into_iter()
        .collect();

        let fixer = fixer();
        let scan = fixer.scan(&tree, tree.root(), &library);
        let mut undo = HistoryLog::new();
        let mut prompt = NeverOverwrite;
        let err = fixer
            .fix_path_to_node(
                &tree,
                tree.root(),
                second,
                &mut library,
                &scan.clips,
                &p("OldArm"),
                &mut Hooks::new(&mut undo, &mut prompt),
            )
            .unwrap_err();
        assert_eq!(err, FixError::AmbiguousTarget { path: p("Arm") });
        assert!(library.get(&ClipId::from("C1")).unwrap().contains(&old));
        assert!(undo.entries().is_empty());

        // The first sibling is what the path addresses, so picking it works.
        tree.add_component(first, "Renderer");
        let report = fixer
            .fix_path_to_node(
                &tree,
                tree.root(),
                first,
                &mut library,
                &scan.clips,
                &p("OldArm"),
                &mut Hooks::new(&mut undo, &mut prompt),
            )
            .unwrap();
        assert_eq!(report.applied.len(), 1);
        assert!(fixer.scan(&tree, tree.root(), &library).broken.type_broken.is_empty());
    }

    #[test]
    fn unknown_clip_ids_are_rejected() {
        let fixer = fixer();
        let mut library = ClipLibrary::new();
        let ids: IndexSet<ClipId> = [ClipId::from("Nope")].into();
        let mut undo = HistoryLog::new();
        let mut prompt = NeverOverwrite;
        let err = fixer
            .fix_type(
                &mut library,
                &ids,
                &p("Body"),
                &ComponentType::from("SkinnedMeshRenderer"),
                &mut Hooks::new(&mut undo, &mut prompt),
            )
            .unwrap_err();
        assert!(matches!(err, FixError::Clip(_)));
        assert_eq!(undo.groups(), 0);
    }

    #[test]
    fn copy_through_facade_keeps_source() {
        let fixer = fixer();
        let src = CurveBinding::new(p("L"), "Transform", "x");
        let mut library: ClipLibrary = [AnimationClip::new("C1")
            .with_curve(src.clone(), Curve::scalar([(0.0, 2.0)]))]
        .into_iter()
        .collect();
        let ids: IndexSet<ClipId> = [ClipId::from("C1")].into();
        assert_eq!(fixer.copyable(&library, &ids, &p("L"), &p("R")).unwrap().len(), 1);

        let mut undo = HistoryLog::new();
        let mut prompt = NeverOverwrite;
        fixer
            .copy(&mut library, &ids, &src, &p("R"), &mut Hooks::new(&mut undo, &mut prompt))
            .unwrap();
        let clip = library.get(&ClipId::from("C1")).unwrap();
        assert!(clip.contains(&src));
        assert!(clip.contains(&src.with_path(p("R"))));
        assert!(fixer.copyable(&library, &ids, &p("L"), &p("R")).unwrap().is_empty());
    }
}
