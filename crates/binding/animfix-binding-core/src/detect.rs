//! Broken-binding detection.
//!
//! Each distinct path in the index is resolved once. A path that does not
//! fully resolve is path-broken, whatever types are bound there. A path that
//! resolves is checked per bound type; types the node does not carry are
//! type-broken.

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

use animfix_api_core::{BindingPath, ComponentType};

use crate::clip::CurveBinding;
use crate::error::BindingIssue;
use crate::index::BindingIndex;
use crate::registry::ExtensionRegistry;
use crate::resolve::resolve;
use crate::scene::SceneGraph;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BindingStatus {
    Valid,
    PathBroken,
    TypeBroken,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BrokenBindings {
    pub path_broken: IndexSet<BindingPath>,
    pub type_broken: IndexMap<BindingPath, IndexSet<ComponentType>>,
    /// Paths whose resolution went through duplicate-named siblings. These are
    /// classified like any other path but the result may not be what the
    /// author meant.
    pub ambiguous: IndexSet<BindingPath>,
}

impl BrokenBindings {
    pub fn is_clean(&self) -> bool {
        self.path_broken.is_empty() && self.type_broken.is_empty()
    }

    /// One issue per broken path and per broken (path, type).
    pub fn issues(&self) -> Vec<BindingIssue> {
        let mut out: Vec<BindingIssue> = self
            .path_broken
            .iter()
            .map(|path| BindingIssue::PathResolutionFailure { path: path.clone() })
            .collect();
        for (path, types) in &self.type_broken {
            for component in types {
                out.push(BindingIssue::MissingComponent {
                    path: path.clone(),
                    component: component.clone(),
                });
            }
        }
        out
    }
}

/// Classify a single binding.
pub fn classify<G: SceneGraph>(graph: &G, root: G::Node, binding: &CurveBinding) -> BindingStatus {
    match resolve(graph, root, &binding.path).node() {
        None => BindingStatus::PathBroken,
        Some(node) if graph.has_component(node, &binding.target_type) => BindingStatus::Valid,
        Some(_) => BindingStatus::TypeBroken,
    }
}

/// Classify every binding in `index` against the scene under `root`.
pub fn detect_broken<G: SceneGraph>(
    graph: &G,
    root: G::Node,
    index: &BindingIndex,
    warn_on_ambiguous: bool,
) -> BrokenBindings {
    let mut report = BrokenBindings::default();
    for path in index.paths() {
        let resolution = resolve(graph, root, path);
        if resolution.is_ambiguous() {
            if warn_on_ambiguous {
                log::warn!(
                    "binding path '{}' passes through duplicate-named siblings at segment(s) {:?}; using the first match",
                    path,
                    resolution.ambiguous
                );
            }
            report.ambiguous.insert(path.clone());
        }
        let Some(node) = resolution.node() else {
            log::debug!(
                "path-broken: '{}' (matched {} of {} segments)",
                path,
                resolution.matched(path),
                path.len()
            );
            report.path_broken.insert(path.clone());
            continue;
        };
        for component in index.types_at(path) {
            if !graph.has_component(node, component) {
                log::debug!("type-broken: '{}' lacks {}", path, component);
                report
                    .type_broken
                    .entry(path.clone())
                    .or_default()
                    .insert(component.clone());
            }
        }
    }
    log::info!(
        "scanned {} bindings: {} path-broken, {} type-broken paths",
        index.len(),
        report.path_broken.len(),
        report.type_broken.len()
    );
    report
}

/// A type-broken (path, type) together with the registered type it may be
/// converted to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ConversionCandidate {
    pub path: BindingPath,
    pub from: ComponentType,
    pub to: ComponentType,
}

/// Conversions the operator may be offered. Type-broken entries without a
/// registered rule are left out.
pub fn conversion_candidates<G: SceneGraph>(
    report: &BrokenBindings,
    registry: &ExtensionRegistry<G>,
) -> Vec<ConversionCandidate> {
    let mut out = Vec::new();
    for (path, types) in &report.type_broken {
        for from in types {
            if let Some(rule) = registry.conversion(from) {
                out.push(ConversionCandidate {
                    path: path.clone(),
                    from: from.clone(),
                    to: rule.to.clone(),
                });
            }
        }
    }
    out
}
