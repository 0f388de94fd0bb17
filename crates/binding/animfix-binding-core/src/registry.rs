//! Extension registry: clip sources and type conversion rules.
//!
//! Integrations contribute strategy objects rather than closures. The registry
//! is append-only for its lifetime; hosts build one at startup and tests build
//! their own.

use hashbrown::HashMap;
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use animfix_api_core::ComponentType;

use crate::config::FixerConfig;
use crate::error::{ConfigError, RegistryError};
use crate::ids::{ClipId, NodeId};
use crate::scene::{SceneGraph, SceneTree};

/// Finds the clips that animate a root.
pub trait ClipSource<G: SceneGraph> {
    fn clips(&self, graph: &G, root: G::Node) -> Vec<ClipId>;
}

/// Property name translation used by a type conversion. Returning `None`
/// marks the property as not convertible.
pub trait PropertyMap: fmt::Debug + Send + Sync {
    fn map_property(&self, property: &str) -> Option<String>;
}

/// Keeps every property name as is.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityMap;

impl PropertyMap for IdentityMap {
    fn map_property(&self, property: &str) -> Option<String> {
        Some(property.to_string())
    }
}

/// Explicit table; undefined for any property it does not list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableMap {
    entries: HashMap<String, String>,
}

impl TableMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.entries.insert(from.into(), to.into());
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PropertyMap for TableMap {
    fn map_property(&self, property: &str) -> Option<String> {
        self.entries.get(property).cloned()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TableMap {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// `from` bindings may be rewritten as `to` bindings using `properties`.
#[derive(Debug, Clone)]
pub struct ConversionRule {
    pub from: ComponentType,
    pub to: ComponentType,
    pub properties: Arc<dyn PropertyMap>,
}

impl ConversionRule {
    pub fn new(
        from: impl Into<ComponentType>,
        to: impl Into<ComponentType>,
        properties: impl PropertyMap + 'static,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            properties: Arc::new(properties),
        }
    }

    pub fn identity(from: impl Into<ComponentType>, to: impl Into<ComponentType>) -> Self {
        Self::new(from, to, IdentityMap)
    }
}

/// A named bundle contributed by an integration.
pub trait Extension<G: SceneGraph> {
    fn name(&self) -> &str;

    fn clip_source(&self) -> Option<Box<dyn ClipSource<G>>> {
        None
    }

    fn conversions(&self) -> Vec<ConversionRule> {
        Vec::new()
    }
}

/// Renderer swaps that keep every property name.
pub fn builtin_conversions() -> Vec<ConversionRule> {
    vec![
        ConversionRule::identity("SkinnedMeshRenderer", "MeshRenderer"),
        ConversionRule::identity("MeshRenderer", "SkinnedMeshRenderer"),
    ]
}

pub struct ExtensionRegistry<G: SceneGraph> {
    integrations: Vec<String>,
    clip_sources: Vec<Box<dyn ClipSource<G>>>,
    conversions: IndexMap<ComponentType, ConversionRule>,
}

impl<G: SceneGraph> ExtensionRegistry<G> {
    /// Empty registry: no clip sources, no conversions.
    pub fn new() -> Self {
        Self {
            integrations: Vec::new(),
            clip_sources: Vec::new(),
            conversions: IndexMap::new(),
        }
    }

    /// Registry seeded with [`builtin_conversions`].
    pub fn with_builtin_conversions() -> Self {
        let mut reg = Self::new();
        for rule in builtin_conversions() {
            debug_assert_ne!(rule.from, rule.to);
            reg.conversions.insert(rule.from.clone(), rule);
        }
        reg
    }

    /// Seed conversions from configuration. Clip sources are code and must be
    /// registered separately.
    pub fn from_config(config: &FixerConfig) -> Result<Self, ConfigError> {
        let mut reg = if config.builtin_conversions {
            Self::with_builtin_conversions()
        } else {
            Self::new()
        };
        for spec in &config.conversions {
            reg.add_conversion(spec.to_rule())?;
        }
        Ok(reg)
    }

    /// Register an integration: its name, its clip source and its conversions.
    pub fn register<E: Extension<G>>(&mut self, extension: E) -> Result<(), RegistryError> {
        let name = extension.name().to_string();
        let rules = extension.conversions();
        if let Some(rule) = rules.iter().find(|r| r.from == r.to) {
            return Err(RegistryError::SelfConversion {
                component: rule.from.clone(),
            });
        }
        log::debug!(
            "registering extension '{}' ({} conversion rules)",
            name,
            rules.len()
        );
        if let Some(source) = extension.clip_source() {
            self.clip_sources.push(source);
        }
        for rule in rules {
            self.add_conversion(rule)?;
        }
        self.integrations.push(name);
        Ok(())
    }

    pub fn add_clip_source(&mut self, source: Box<dyn ClipSource<G>>) {
        self.clip_sources.push(source);
    }

    /// Add a conversion rule. A later rule for the same source type replaces
    /// the earlier one; the replaced rule is returned.
    pub fn add_conversion(
        &mut self,
        rule: ConversionRule,
    ) -> Result<Option<ConversionRule>, RegistryError> {
        if rule.from == rule.to {
            return Err(RegistryError::SelfConversion {
                component: rule.from,
            });
        }
        let replaced = self.conversions.insert(rule.from.clone(), rule);
        if let Some(prev) = &replaced {
            log::warn!(
                "conversion rule for {} replaced (was -> {})",
                prev.from,
                prev.to
            );
        }
        Ok(replaced)
    }

    pub fn conversion(&self, from: &ComponentType) -> Option<&ConversionRule> {
        self.conversions.get(from)
    }

    pub fn conversions(&self) -> impl Iterator<Item = &ConversionRule> {
        self.conversions.values()
    }

    /// Names of registered integrations, in registration order.
    pub fn integrations(&self) -> &[String] {
        &self.integrations
    }

    pub fn clip_source_count(&self) -> usize {
        self.clip_sources.len()
    }

    /// Union of every clip source applied to `root`.
    pub fn collect_clips(&self, graph: &G, root: G::Node) -> IndexSet<ClipId> {
        let mut out = IndexSet::new();
        for source in &self.clip_sources {
            out.extend(source.clips(graph, root));
        }
        out
    }
}

impl<G: SceneGraph> Default for ExtensionRegistry<G> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: SceneGraph> fmt::Debug for ExtensionRegistry<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtensionRegistry")
            .field("integrations", &self.integrations)
            .field("clip_sources", &self.clip_sources.len())
            .field("conversions", &self.conversions)
            .finish()
    }
}

/// Clips attached to nodes of a [`SceneTree`]: the root only, or the root and
/// every node below it.
#[derive(Debug, Clone, Copy, Default)]
pub struct AttachedClips {
    pub recursive: bool,
}

impl ClipSource<SceneTree> for AttachedClips {
    fn clips(&self, graph: &SceneTree, root: NodeId) -> Vec<ClipId> {
        if !self.recursive {
            return graph.clips(root).to_vec();
        }
        graph
            .descendants(root)
            .into_iter()
            .flat_map(|n| graph.clips(n).iter().cloned())
            .collect()
    }
}

/// A fixed list of clips regardless of root.
#[derive(Debug, Clone, Default)]
pub struct StaticClips(pub Vec<ClipId>);

impl<G: SceneGraph> ClipSource<G> for StaticClips {
    fn clips(&self, _graph: &G, _root: G::Node) -> Vec<ClipId> {
        self.0.clone()
    }
}
