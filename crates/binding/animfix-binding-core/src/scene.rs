//! Scene graph provider trait and an in-memory tree.
//!
//! The core never owns the host's scene graph; it walks it through
//! [`SceneGraph`]. Adapters implement the trait over their node model and pass
//! a root handle into the resolver and detector.

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;

use animfix_api_core::ComponentType;

use crate::ids::{ClipId, NodeId};

/// Read-only view of a hierarchical scene graph.
pub trait SceneGraph {
    type Node: Copy + Eq + Hash + fmt::Debug;

    /// Named children of `node`, in child order.
    fn children(&self, node: Self::Node) -> Vec<(&str, Self::Node)>;

    /// Component types carried by `node`.
    fn components(&self, node: Self::Node) -> HashSet<ComponentType>;

    fn has_component(&self, node: Self::Node, component: &ComponentType) -> bool {
        self.components(node).contains(component)
    }
}

#[derive(Clone, Debug)]
struct SceneNode {
    name: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    components: Vec<ComponentType>,
    clips: Vec<ClipId>,
}

impl SceneNode {
    fn new(name: String, parent: Option<NodeId>) -> Self {
        Self {
            name,
            parent,
            children: Vec::new(),
            components: Vec::new(),
            clips: Vec::new(),
        }
    }
}

/// Arena-backed scene tree. The root is always `NodeId(0)`.
///
/// Besides names and components a node may reference animation clips, the way
/// an animator component references the clips of its controller.
#[derive(Clone, Debug)]
pub struct SceneTree {
    nodes: Vec<SceneNode>,
}

impl SceneTree {
    pub fn new(root_name: impl Into<String>) -> Self {
        Self {
            nodes: vec![SceneNode::new(root_name.into(), None)],
        }
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Append a child under `parent`. Duplicate sibling names are accepted,
    /// resolution reports them as ambiguous.
    pub fn add_child(&mut self, parent: NodeId, name: impl Into<String>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(SceneNode::new(name.into(), Some(parent)));
        self.nodes[parent.index()].children.push(id);
        id
    }

    pub fn add_component(&mut self, node: NodeId, component: impl Into<ComponentType>) {
        let component = component.into();
        let comps = &mut self.nodes[node.index()].components;
        if !comps.contains(&component) {
            comps.push(component);
        }
    }

    /// Returns true when the component was present.
    pub fn remove_component(&mut self, node: NodeId, component: &ComponentType) -> bool {
        let comps = &mut self.nodes[node.index()].components;
        let before = comps.len();
        comps.retain(|c| c != component);
        comps.len() != before
    }

    pub fn attach_clip(&mut self, node: NodeId, clip: impl Into<ClipId>) {
        let clip = clip.into();
        let clips = &mut self.nodes[node.index()].clips;
        if !clips.contains(&clip) {
            clips.push(clip);
        }
    }

    pub fn rename(&mut self, node: NodeId, name: impl Into<String>) {
        self.nodes[node.index()].name = name.into();
    }

    /// Unlink `node` from its parent. The subtree stays in the arena but is no
    /// longer reachable from the root.
    pub fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node.index()].parent.take() {
            self.nodes[parent.index()].children.retain(|c| *c != node);
        }
    }

    pub fn name(&self, node: NodeId) -> &str {
        &self.nodes[node.index()].name
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.index()].parent
    }

    pub fn clips(&self, node: NodeId) -> &[ClipId] {
        &self.nodes[node.index()].clips
    }

    /// First child of `parent` named `name`.
    pub fn find_child(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.nodes[parent.index()]
            .children
            .iter()
            .copied()
            .find(|c| self.nodes[c.index()].name == name)
    }

    /// All nodes reachable from `node` (inclusive), depth first in child order.
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![node];
        while let Some(n) = stack.pop() {
            out.push(n);
            for c in self.nodes[n.index()].children.iter().rev() {
                stack.push(*c);
            }
        }
        out
    }

    fn build(&mut self, parent: Option<NodeId>, spec: NodeSpec) {
        let id = match parent {
            Some(p) => self.add_child(p, spec.name),
            None => {
                self.nodes[0].name = spec.name;
                self.root()
            }
        };
        for c in spec.components {
            self.add_component(id, c);
        }
        for clip in spec.clips {
            self.attach_clip(id, clip);
        }
        for child in spec.children {
            self.build(Some(id), child);
        }
    }
}

impl SceneGraph for SceneTree {
    type Node = NodeId;

    fn children(&self, node: NodeId) -> Vec<(&str, NodeId)> {
        self.nodes[node.index()]
            .children
            .iter()
            .map(|c| (self.nodes[c.index()].name.as_str(), *c))
            .collect()
    }

    fn components(&self, node: NodeId) -> HashSet<ComponentType> {
        self.nodes[node.index()].components.iter().cloned().collect()
    }

    fn has_component(&self, node: NodeId, component: &ComponentType) -> bool {
        self.nodes[node.index()].components.contains(component)
    }
}

/// Nested serialized form of a scene tree (fixtures, host exports).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeSpec {
    pub name: String,
    #[serde(default)]
    pub components: Vec<ComponentType>,
    #[serde(default)]
    pub clips: Vec<ClipId>,
    #[serde(default)]
    pub children: Vec<NodeSpec>,
}

impl From<NodeSpec> for SceneTree {
    fn from(spec: NodeSpec) -> Self {
        let mut tree = SceneTree::new(String::new());
        tree.build(None, spec);
        tree
    }
}

impl<'de> Deserialize<'de> for SceneTree {
    fn deserialize<D>(deserializer: D) -> Result<SceneTree, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        NodeSpec::deserialize(deserializer).map(SceneTree::from)
    }
}
