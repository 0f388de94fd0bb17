//! Path resolution against a scene graph.
//!
//! One routine answers both "which node does this path address" and "how far
//! did the walk get", so the detector's path-broken and type-broken
//! classifications can never disagree.

use hashbrown::HashSet;
use serde::Serialize;

use animfix_api_core::BindingPath;

use crate::scene::SceneGraph;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum Resolution<N> {
    /// Every segment matched; the addressed node.
    Resolved(N),
    /// The walk stopped early. `deepest` is the last node reached and
    /// `unmatched` the index of the first segment with no matching child.
    Partial { deepest: N, unmatched: usize },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PathResolution<N> {
    pub outcome: Resolution<N>,
    /// Segment indices at which more than one sibling carried the segment's
    /// name. The first sibling in child order was taken.
    pub ambiguous: Vec<usize>,
}

impl<N: Copy> PathResolution<N> {
    pub fn node(&self) -> Option<N> {
        match self.outcome {
            Resolution::Resolved(n) => Some(n),
            Resolution::Partial { .. } => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self.outcome, Resolution::Resolved(_))
    }

    pub fn is_ambiguous(&self) -> bool {
        !self.ambiguous.is_empty()
    }

    /// Number of leading segments that matched.
    pub fn matched(&self, path: &BindingPath) -> usize {
        match self.outcome {
            Resolution::Resolved(_) => path.len(),
            Resolution::Partial { unmatched, .. } => unmatched,
        }
    }
}

/// Walk `path` from `root`, matching child names exactly.
pub fn resolve<G: SceneGraph>(
    graph: &G,
    root: G::Node,
    path: &BindingPath,
) -> PathResolution<G::Node> {
    let mut current = root;
    let mut ambiguous = Vec::new();
    for (index, segment) in path.segments().enumerate() {
        let mut found = None;
        let mut matches = 0usize;
        for (name, child) in graph.children(current) {
            if name == segment {
                matches += 1;
                if found.is_none() {
                    found = Some(child);
                }
            }
        }
        if matches > 1 {
            ambiguous.push(index);
        }
        match found {
            Some(child) => current = child,
            None => {
                return PathResolution {
                    outcome: Resolution::Partial {
                        deepest: current,
                        unmatched: index,
                    },
                    ambiguous,
                };
            }
        }
    }
    PathResolution {
        outcome: Resolution::Resolved(current),
        ambiguous,
    }
}

/// Path from `root` down to `target`, or `None` when `target` is not in the
/// subtree. When duplicate sibling names exist the returned path may resolve
/// to an earlier sibling; check with [`resolve`] if that matters.
pub fn path_to<G: SceneGraph>(graph: &G, root: G::Node, target: G::Node) -> Option<BindingPath> {
    let mut visited = HashSet::new();
    let mut stack: Vec<(G::Node, Vec<String>)> = vec![(root, Vec::new())];
    while let Some((node, segments)) = stack.pop() {
        if node == target {
            return BindingPath::from_segments(segments).ok();
        }
        if !visited.insert(node) {
            continue;
        }
        for (name, child) in graph.children(node).into_iter().rev() {
            let mut next = segments.clone();
            next.push(name.to_string());
            stack.push((child, next));
        }
    }
    None
}
