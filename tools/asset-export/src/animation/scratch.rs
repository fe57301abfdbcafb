//! Scratch copy of a skeleton subtree
//!
//! Pose sampling writes transforms into this copy so the host's scene graph
//! is never modified. Dropping it releases everything.

use hashbrown::HashMap;

use crate::error::Result;
use crate::scene::{NodeId, SceneGraph, Transform};

#[derive(Debug, Clone)]
pub struct ScratchNode {
    pub name: String,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
    pub local: Transform,
}

/// Pre-ordered clone of a subtree; index 0 is the root
#[derive(Debug, Clone)]
pub struct ScratchHierarchy {
    nodes: Vec<ScratchNode>,
    /// `(parent, child name)` -> child index, root keyed with no parent
    by_name: HashMap<(Option<usize>, String), usize>,
}

impl ScratchHierarchy {
    /// Clone `root` and its descendants in pre-order.
    ///
    /// Uses an explicit stack so deep rigs cannot overflow.
    pub fn clone_subtree(graph: &SceneGraph, root: NodeId) -> Result<Self> {
        let mut hierarchy = Self {
            nodes: Vec::new(),
            by_name: HashMap::new(),
        };

        let mut stack: Vec<(NodeId, Option<usize>)> = vec![(root, None)];
        while let Some((id, parent)) = stack.pop() {
            let source = graph.get(id)?;
            let index = hierarchy.nodes.len();
            hierarchy.nodes.push(ScratchNode {
                name: source.name.clone(),
                parent,
                children: Vec::new(),
                local: source.local,
            });
            if let Some(parent) = parent {
                hierarchy.nodes[parent].children.push(index);
            }
            // Siblings with the same name resolve to the first one
            hierarchy
                .by_name
                .entry((parent, source.name.clone()))
                .or_insert(index);

            stack.extend(source.children.iter().rev().map(|&c| (c, Some(index))));
        }

        Ok(hierarchy)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn root_name(&self) -> &str {
        self.nodes.first().map_or("", |n| n.name.as_str())
    }

    pub fn nodes(&self) -> &[ScratchNode] {
        &self.nodes
    }

    pub fn node(&self, index: usize) -> Option<&ScratchNode> {
        self.nodes.get(index)
    }

    pub fn set_local(&mut self, index: usize, local: Transform) {
        if let Some(node) = self.nodes.get_mut(index) {
            node.local = local;
        }
    }

    /// Resolve a binding path. The first segment must name the root.
    pub fn resolve_path(&self, path: &str) -> Option<usize> {
        let mut segments = path.split('/');
        let first = segments.next().filter(|s| !s.is_empty())?;
        let mut current = *self.by_name.get(&(None, first.to_string()))?;
        for segment in segments {
            current = *self.by_name.get(&(Some(current), segment.to_string()))?;
        }
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn graph() -> (SceneGraph, NodeId) {
        let mut graph = SceneGraph::new();
        let scene = graph.add_node("Scene", None, Transform::IDENTITY).unwrap();
        let hips = graph
            .add_node("Hips", Some(scene), Transform::from_translation(Vec3::Y))
            .unwrap();
        let spine = graph.add_node("Spine", Some(hips), Transform::IDENTITY).unwrap();
        graph.add_node("Head", Some(spine), Transform::IDENTITY).unwrap();
        graph.add_node("LegL", Some(hips), Transform::IDENTITY).unwrap();
        (graph, hips)
    }

    #[test]
    fn test_clone_is_pre_order() {
        let (graph, hips) = graph();
        let scratch = ScratchHierarchy::clone_subtree(&graph, hips).unwrap();
        let names: Vec<_> = scratch.nodes().iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["Hips", "Spine", "Head", "LegL"]);
        assert_eq!(scratch.node(2).unwrap().parent, Some(1));
        assert_eq!(scratch.node(0).unwrap().local.translation, Vec3::Y);
    }

    #[test]
    fn test_resolve_path() {
        let (graph, hips) = graph();
        let scratch = ScratchHierarchy::clone_subtree(&graph, hips).unwrap();
        assert_eq!(scratch.resolve_path("Hips"), Some(0));
        assert_eq!(scratch.resolve_path("Hips/Spine/Head"), Some(2));
        assert_eq!(scratch.resolve_path("Hips/LegL"), Some(3));
        assert_eq!(scratch.resolve_path("Hips/Head"), None);
        assert_eq!(scratch.resolve_path("Spine"), None);
        assert_eq!(scratch.resolve_path(""), None);
    }

    #[test]
    fn test_writes_do_not_touch_source() {
        let (graph, hips) = graph();
        let mut scratch = ScratchHierarchy::clone_subtree(&graph, hips).unwrap();
        scratch.set_local(0, Transform::IDENTITY);
        assert_eq!(graph.get(hips).unwrap().local.translation, Vec3::Y);
    }
}
