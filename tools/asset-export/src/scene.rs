//! Host scene graph
//!
//! A flat arena of named transform nodes with parent/child links. Hosts (the
//! glTF importer, or an editor integration) fill it in; the exporter only
//! reads it. Bones, skeleton roots and animation targets are all referenced
//! by [`NodeId`].

use glam::{Quat, Vec3};

use crate::error::{ExportError, Result};

/// Index of a node in a [`SceneGraph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// Local transform of a node (translation, rotation, scale)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[derive(Debug, Clone)]
pub struct SceneNode {
    pub name: String,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub local: Transform,
}

#[derive(Debug, Clone, Default)]
pub struct SceneGraph {
    nodes: Vec<SceneNode>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a detached node. Use [`SceneGraph::attach`] to parent it.
    pub fn push_node(&mut self, name: impl Into<String>, local: Transform) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(SceneNode {
            name: name.into(),
            parent: None,
            children: Vec::new(),
            local,
        });
        id
    }

    /// Add a node under `parent` (or as a root).
    pub fn add_node(
        &mut self,
        name: impl Into<String>,
        parent: Option<NodeId>,
        local: Transform,
    ) -> Result<NodeId> {
        if let Some(parent) = parent {
            self.get(parent)?;
        }
        let id = self.push_node(name, local);
        if let Some(parent) = parent {
            self.attach(id, parent)?;
        }
        Ok(id)
    }

    /// Make `child` the last child of `parent`, detaching it from any previous parent.
    ///
    /// Fails without touching the graph if `parent` is `child` or one of its
    /// descendants.
    pub fn attach(&mut self, child: NodeId, parent: NodeId) -> Result<()> {
        self.get(child)?;
        let mut ancestor = Some(parent);
        while let Some(id) = ancestor {
            if id == child {
                return Err(ExportError::NodeCycle { child, parent });
            }
            ancestor = self.get(id)?.parent;
        }
        if let Some(old) = self.nodes[child.0].parent.take() {
            self.nodes[old.0].children.retain(|&c| c != child);
        }
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
        Ok(())
    }

    pub fn get(&self, id: NodeId) -> Result<&SceneNode> {
        self.nodes.get(id.0).ok_or(ExportError::UnknownNode(id))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// `root` and all of its descendants in pre-order.
    ///
    /// Iterative, so deep rigs cannot overflow the stack.
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        if root.0 >= self.nodes.len() {
            return out;
        }
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.nodes[id.0].children.iter().rev().copied());
        }
        out
    }

    /// First node named `name` in the pre-order walk of `root`'s subtree.
    pub fn find_in_subtree(&self, root: NodeId, name: &str) -> Option<NodeId> {
        self.descendants(root)
            .into_iter()
            .find(|&id| self.nodes[id.0].name == name)
    }

    /// Top-most ancestor of `id` (itself if it has no parent).
    pub fn top_ancestor(&self, id: NodeId) -> Result<NodeId> {
        let mut current = id;
        while let Some(parent) = self.get(current)?.parent {
            current = parent;
        }
        Ok(current)
    }

    /// Slash-separated names from the top-most ancestor down to `id`.
    pub fn path(&self, id: NodeId) -> Result<String> {
        let mut names = vec![self.get(id)?.name.as_str()];
        let mut current = id;
        while let Some(parent) = self.get(current)?.parent {
            names.push(self.get(parent)?.name.as_str());
            current = parent;
        }
        names.reverse();
        Ok(names.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Armature -> Hips -> (Spine -> Head, LegL)
    fn rig() -> (SceneGraph, [NodeId; 5]) {
        let mut graph = SceneGraph::new();
        let armature = graph.add_node("Armature", None, Transform::IDENTITY).unwrap();
        let hips = graph.add_node("Hips", Some(armature), Transform::IDENTITY).unwrap();
        let spine = graph.add_node("Spine", Some(hips), Transform::IDENTITY).unwrap();
        let head = graph.add_node("Head", Some(spine), Transform::IDENTITY).unwrap();
        let leg = graph.add_node("LegL", Some(hips), Transform::IDENTITY).unwrap();
        (graph, [armature, hips, spine, head, leg])
    }

    #[test]
    fn test_descendants_are_pre_order() {
        let (graph, [armature, hips, spine, head, leg]) = rig();
        assert_eq!(graph.descendants(armature), vec![armature, hips, spine, head, leg]);
        assert_eq!(graph.descendants(spine), vec![spine, head]);
    }

    #[test]
    fn test_path_and_ancestor() {
        let (graph, [armature, _, _, head, _]) = rig();
        assert_eq!(graph.path(head).unwrap(), "Armature/Hips/Spine/Head");
        assert_eq!(graph.top_ancestor(head).unwrap(), armature);
    }

    #[test]
    fn test_find_in_subtree() {
        let (graph, [armature, hips, spine, head, _]) = rig();
        assert_eq!(graph.find_in_subtree(armature, "Head"), Some(head));
        assert_eq!(graph.find_in_subtree(spine, "Hips"), None);
        assert_eq!(graph.find_in_subtree(hips, "Hips"), Some(hips));
    }

    #[test]
    fn test_attach_reparents() {
        let (mut graph, [armature, hips, spine, _, _]) = rig();
        graph.attach(spine, armature).unwrap();
        assert_eq!(graph.get(spine).unwrap().parent, Some(armature));
        assert!(!graph.get(hips).unwrap().children.contains(&spine));
    }

    #[test]
    fn test_attach_rejects_cycles() {
        let (mut graph, [armature, hips, _, head, _]) = rig();

        assert!(matches!(
            graph.attach(armature, head),
            Err(ExportError::NodeCycle { child, parent }) if child == armature && parent == head
        ));
        assert!(matches!(
            graph.attach(hips, hips),
            Err(ExportError::NodeCycle { .. })
        ));

        // Rejected attaches leave the hierarchy as it was
        assert_eq!(graph.get(armature).unwrap().parent, None);
        assert_eq!(graph.get(hips).unwrap().parent, Some(armature));
        assert_eq!(graph.top_ancestor(head).unwrap(), armature);
        assert_eq!(graph.path(head).unwrap(), "Armature/Hips/Spine/Head");
    }

    #[test]
    fn test_unknown_node() {
        let graph = SceneGraph::new();
        assert!(matches!(
            graph.get(NodeId(3)),
            Err(ExportError::UnknownNode(NodeId(3)))
        ));
        assert!(graph.descendants(NodeId(0)).is_empty());
    }
}
