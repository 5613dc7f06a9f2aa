use std::collections::HashMap;

use glam::{Mat4, Vec3};
use serde::Serialize;

use crate::error::{CoreError, CoreResult};
use crate::node::{NodeId, NodeKind, SceneNode, Transform};

/// Which of the two content containers a scene renders into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    /// Anchored to the tracked AR surface.
    Ar,
    /// Used when AR is unavailable.
    Fallback,
}

impl ContainerKind {
    /// The container's node name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Ar => "ar-content",
            Self::Fallback => "fallback-content",
        }
    }
}

/// A nested, serializable copy of a subtree, used for dumps.
#[derive(Debug, Clone, Serialize)]
pub struct NodeSnapshot {
    /// Node name.
    pub name: String,
    /// Node kind with its attributes.
    #[serde(flatten)]
    pub kind: NodeKind,
    /// Local transform.
    pub transform: Transform,
    /// Interactive flag.
    pub interactive: bool,
    /// Child snapshots in order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSnapshot>,
}

/// The retained scene tree. Owns every node.
#[derive(Debug, Clone)]
pub struct SceneTree {
    nodes: HashMap<NodeId, SceneNode>,
    root: NodeId,
    ar_content: NodeId,
    fallback_content: NodeId,
}

impl Default for SceneTree {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneTree {
    /// Create a tree holding a root and both content containers.
    pub fn new() -> Self {
        let root = SceneNode::new(NodeKind::Root, "scene");
        let root_id = root.id;
        let mut tree = Self {
            nodes: HashMap::from([(root_id, root)]),
            root: root_id,
            ar_content: root_id,
            fallback_content: root_id,
        };

        let ar = SceneNode::new(NodeKind::Container, ContainerKind::Ar.name());
        let fallback = SceneNode::new(NodeKind::Container, ContainerKind::Fallback.name());
        tree.ar_content = tree.attach(root_id, ar);
        tree.fallback_content = tree.attach(root_id, fallback);
        tree
    }

    // -----------------------------------------------------------------------
    // Lookup
    // -----------------------------------------------------------------------

    /// The root node ID.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The node ID of a content container.
    pub fn container(&self, kind: ContainerKind) -> NodeId {
        match kind {
            ContainerKind::Ar => self.ar_content,
            ContainerKind::Fallback => self.fallback_content,
        }
    }

    /// Get a node by ID.
    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(&id)
    }

    /// Get a mutable node by ID.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(&id)
    }

    /// Whether the node is still part of the tree.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Total number of nodes, root and containers included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: the root is never removed.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Direct children of a node, or an empty slice if it is gone.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(&id)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    /// Ancestors from the parent up to the root.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut current = self.nodes.get(&id).and_then(|n| n.parent);
        while let Some(parent) = current {
            out.push(parent);
            current = self.nodes.get(&parent).and_then(|n| n.parent);
        }
        out
    }

    /// All descendants in depth-first pre-order, excluding `id` itself.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    /// Whether `ancestor` is `id` or lies above it.
    pub fn is_within(&self, id: NodeId, ancestor: NodeId) -> bool {
        id == ancestor || self.ancestors(id).contains(&ancestor)
    }

    /// Descendants of `under` whose node satisfies `predicate`.
    pub fn find_all<F>(&self, under: NodeId, predicate: F) -> Vec<NodeId>
    where
        F: Fn(&SceneNode) -> bool,
    {
        self.descendants(under)
            .into_iter()
            .filter(|id| self.nodes.get(id).is_some_and(&predicate))
            .collect()
    }

    /// Every interactive node in the tree.
    pub fn interactive_nodes(&self) -> Vec<NodeId> {
        self.find_all(self.root, |n| n.interactive)
    }

    // -----------------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------------

    /// Append `node` as the last child of `parent`. Returns the node's ID.
    pub fn append_child(&mut self, parent: NodeId, node: SceneNode) -> CoreResult<NodeId> {
        if !self.nodes.contains_key(&parent) {
            return Err(CoreError::NodeNotFound(parent));
        }
        Ok(self.attach(parent, node))
    }

    fn attach(&mut self, parent: NodeId, mut node: SceneNode) -> NodeId {
        let id = node.id;
        node.parent = Some(parent);
        self.nodes.insert(id, node);
        if let Some(p) = self.nodes.get_mut(&parent) {
            p.children.push(id);
        }
        id
    }

    /// Move an existing node under a new parent.
    pub fn reparent(&mut self, id: NodeId, parent: NodeId) -> CoreResult<()> {
        if id == self.root {
            return Err(CoreError::RootRemoval);
        }
        if !self.nodes.contains_key(&id) {
            return Err(CoreError::NodeNotFound(id));
        }
        if !self.nodes.contains_key(&parent) {
            return Err(CoreError::NodeNotFound(parent));
        }
        if self.is_within(parent, id) {
            return Err(CoreError::Cycle { child: id, parent });
        }
        self.unlink(id);
        if let Some(node) = self.nodes.get_mut(&id) {
            node.parent = Some(parent);
        }
        if let Some(p) = self.nodes.get_mut(&parent) {
            p.children.push(id);
        }
        Ok(())
    }

    /// Remove a node and its whole subtree. Returns the removed node.
    pub fn remove(&mut self, id: NodeId) -> CoreResult<SceneNode> {
        if id == self.root {
            return Err(CoreError::RootRemoval);
        }
        if !self.nodes.contains_key(&id) {
            return Err(CoreError::NodeNotFound(id));
        }
        self.unlink(id);
        for descendant in self.descendants(id) {
            self.nodes.remove(&descendant);
        }
        self.nodes.remove(&id).ok_or(CoreError::NodeNotFound(id))
    }

    /// Remove every child of `id` (and their subtrees). Returns how many
    /// nodes were dropped in total.
    pub fn clear_children(&mut self, id: NodeId) -> CoreResult<usize> {
        let node = self.nodes.get_mut(&id).ok_or(CoreError::NodeNotFound(id))?;
        let children = std::mem::take(&mut node.children);
        let mut removed = 0;
        for child in children {
            for descendant in self.descendants(child) {
                self.nodes.remove(&descendant);
                removed += 1;
            }
            if self.nodes.remove(&child).is_some() {
                removed += 1;
            }
        }
        Ok(removed)
    }

    fn unlink(&mut self, id: NodeId) {
        let parent = self.nodes.get(&id).and_then(|n| n.parent);
        if let Some(parent) = parent
            && let Some(p) = self.nodes.get_mut(&parent)
        {
            p.children.retain(|c| *c != id);
        }
    }

    /// Set a node's local position.
    pub fn set_position(&mut self, id: NodeId, position: Vec3) -> CoreResult<()> {
        let node = self.nodes.get_mut(&id).ok_or(CoreError::NodeNotFound(id))?;
        node.transform.position = position;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Spatial queries
    // -----------------------------------------------------------------------

    /// The node's local-to-world matrix.
    pub fn world_matrix(&self, id: NodeId) -> Option<Mat4> {
        let node = self.nodes.get(&id)?;
        let mut matrix = node.transform.matrix();
        for ancestor in self.ancestors(id) {
            matrix = self.nodes.get(&ancestor)?.transform.matrix() * matrix;
        }
        Some(matrix)
    }

    /// The node's origin in world space.
    pub fn world_position(&self, id: NodeId) -> Option<Vec3> {
        self.world_matrix(id).map(|m| m.transform_point3(Vec3::ZERO))
    }

    /// A nested copy of the subtree rooted at `id`.
    pub fn snapshot(&self, id: NodeId) -> Option<NodeSnapshot> {
        let node = self.nodes.get(&id)?;
        Some(NodeSnapshot {
            name: node.name.clone(),
            kind: node.kind.clone(),
            transform: node.transform,
            interactive: node.interactive,
            children: node
                .children
                .iter()
                .filter_map(|c| self.snapshot(*c))
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Bounds;

    fn model(asset: &str) -> SceneNode {
        SceneNode::new(
            NodeKind::Model {
                asset: asset.to_string(),
            },
            asset,
        )
        .entity()
    }

    #[test]
    fn new_tree_has_two_empty_containers() {
        let tree = SceneTree::new();
        assert_eq!(tree.len(), 3);
        let ar = tree.container(ContainerKind::Ar);
        let fallback = tree.container(ContainerKind::Fallback);
        assert_ne!(ar, fallback);
        assert!(tree.children(ar).is_empty());
        assert_eq!(tree.get(ar).unwrap().name, "ar-content");
        assert_eq!(tree.children(tree.root()), &[ar, fallback]);
    }

    #[test]
    fn append_and_walk_ancestors() {
        let mut tree = SceneTree::new();
        let ar = tree.container(ContainerKind::Ar);
        let hare = tree.append_child(ar, model("hare")).unwrap();
        let mesh = tree
            .append_child(hare, SceneNode::new(NodeKind::Mesh, "hare-mesh"))
            .unwrap();

        assert_eq!(tree.ancestors(mesh), vec![hare, ar, tree.root()]);
        assert!(tree.is_within(mesh, ar));
        assert!(!tree.is_within(ar, mesh));
    }

    #[test]
    fn append_to_missing_parent_fails() {
        let mut tree = SceneTree::new();
        let ghost = NodeId::new();
        let err = tree.append_child(ghost, model("tree")).unwrap_err();
        assert!(matches!(err, CoreError::NodeNotFound(id) if id == ghost));
    }

    #[test]
    fn clear_children_drops_whole_subtrees() {
        let mut tree = SceneTree::new();
        let ar = tree.container(ContainerKind::Ar);
        let hare = tree.append_child(ar, model("hare")).unwrap();
        let mesh = tree
            .append_child(hare, SceneNode::new(NodeKind::Mesh, "m"))
            .unwrap();
        tree.append_child(ar, model("tree")).unwrap();

        let removed = tree.clear_children(ar).unwrap();
        assert_eq!(removed, 3);
        assert!(tree.children(ar).is_empty());
        assert!(!tree.contains(hare));
        assert!(!tree.contains(mesh));
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn remove_detaches_from_parent() {
        let mut tree = SceneTree::new();
        let ar = tree.container(ContainerKind::Ar);
        let a = tree.append_child(ar, model("a")).unwrap();
        let b = tree.append_child(ar, model("b")).unwrap();

        let removed = tree.remove(a).unwrap();
        assert_eq!(removed.name, "a");
        assert_eq!(tree.children(ar), &[b]);
        assert!(matches!(tree.remove(a), Err(CoreError::NodeNotFound(_))));
    }

    #[test]
    fn root_cannot_be_removed() {
        let mut tree = SceneTree::new();
        let root = tree.root();
        assert!(matches!(tree.remove(root), Err(CoreError::RootRemoval)));
    }

    #[test]
    fn reparent_rejects_cycles() {
        let mut tree = SceneTree::new();
        let ar = tree.container(ContainerKind::Ar);
        let a = tree.append_child(ar, model("a")).unwrap();
        let b = tree.append_child(a, model("b")).unwrap();

        assert!(matches!(tree.reparent(a, b), Err(CoreError::Cycle { .. })));

        let fallback = tree.container(ContainerKind::Fallback);
        tree.reparent(a, fallback).unwrap();
        assert!(tree.children(ar).is_empty());
        assert_eq!(tree.ancestors(b), vec![a, fallback, tree.root()]);
    }

    #[test]
    fn world_position_accumulates_parents() {
        let mut tree = SceneTree::new();
        let ar = tree.container(ContainerKind::Ar);
        let parent = tree
            .append_child(
                ar,
                model("p").with_transform(
                    Transform::at(Vec3::new(1.0, 0.0, 0.0)).with_scale(Vec3::splat(2.0)),
                ),
            )
            .unwrap();
        let child = tree
            .append_child(
                parent,
                SceneNode::new(NodeKind::Mesh, "c").at(Vec3::new(0.0, 1.0, 0.0)),
            )
            .unwrap();

        let p = tree.world_position(child).unwrap();
        assert!((p - Vec3::new(1.0, 2.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn interactive_nodes_and_find_all() {
        let mut tree = SceneTree::new();
        let ar = tree.container(ContainerKind::Ar);
        let tortoise = tree.append_child(ar, model("tortoise").interactive()).unwrap();
        tree.append_child(
            tortoise,
            SceneNode::new(NodeKind::Mesh, "shell").with_bounds(Bounds::sphere(Vec3::ZERO, 0.3)),
        )
        .unwrap();
        tree.append_child(ar, model("tree")).unwrap();

        assert_eq!(tree.interactive_nodes(), vec![tortoise]);
        let meshes = tree.find_all(ar, |n| n.kind == NodeKind::Mesh);
        assert_eq!(meshes.len(), 1);
    }

    #[test]
    fn snapshot_serializes_nested_children() {
        let mut tree = SceneTree::new();
        let ar = tree.container(ContainerKind::Ar);
        tree.append_child(ar, model("tree")).unwrap();

        let snapshot = tree.snapshot(ar).unwrap();
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["name"], "ar-content");
        assert_eq!(json["kind"], "container");
        assert_eq!(json["children"][0]["asset"], "tree");
    }
}
