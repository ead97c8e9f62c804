use glam::Mat4;

use super::color::Color;
use super::geometry::Geometry;
use super::transform::Transform;

/// Stable handle to a node inside one `Scene`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A scene node: named transform with optional geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub name: String,
    pub transform: Transform,
    pub geometry: Option<Geometry>,
    pub visible: bool,
    parent: Option<NodeId>,
}

impl Node {
    /// An empty grouping node.
    pub fn group(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Transform::default(),
            geometry: None,
            visible: true,
            parent: None,
        }
    }

    pub fn with_geometry(name: impl Into<String>, geometry: Geometry) -> Self {
        Self {
            geometry: Some(geometry),
            ..Self::group(name)
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }
}

/// Arena-backed scene graph.
///
/// Nodes are never removed, so a `NodeId` stays valid for the scene's lifetime.
/// Iteration order is insertion order, which is also draw order.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    nodes: Vec<Node>,
    pub background: Color,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `node` under `parent` (or at the root).
    ///
    /// # Panics
    /// If `parent` does not belong to this scene.
    pub fn add(&mut self, parent: Option<NodeId>, mut node: Node) -> NodeId {
        if let Some(parent) = parent {
            assert!(parent.index() < self.nodes.len(), "unknown parent {parent:?}");
        }
        node.parent = parent;
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|n| n.name == name)
            .map(|i| NodeId(i as u32))
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeId(i as u32), n))
    }

    /// Model matrix of `id`, composed through its ancestors.
    pub fn world_matrix(&self, id: NodeId) -> Mat4 {
        let mut matrix = Mat4::IDENTITY;
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let Some(node) = self.node(current) else { break };
            matrix = node.transform.matrix() * matrix;
            cursor = node.parent;
        }
        matrix
    }

    /// Whether `id` and all of its ancestors are visible.
    pub fn is_visible(&self, id: NodeId) -> bool {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            match self.node(current) {
                Some(node) if node.visible => cursor = node.parent,
                _ => return false,
            }
        }
        true
    }
}
