use std::collections::BTreeMap;

use glam::{Mat4, Vec3};
use orbitview_common::{Aabb, Color, Mesh, NodeId, Transform};

/// A light source. Intensities are unitless multipliers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Light {
    Ambient { color: Color, intensity: f32 },
    /// Shines from `position` toward the origin.
    Directional {
        color: Color,
        intensity: f32,
        position: Vec3,
    },
}

/// A node holding meshes in its local space.
#[derive(Debug, Clone, Default)]
pub struct SceneNode {
    pub name: String,
    pub transform: Transform,
    pub meshes: Vec<Mesh>,
}

impl SceneNode {
    pub fn new(name: impl Into<String>, meshes: Vec<Mesh>) -> Self {
        Self {
            name: name.into(),
            transform: Transform::default(),
            meshes,
        }
    }

    /// Bounds of the meshes with the node transform applied.
    pub fn world_bounds(&self) -> Aabb {
        let matrix = self.transform.matrix();
        let mut bounds = Aabb::EMPTY;
        for mesh in &self.meshes {
            for p in &mesh.positions {
                bounds.expand(matrix.transform_point3(Vec3::from_array(*p)));
            }
        }
        bounds
    }

    pub fn model_matrix(&self) -> Mat4 {
        self.transform.matrix()
    }
}

/// Flat scene graph: background, lights, and top-level nodes.
///
/// Nodes are keyed by [`NodeId`] in a BTreeMap so iteration (and therefore
/// draw order) is deterministic.
#[derive(Debug, Clone)]
pub struct Scene {
    pub background: Color,
    lights: Vec<Light>,
    nodes: BTreeMap<NodeId, SceneNode>,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            background: Color::WHITE,
            lights: Vec::new(),
            nodes: BTreeMap::new(),
        }
    }
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn add(&mut self, node: SceneNode) -> NodeId {
        let id = NodeId::new();
        tracing::debug!(node = %id.short(), name = %node.name, "node added to scene");
        self.nodes.insert(id, node);
        id
    }

    pub fn remove(&mut self, id: NodeId) -> Option<SceneNode> {
        let node = self.nodes.remove(&id);
        if node.is_some() {
            tracing::debug!(node = %id.short(), "node removed from scene");
        }
        node
    }

    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(&id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(&id)
    }

    pub fn nodes(&self) -> &BTreeMap<NodeId, SceneNode> {
        &self.nodes
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_mesh() -> Mesh {
        Mesh {
            positions: vec![[-1.0, -1.0, -1.0], [1.0, 1.0, 1.0]],
            ..Mesh::default()
        }
    }

    #[test]
    fn add_get_remove() {
        let mut scene = Scene::new();
        let id = scene.add(SceneNode::new("model", vec![unit_mesh()]));
        assert_eq!(scene.node_count(), 1);
        assert_eq!(scene.get(id).map(|n| n.name.as_str()), Some("model"));

        assert!(scene.remove(id).is_some());
        assert!(scene.remove(id).is_none());
        assert_eq!(scene.node_count(), 0);
    }

    #[test]
    fn world_bounds_apply_transform() {
        let mut node = SceneNode::new("model", vec![unit_mesh()]);
        node.transform.scale = Vec3::splat(0.5);
        node.transform.position = Vec3::new(0.0, 0.5, 0.0);
        let b = node.world_bounds();
        assert_eq!(b.min, Vec3::new(-0.5, 0.0, -0.5));
        assert_eq!(b.max, Vec3::new(0.5, 1.0, 0.5));
    }

    #[test]
    fn lights_accumulate() {
        let mut scene = Scene::new();
        scene.add_light(Light::Ambient {
            color: Color::WHITE,
            intensity: 1.0,
        });
        assert_eq!(scene.lights().len(), 1);
    }
}
