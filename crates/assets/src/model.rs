use glam::Vec3;
use orbitview_common::{Aabb, Color, Mesh};

/// A decoded model: named geometry in model-local space.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelGraph {
    pub name: String,
    pub meshes: Vec<Mesh>,
}

impl ModelGraph {
    pub fn new(name: impl Into<String>, meshes: Vec<Mesh>) -> Self {
        Self {
            name: name.into(),
            meshes,
        }
    }

    /// Axis-aligned bounds over every mesh. Empty when there is no geometry.
    pub fn bounds(&self) -> Aabb {
        self.meshes
            .iter()
            .map(Mesh::bounds)
            .fold(Aabb::EMPTY, |acc, b| acc.union(&b))
    }

    pub fn vertex_count(&self) -> usize {
        self.meshes.iter().map(|m| m.positions.len()).sum()
    }

    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(Mesh::triangle_count).sum()
    }

    /// Axis-aligned box of the given half extents centred on `center`.
    pub fn cuboid(name: impl Into<String>, center: Vec3, half_extents: Vec3) -> Self {
        let h = half_extents;
        let mut positions = Vec::with_capacity(24);
        let mut normals = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);

        // (normal, tangent u, tangent v) per face
        let faces = [
            (Vec3::X, Vec3::NEG_Z, Vec3::Y),
            (Vec3::NEG_X, Vec3::Z, Vec3::Y),
            (Vec3::Y, Vec3::X, Vec3::NEG_Z),
            (Vec3::NEG_Y, Vec3::X, Vec3::Z),
            (Vec3::Z, Vec3::X, Vec3::Y),
            (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
        ];
        for (normal, u, v) in faces {
            let base = positions.len() as u32;
            for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
                let p = center + (normal + u * su + v * sv) * h;
                positions.push(p.to_array());
                normals.push(normal.to_array());
            }
            indices.extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
        }

        let name = name.into();
        Self {
            meshes: vec![Mesh {
                name: format!("{name}_box"),
                positions,
                normals,
                indices,
                base_color: Color::default(),
            }],
            name,
        }
    }
}
