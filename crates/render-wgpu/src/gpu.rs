use crate::shaders;
use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use orbitview_common::{Mesh, NodeId};
use orbitview_render::{Light, PerspectiveCamera, Scene};
use std::collections::BTreeMap;
use wgpu::util::DeviceExt;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Uniforms {
    view_proj: [[f32; 4]; 4],
    /// Direction toward the directional light (xyz).
    light_dir: [f32; 4],
    light_color: [f32; 4],
    ambient: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Vertex {
    position: [f32; 3],
    normal: [f32; 3],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct InstanceData {
    model_0: [f32; 4],
    model_1: [f32; 4],
    model_2: [f32; 4],
    model_3: [f32; 4],
    color: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct GridVertex {
    position: [f32; 3],
    color: [f32; 4],
}

/// GPU copy of one mesh.
struct MeshBuffers {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

/// Interleave positions and normals. Missing normals point up.
fn mesh_vertices(mesh: &Mesh) -> Vec<Vertex> {
    mesh.positions
        .iter()
        .enumerate()
        .map(|(i, p)| Vertex {
            position: *p,
            normal: mesh.normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]),
        })
        .collect()
}

/// Generate grid floor line vertices.
fn grid_mesh(half_extent: i32, spacing: f32) -> Vec<GridVertex> {
    let mut verts = Vec::new();
    let color = [0.6, 0.6, 0.6, 1.0];
    let extent = half_extent as f32 * spacing;

    for i in -half_extent..=half_extent {
        let offset = i as f32 * spacing;
        // Lines along X
        verts.push(GridVertex {
            position: [-extent, 0.0, offset],
            color,
        });
        verts.push(GridVertex {
            position: [extent, 0.0, offset],
            color,
        });
        // Lines along Z
        verts.push(GridVertex {
            position: [offset, 0.0, -extent],
            color,
        });
        verts.push(GridVertex {
            position: [offset, 0.0, extent],
            color,
        });
    }
    verts
}

/// Fold the scene's lights into the shader uniform layout.
fn light_uniforms(lights: &[Light]) -> ([f32; 4], [f32; 4], [f32; 4]) {
    let mut ambient = Vec3::ZERO;
    let mut direction = Vec3::Y;
    let mut color = Vec3::ZERO;

    for light in lights {
        match light {
            Light::Ambient {
                color: c,
                intensity,
            } => {
                ambient += Vec3::new(c.0[0], c.0[1], c.0[2]) * *intensity;
            }
            Light::Directional {
                color: c,
                intensity,
                position,
            } => {
                // The shader takes one directional light; the last one wins.
                let toward = position.normalize_or_zero();
                direction = if toward == Vec3::ZERO { Vec3::Y } else { toward };
                color = Vec3::new(c.0[0], c.0[1], c.0[2]) * *intensity;
            }
        }
    }

    (
        direction.extend(0.0).to_array(),
        color.extend(1.0).to_array(),
        ambient.extend(1.0).to_array(),
    )
}

/// wgpu scene renderer: grid floor plus one instanced draw per mesh.
pub struct MeshRenderer {
    mesh_pipeline: wgpu::RenderPipeline,
    grid_pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    grid_vertex_buffer: wgpu::Buffer,
    grid_vertex_count: u32,
    instance_buffer: wgpu::Buffer,
    instance_capacity: u32,
    meshes: BTreeMap<(NodeId, usize), MeshBuffers>,
    depth_texture: wgpu::TextureView,
    surface_format: wgpu::TextureFormat,
}

impl MeshRenderer {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) -> Self {
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("uniform_buffer"),
            contents: bytemuck::bytes_of(&Uniforms {
                view_proj: Mat4::IDENTITY.to_cols_array_2d(),
                light_dir: [0.0, 1.0, 0.0, 0.0],
                light_color: [0.0; 4],
                ambient: [1.0; 4],
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("uniform_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("uniform_bind_group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let depth_stencil = wgpu::DepthStencilState {
            format: wgpu::TextureFormat::Depth32Float,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: Default::default(),
            bias: Default::default(),
        };

        // Mesh pipeline
        let mesh_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("mesh_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::MESH_SHADER.into()),
        });

        let mesh_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("mesh_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &mesh_shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<Vertex>() as u64,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &wgpu::vertex_attr_array![
                            0 => Float32x3,
                            1 => Float32x3,
                        ],
                    },
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<InstanceData>() as u64,
                        step_mode: wgpu::VertexStepMode::Instance,
                        attributes: &wgpu::vertex_attr_array![
                            2 => Float32x4,
                            3 => Float32x4,
                            4 => Float32x4,
                            5 => Float32x4,
                            6 => Float32x4,
                        ],
                    },
                ],
            },
            fragment: Some(wgpu::FragmentState {
                module: &mesh_shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            // Imported assets are not guaranteed to be consistently wound.
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(depth_stencil.clone()),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        // Grid pipeline
        let grid_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("grid_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::GRID_SHADER.into()),
        });

        let grid_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("grid_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &grid_shader,
                entry_point: Some("vs_grid"),
                compilation_options: Default::default(),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<GridVertex>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![
                        0 => Float32x3,
                        1 => Float32x4,
                    ],
                }],
            },
            fragment: Some(wgpu::FragmentState {
                module: &grid_shader,
                entry_point: Some("fs_grid"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::LineList,
                ..Default::default()
            },
            depth_stencil: Some(depth_stencil),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        let grid_verts = grid_mesh(50, 1.0);
        let grid_vertex_count = grid_verts.len() as u32;
        let grid_vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("grid_vertex_buffer"),
            contents: bytemuck::cast_slice(&grid_verts),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let instance_capacity = INITIAL_INSTANCE_CAPACITY;
        let instance_buffer = create_instance_buffer(device, instance_capacity);

        let depth_texture = Self::create_depth_texture(device, width, height);

        Self {
            mesh_pipeline,
            grid_pipeline,
            uniform_buffer,
            uniform_bind_group,
            grid_vertex_buffer,
            grid_vertex_count,
            instance_buffer,
            instance_capacity,
            meshes: BTreeMap::new(),
            depth_texture,
            surface_format,
        }
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_texture = Self::create_depth_texture(device, width, height);
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface_format
    }

    /// Number of meshes currently resident on the GPU.
    pub fn resident_meshes(&self) -> usize {
        self.meshes.len()
    }

    /// Upload meshes of newly added nodes and drop those of removed nodes.
    fn sync_meshes(&mut self, device: &wgpu::Device, scene: &Scene) {
        self.meshes.retain(|(node, _), _| scene.get(*node).is_some());

        for (id, node) in scene.nodes() {
            for (index, mesh) in node.meshes.iter().enumerate() {
                if self.meshes.contains_key(&(*id, index)) || mesh.indices.is_empty() {
                    continue;
                }
                let vertices = mesh_vertices(mesh);
                let vertex_buffer =
                    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some("mesh_vertex_buffer"),
                        contents: bytemuck::cast_slice(&vertices),
                        usage: wgpu::BufferUsages::VERTEX,
                    });
                let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("mesh_index_buffer"),
                    contents: bytemuck::cast_slice(&mesh.indices),
                    usage: wgpu::BufferUsages::INDEX,
                });
                tracing::debug!(
                    node = %id.short(),
                    mesh = %mesh.name,
                    triangles = mesh.triangle_count(),
                    "uploaded mesh"
                );
                self.meshes.insert(
                    (*id, index),
                    MeshBuffers {
                        vertex_buffer,
                        index_buffer,
                        index_count: mesh.indices.len() as u32,
                    },
                );
            }
        }
    }

    /// Render one frame: grid floor + scene meshes.
    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        scene: &Scene,
        camera: &PerspectiveCamera,
    ) {
        self.sync_meshes(device, scene);

        let (light_dir, light_color, ambient) = light_uniforms(scene.lights());
        queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&Uniforms {
                view_proj: camera.view_projection().to_cols_array_2d(),
                light_dir,
                light_color,
                ambient,
            }),
        );

        // One instance per resident mesh, in the same order as `self.meshes`.
        let mut instances: Vec<InstanceData> = Vec::new();
        let mut draws: Vec<&MeshBuffers> = Vec::new();
        for ((id, index), buffers) in &self.meshes {
            let Some(node) = scene.get(*id) else {
                continue;
            };
            let Some(mesh) = node.meshes.get(*index) else {
                continue;
            };
            let cols = node.model_matrix().to_cols_array_2d();
            instances.push(InstanceData {
                model_0: cols[0],
                model_1: cols[1],
                model_2: cols[2],
                model_3: cols[3],
                color: mesh.base_color.0,
            });
            draws.push(buffers);
        }

        if let Some(capacity) = grown_capacity(self.instance_capacity, instances.len()) {
            tracing::debug!(
                from = self.instance_capacity,
                to = capacity,
                "growing instance buffer"
            );
            self.instance_buffer = create_instance_buffer(device, capacity);
            self.instance_capacity = capacity;
        }
        if !instances.is_empty() {
            queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&instances));
        }

        let [r, g, b, a] = scene.background.0;
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("render_encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("main_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: r as f64,
                            g: g as f64,
                            b: b as f64,
                            a: a as f64,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            pass.set_pipeline(&self.grid_pipeline);
            pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            pass.set_vertex_buffer(0, self.grid_vertex_buffer.slice(..));
            pass.draw(0..self.grid_vertex_count, 0..1);

            if !draws.is_empty() {
                pass.set_pipeline(&self.mesh_pipeline);
                pass.set_bind_group(0, &self.uniform_bind_group, &[]);
                pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
                for (i, buffers) in draws.iter().enumerate() {
                    let instance = i as u32;
                    pass.set_vertex_buffer(0, buffers.vertex_buffer.slice(..));
                    pass.set_index_buffer(
                        buffers.index_buffer.slice(..),
                        wgpu::IndexFormat::Uint32,
                    );
                    pass.draw_indexed(0..buffers.index_count, 0, instance..instance + 1);
                }
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
    }

    /// Drop every uploaded mesh.
    pub fn clear(&mut self) {
        self.meshes.clear();
    }

    fn create_depth_texture(
        device: &wgpu::Device,
        width: u32,
        height: u32,
    ) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth_texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Depth32Float,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&Default::default())
    }
}

const INITIAL_INSTANCE_CAPACITY: u32 = 256;

fn create_instance_buffer(device: &wgpu::Device, capacity: u32) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("instance_buffer"),
        size: capacity as u64 * std::mem::size_of::<InstanceData>() as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

/// New instance capacity when `needed` instances overflow `current`:
/// the next power of two that fits them.
fn grown_capacity(current: u32, needed: usize) -> Option<u32> {
    if needed <= current as usize {
        return None;
    }
    let needed = u32::try_from(needed).unwrap_or(u32::MAX);
    Some(needed.checked_next_power_of_two().unwrap_or(u32::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use orbitview_common::Color;

    #[test]
    fn instance_buffer_grows_past_capacity() {
        assert_eq!(grown_capacity(256, 0), None);
        assert_eq!(grown_capacity(256, 256), None);
        assert_eq!(grown_capacity(256, 257), Some(512));
        assert_eq!(grown_capacity(256, 5_000), Some(8_192));
        assert_eq!(grown_capacity(8_192, 5_000), None);
    }

    #[test]
    fn grid_has_two_lines_per_step() {
        let verts = grid_mesh(2, 1.0);
        // 5 steps, 2 lines of 2 vertices each
        assert_eq!(verts.len(), 20);
    }

    #[test]
    fn vertices_default_missing_normals_up() {
        let mesh = Mesh {
            positions: vec![[0.0; 3], [1.0, 0.0, 0.0]],
            normals: vec![[1.0, 0.0, 0.0]],
            ..Mesh::default()
        };
        let verts = mesh_vertices(&mesh);
        assert_eq!(verts[0].normal, [1.0, 0.0, 0.0]);
        assert_eq!(verts[1].normal, [0.0, 1.0, 0.0]);
    }

    #[test]
    fn lights_fold_into_uniforms() {
        let lights = [
            Light::Ambient {
                color: Color::WHITE,
                intensity: 1.0,
            },
            Light::Directional {
                color: Color::WHITE,
                intensity: 2.0,
                position: Vec3::new(10.0, 10.0, 10.0),
            },
        ];
        let (dir, color, ambient) = light_uniforms(&lights);
        let expected = Vec3::splat(1.0).normalize();
        assert!((Vec3::new(dir[0], dir[1], dir[2]) - expected).length() < 1e-6);
        assert_eq!(color[0], 2.0);
        assert_eq!(ambient[0], 1.0);
    }
}
