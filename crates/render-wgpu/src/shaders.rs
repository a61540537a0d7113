//! WGSL sources. Both pipelines bind the same frame uniforms at group 0.

macro_rules! frame_uniforms {
    () => {
        r#"
struct Frame {
    view_proj: mat4x4<f32>,
    // xyz: unit vector toward the directional light
    light_dir: vec4<f32>,
    // rgb premultiplied by intensity
    light_color: vec4<f32>,
    ambient: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> frame: Frame;
"#
    };
}

/// Lit scene meshes. Each mesh is one instance carrying its model matrix
/// and base colour.
pub const MESH_SHADER: &str = concat!(
    frame_uniforms!(),
    r#"
struct MeshVertex {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

struct MeshInstance {
    @location(2) col0: vec4<f32>,
    @location(3) col1: vec4<f32>,
    @location(4) col2: vec4<f32>,
    @location(5) col3: vec4<f32>,
    @location(6) base_color: vec4<f32>,
};

struct Shaded {
    @builtin(position) clip: vec4<f32>,
    @location(0) normal: vec3<f32>,
    @location(1) base_color: vec4<f32>,
};

@vertex
fn vs_main(v: MeshVertex, inst: MeshInstance) -> Shaded {
    let model = mat4x4<f32>(inst.col0, inst.col1, inst.col2, inst.col3);
    var out: Shaded;
    out.clip = frame.view_proj * model * vec4<f32>(v.position, 1.0);
    // Uniform scale only, so the model matrix carries normals directly.
    out.normal = normalize((model * vec4<f32>(v.normal, 0.0)).xyz);
    out.base_color = inst.base_color;
    return out;
}

@fragment
fn fs_main(in: Shaded) -> @location(0) vec4<f32> {
    let lambert = max(dot(in.normal, frame.light_dir.xyz), 0.0);
    let radiance = frame.ambient.rgb + frame.light_color.rgb * lambert;
    let lit = in.base_color.rgb * radiance;
    // Reinhard, so ambient + directional above 1.0 does not clip flat.
    return vec4<f32>(lit / (vec3<f32>(1.0) + lit), in.base_color.a);
}
"#
);

/// Unlit ground grid drawn as a line list.
pub const GRID_SHADER: &str = concat!(
    frame_uniforms!(),
    r#"
struct GridVertex {
    @location(0) position: vec3<f32>,
    @location(1) color: vec4<f32>,
};

struct GridFragment {
    @builtin(position) clip: vec4<f32>,
    @location(0) color: vec4<f32>,
};

@vertex
fn vs_grid(v: GridVertex) -> GridFragment {
    var out: GridFragment;
    out.clip = frame.view_proj * vec4<f32>(v.position, 1.0);
    out.color = v.color;
    return out;
}

@fragment
fn fs_grid(in: GridFragment) -> @location(0) vec4<f32> {
    return in.color;
}
"#
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_shaders_share_frame_uniforms() {
        for source in [MESH_SHADER, GRID_SHADER] {
            assert!(source.contains("struct Frame"));
            assert!(source.contains("var<uniform> frame: Frame;"));
        }
        assert!(MESH_SHADER.contains("fn vs_main") && MESH_SHADER.contains("fn fs_main"));
        assert!(GRID_SHADER.contains("fn vs_grid") && GRID_SHADER.contains("fn fs_grid"));
    }
}
