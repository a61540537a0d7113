use orbitview_common::PixelSize;

use crate::camera::PerspectiveCamera;
use crate::scene::Scene;

/// Rendering surface capability. All backends implement this trait.
///
/// The surface reads the scene and a camera, then draws. It never mutates
/// either: model and camera transforms are owned by the viewer.
pub trait Renderable {
    /// Resize the output to match the container.
    fn set_size(&mut self, size: PixelSize);

    /// Draw one frame of `scene` through `camera`.
    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera);

    /// Release backend resources. Safe to call more than once.
    fn dispose(&mut self);
}

/// Debug text renderer: a headless rendering surface.
///
/// Each draw produces a human-readable dump of the scene and camera. Useful
/// for CLI output, logging, and exercising the viewer without a GPU.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    size: Option<PixelSize>,
    frames: u64,
    last_frame: Option<String>,
    disposed: bool,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn size(&self) -> Option<PixelSize> {
        self.size
    }

    /// Number of frames drawn so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn last_frame(&self) -> Option<&str> {
        self.last_frame.as_deref()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

impl Renderable for DebugTextRenderer {
    fn set_size(&mut self, size: PixelSize) {
        if self.disposed {
            return;
        }
        self.size = Some(size);
    }

    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) {
        if self.disposed {
            return;
        }
        self.frames += 1;

        let mut out = String::new();
        out.push_str(&format!(
            "=== Frame {} ({}) ===\n",
            self.frames,
            self.size
                .map(|s| format!("{}x{}", s.width, s.height))
                .unwrap_or_else(|| "unsized".into())
        ));
        out.push_str(&format!(
            "Camera: eye=({:.2}, {:.2}, {:.2}) target=({:.2}, {:.2}, {:.2}) fov={:.0} aspect={:.3}\n",
            camera.position.x,
            camera.position.y,
            camera.position.z,
            camera.target.x,
            camera.target.y,
            camera.target.z,
            camera.fov_degrees,
            camera.aspect
        ));
        out.push_str(&format!(
            "Nodes: {}  Lights: {}\n",
            scene.node_count(),
            scene.lights().len()
        ));

        for (id, node) in scene.nodes() {
            let t = &node.transform;
            out.push_str(&format!(
                "  [{}] {} pos=({:.2}, {:.2}, {:.2}) rot=({:.2}, {:.2}, {:.2}) scale=({:.2}, {:.2}, {:.2}) meshes={}\n",
                id.short(),
                node.name,
                t.position.x,
                t.position.y,
                t.position.z,
                t.rotation.x,
                t.rotation.y,
                t.rotation.z,
                t.scale.x,
                t.scale.y,
                t.scale.z,
                node.meshes.len()
            ));
        }

        tracing::trace!(frame = self.frames, "debug frame rendered");
        self.last_frame = Some(out);
    }

    fn dispose(&mut self) {
        self.disposed = true;
        self.last_frame = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::SceneNode;
    use glam::Vec3;

    #[test]
    fn debug_renderer_empty_scene() {
        let scene = Scene::new();
        let camera = PerspectiveCamera::default();
        let mut renderer = DebugTextRenderer::new();
        renderer.set_size(PixelSize::new(640, 480));
        renderer.render(&scene, &camera);

        let output = renderer.last_frame().unwrap();
        assert!(output.contains("Frame 1 (640x480)"));
        assert!(output.contains("Nodes: 0"));
        assert!(output.contains("fov=75"));
    }

    #[test]
    fn debug_renderer_with_nodes() {
        let mut scene = Scene::new();
        let mut node = SceneNode::new("model", vec![]);
        node.transform.position = Vec3::new(1.0, 2.0, 3.0);
        scene.add(node);

        let mut renderer = DebugTextRenderer::new();
        renderer.render(&scene, &PerspectiveCamera::default());

        let output = renderer.last_frame().unwrap();
        assert!(output.contains("Nodes: 1"));
        assert!(output.contains("pos=(1.00, 2.00, 3.00)"));
    }

    #[test]
    fn disposed_renderer_ignores_draws() {
        let mut renderer = DebugTextRenderer::new();
        renderer.dispose();
        renderer.dispose();
        renderer.render(&Scene::new(), &PerspectiveCamera::default());
        assert_eq!(renderer.frames(), 0);
        assert!(renderer.is_disposed());
    }
}
