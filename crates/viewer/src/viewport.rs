use orbitview_common::PixelSize;
use orbitview_render::{PerspectiveCamera, Renderable, Scene};

use crate::config::CameraConfig;

/// The rendering surface plus the camera that looks through it.
///
/// The camera aspect always equals the container's width over height: it is
/// set at initialization and updated synchronously on every resize.
#[derive(Debug)]
pub struct Viewport<R: Renderable> {
    camera: PerspectiveCamera,
    surface: R,
    size: PixelSize,
}

impl<R: Renderable> Viewport<R> {
    /// Create the camera for a container of `size` and size the surface to
    /// fill it.
    pub fn initialize(size: PixelSize, config: &CameraConfig, mut surface: R) -> Self {
        let mut camera = PerspectiveCamera::new(config.fov_degrees, size.aspect(), config.near, config.far);
        camera.position = config.position;
        surface.set_size(size);
        tracing::debug!(
            width = size.width,
            height = size.height,
            fov = config.fov_degrees,
            "viewport initialized"
        );
        Self {
            camera,
            surface,
            size,
        }
    }

    /// Recompute the projection for the new container and resize the
    /// surface before the next draw.
    pub fn resize(&mut self, size: PixelSize) {
        self.size = size;
        self.camera.aspect = size.aspect();
        self.camera.update_projection_matrix();
        self.surface.set_size(size);
        tracing::debug!(width = size.width, height = size.height, "viewport resized");
    }

    pub fn render(&mut self, scene: &Scene) {
        self.surface.render(scene, &self.camera);
    }

    pub fn size(&self) -> PixelSize {
        self.size
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut PerspectiveCamera {
        &mut self.camera
    }

    pub fn surface(&self) -> &R {
        &self.surface
    }

    /// Release the surface. Later renders are the surface's no-op.
    pub fn dispose(&mut self) {
        self.surface.dispose();
    }
}
