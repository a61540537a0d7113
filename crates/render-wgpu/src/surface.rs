use std::sync::Arc;

use orbitview_common::PixelSize;
use orbitview_render::{PerspectiveCamera, Renderable, Scene};
use winit::window::Window;

use crate::gpu::MeshRenderer;

#[derive(Debug, thiserror::Error)]
pub enum SurfaceError {
    #[error("failed to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),
    #[error("no compatible GPU adapter found")]
    NoAdapter,
    #[error("failed to create device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
    #[error("surface reports no supported formats")]
    NoSurfaceFormat,
}

/// Live GPU objects; dropped as a unit on dispose.
struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: MeshRenderer,
}

/// Rendering surface presenting into a winit window.
pub struct WgpuSurface {
    window: Arc<Window>,
    state: Option<GpuState>,
}

impl WgpuSurface {
    /// Create the device and configure the window surface at the window's
    /// current inner size. Blocks on adapter and device requests.
    pub fn new(window: Arc<Window>) -> Result<Self, SurfaceError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or(SurfaceError::NoAdapter)?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("orbitview_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or(SurfaceError::NoSurfaceFormat)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let renderer = MeshRenderer::new(&device, surface_format, config.width, config.height);

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );

        Ok(Self {
            window,
            state: Some(GpuState {
                surface,
                device,
                queue,
                config,
                renderer,
            }),
        })
    }

    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }

    pub fn is_disposed(&self) -> bool {
        self.state.is_none()
    }
}

/// Acquire the next frame. A lost or outdated surface is reconfigured and
/// acquired once more before giving up on the frame.
fn acquire_frame<T>(
    mut acquire: impl FnMut() -> Result<T, wgpu::SurfaceError>,
    mut reconfigure: impl FnMut(),
) -> Result<T, wgpu::SurfaceError> {
    match acquire() {
        Err(e @ (wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)) => {
            tracing::debug!(error = %e, "reconfiguring surface");
            reconfigure();
            acquire()
        }
        other => other,
    }
}

impl Renderable for WgpuSurface {
    fn set_size(&mut self, size: PixelSize) {
        let Some(state) = &mut self.state else {
            return;
        };
        state.config.width = size.width.max(1);
        state.config.height = size.height.max(1);
        state.surface.configure(&state.device, &state.config);
        state
            .renderer
            .resize(&state.device, state.config.width, state.config.height);
        tracing::debug!(width = size.width, height = size.height, "surface resized");
    }

    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) {
        let Some(state) = &mut self.state else {
            return;
        };

        let surface = &state.surface;
        let output = match acquire_frame(
            || surface.get_current_texture(),
            || surface.configure(&state.device, &state.config),
        ) {
            Ok(t) => t,
            Err(e) => {
                tracing::error!("surface error: {e}");
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        state
            .renderer
            .render(&state.device, &state.queue, &view, scene, camera);

        self.window.pre_present_notify();
        output.present();
    }

    fn dispose(&mut self) {
        if let Some(mut state) = self.state.take() {
            let resident = state.renderer.resident_meshes();
            state.renderer.clear();
            tracing::info!(resident, "GPU surface disposed");
        }
    }
}
