use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use glam::Vec2;
use orbitview_assets::GltfLoader;
use orbitview_common::PixelSize;
use orbitview_input::{InputEvent, PointerButton};
use orbitview_orbit::OrbitControls;
use orbitview_render_wgpu::WgpuSurface;
use orbitview_viewer::{Capabilities, Notifier, Viewer, ViewerConfig};
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(name = "orbitview-desktop", about = "Interactive 3D model viewer")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Viewer configuration (YAML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Model to show; overrides `model.source` from the config
    #[arg(long)]
    model: Option<String>,
}

/// Shows load failures in a blocking message box.
struct DialogNotifier;

impl Notifier for DialogNotifier {
    fn notify(&mut self, message: &str) {
        let _ = rfd::MessageDialog::new()
            .set_title("orbitview")
            .set_description(message)
            .set_buttons(rfd::MessageButtons::Ok)
            .set_level(rfd::MessageLevel::Error)
            .show();
    }
}

type DesktopViewer = Viewer<WgpuSurface, OrbitControls, GltfLoader, DialogNotifier>;

struct App {
    config: ViewerConfig,
    viewer: Option<DesktopViewer>,
    cursor: Vec2,
}

impl App {
    fn new(config: ViewerConfig) -> Self {
        Self {
            config,
            viewer: None,
            cursor: Vec2::ZERO,
        }
    }

    fn mount(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title("orbitview")
            .with_inner_size(PhysicalSize::new(1280u32, 720));
        let window = Arc::new(event_loop.create_window(attrs)?);
        let surface = WgpuSurface::new(window.clone())?;

        let size = window.inner_size();
        let container = PixelSize::new(size.width.max(1), size.height.max(1));
        let orbit = OrbitControls::new(self.config.orbit.settings());

        let viewer = Viewer::activate(
            container,
            self.config.clone(),
            Capabilities {
                surface,
                orbit,
                loader: GltfLoader::new(),
                notifier: DialogNotifier,
            },
        );

        window.request_redraw();
        self.viewer = Some(viewer);
        Ok(())
    }

    fn translate(&mut self, event: &WindowEvent) -> Option<InputEvent> {
        match *event {
            WindowEvent::Resized(size) if size.width > 0 && size.height > 0 => {
                Some(InputEvent::Resized(PixelSize::new(size.width, size.height)))
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = Vec2::new(position.x as f32, position.y as f32);
                Some(InputEvent::PointerMove {
                    position: self.cursor,
                })
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let button = match button {
                    MouseButton::Left => PointerButton::Primary,
                    MouseButton::Right => PointerButton::Secondary,
                    MouseButton::Middle => PointerButton::Middle,
                    _ => return None,
                };
                let position = self.cursor;
                Some(match state {
                    ElementState::Pressed => InputEvent::PointerDown { position, button },
                    ElementState::Released => InputEvent::PointerUp { position, button },
                })
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let y = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(p) => p.y as f32,
                };
                // winit reports scrolling away from the user as positive.
                Some(InputEvent::Wheel { delta: -y })
            }
            _ => None,
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.viewer.is_some() {
            return;
        }
        if let Err(e) = self.mount(event_loop) {
            tracing::error!("failed to start viewer: {e:#}");
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                if let Some(viewer) = &mut self.viewer {
                    viewer.deactivate();
                }
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                let Some(viewer) = &mut self.viewer else {
                    return;
                };
                if viewer.frame() {
                    viewer.viewport().surface().window().request_redraw();
                }
            }
            ref other => {
                if let Some(input) = self.translate(other) {
                    if let Some(viewer) = &mut self.viewer {
                        viewer.handle_event(&input);
                    }
                }
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(viewer) = &mut self.viewer {
            viewer.poll_load();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    let mut config = match &cli.config {
        Some(path) => ViewerConfig::load(path)?,
        None => ViewerConfig::default(),
    };
    if let Some(model) = cli.model {
        config.model.source = model;
    }

    tracing::info!(source = %config.model.source, "orbitview-desktop starting");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;

    Ok(())
}
