use orbitview_assets::Loadable;
use orbitview_common::{Color, PixelSize};
use orbitview_input::{InputEvent, ListenerId, ListenerKind, ListenerRegistry};
use orbitview_orbit::Orbitable;
use orbitview_render::{Light, PerspectiveCamera, Renderable, Scene};

use crate::config::{SceneConfig, ViewerConfig};
use crate::interaction::{InteractionController, PointerState};
use crate::loader::{AssetLoadFailure, AssetLoader, Model};
use crate::notify::Notifier;
use crate::render_loop::RenderLoop;
use crate::viewport::Viewport;

/// The injected capabilities a viewer is built from.
pub struct Capabilities<R, O, L, N> {
    pub surface: R,
    pub orbit: O,
    pub loader: L,
    pub notifier: N,
}

/// A mounted viewer instance.
///
/// Everything runs on the caller's event context: window events go through
/// [`Viewer::handle_event`], a completed load is picked up by
/// [`Viewer::poll_load`], and each display refresh calls [`Viewer::frame`].
/// [`Viewer::deactivate`] (or dropping the viewer) tears everything down.
pub struct Viewer<R: Renderable, O: Orbitable, L: Loadable, N: Notifier> {
    config: ViewerConfig,
    viewport: Viewport<R>,
    scene: Scene,
    orbit: O,
    controller: InteractionController,
    loader: AssetLoader<L>,
    model: Option<Model>,
    load_failure: Option<AssetLoadFailure>,
    render_loop: RenderLoop,
    listeners: ListenerRegistry,
    window_listeners: Vec<ListenerId>,
    notifier: N,
    active: bool,
}

impl<R: Renderable, O: Orbitable, L: Loadable, N: Notifier> Viewer<R, O, L, N> {
    /// Mount a viewer into a container of `container` size.
    ///
    /// Builds the scene, binds the orbit layer, registers the window
    /// listeners, requests the model and starts the render loop. The model
    /// appears later, when [`Viewer::poll_load`] sees the load complete.
    pub fn activate(
        container: PixelSize,
        config: ViewerConfig,
        capabilities: Capabilities<R, O, L, N>,
    ) -> Self {
        let Capabilities {
            surface,
            mut orbit,
            loader,
            notifier,
        } = capabilities;

        let mut viewport = Viewport::initialize(container, &config.camera, surface);
        let scene = build_scene(&config.scene);

        orbit.bind(viewport.camera(), container);
        orbit.set_target(config.orbit.initial_target);
        orbit.update(viewport.camera_mut());

        let mut listeners = ListenerRegistry::new();
        let window_listeners = ListenerKind::ALL
            .iter()
            .map(|kind| listeners.register(*kind))
            .collect();

        let mut loader = AssetLoader::new(loader, &config.model);
        loader.request(&config.model.source);

        let mut render_loop = RenderLoop::new();
        render_loop.start();

        tracing::info!(
            width = container.width,
            height = container.height,
            source = %config.model.source,
            "viewer activated"
        );

        Self {
            controller: InteractionController::new(config.interaction.drag_sensitivity),
            config,
            viewport,
            scene,
            orbit,
            loader,
            model: None,
            load_failure: None,
            render_loop,
            listeners,
            window_listeners,
            notifier,
            active: true,
        }
    }

    /// Dispatch a window event.
    ///
    /// Resize and pointer events reach the viewer through its window
    /// listeners, so a release outside the container still ends a drag.
    /// Pointer and wheel events are also forwarded to the orbit layer.
    pub fn handle_event(&mut self, event: &InputEvent) {
        if !self.active {
            return;
        }
        if let Some(kind) = event.listener_kind() {
            if self.listeners.is_listening(kind) {
                match *event {
                    InputEvent::Resized(size) => self.resize(size),
                    _ => {
                        self.controller.handle_event(event);
                    }
                }
            }
        }
        if !matches!(event, InputEvent::Resized(_)) {
            self.orbit.handle_input(event);
        }
    }

    fn resize(&mut self, size: PixelSize) {
        self.viewport.resize(size);
        self.orbit.set_viewport_size(size);
    }

    /// Pick up a completed load, if any. Returns true when the load finished
    /// during this call, successfully or not.
    ///
    /// On success the model is attached and the orbit pivot moves to its
    /// center. On failure the user is notified once and the scene keeps
    /// running without a model.
    pub fn poll_load(&mut self) -> bool {
        if !self.active {
            return false;
        }
        match self.loader.poll(&mut self.scene) {
            None => false,
            Some(Ok(model)) => {
                self.controller
                    .attach_model(&model, &mut self.orbit, self.viewport.camera_mut());
                self.model = Some(model);
                true
            }
            Some(Err(failure)) => {
                tracing::error!(
                    location = %failure.location,
                    diagnostic = %failure.diagnostic,
                    "Error loading model"
                );
                self.notifier.notify(&failure.to_string());
                self.load_failure = Some(failure);
                true
            }
        }
    }

    /// Run one frame. Returns whether the loop is still running.
    pub fn frame(&mut self) -> bool {
        if !self.active {
            return false;
        }
        self.render_loop.frame(
            &mut self.controller,
            &mut self.orbit,
            &mut self.viewport,
            &mut self.scene,
        );
        self.render_loop.is_running()
    }

    /// Tear the viewer down. Idempotent.
    ///
    /// Removes the window listeners, disposes the orbit layer and the
    /// surface, stops the loop, detaches the model and abandons a load
    /// still in flight.
    pub fn deactivate(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;

        for id in self.window_listeners.drain(..) {
            if let Err(e) = self.listeners.remove(id) {
                tracing::warn!("window listener cleanup: {e}");
            }
        }
        self.orbit.dispose();
        self.viewport.dispose();
        self.render_loop.stop();

        self.controller.detach_model();
        if let Some(model) = self.model.take() {
            self.scene.remove(model.node);
        }
        if self.loader.abandon() {
            tracing::info!("discarding model load still in flight");
        }
        tracing::info!(frames = self.render_loop.frames(), "viewer deactivated");
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_running(&self) -> bool {
        self.render_loop.is_running()
    }

    pub fn frames(&self) -> u64 {
        self.render_loop.frames()
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        self.viewport.camera()
    }

    pub fn viewport(&self) -> &Viewport<R> {
        &self.viewport
    }

    pub fn orbit(&self) -> &O {
        &self.orbit
    }

    pub fn pointer(&self) -> &PointerState {
        self.controller.pointer()
    }

    pub fn model(&self) -> Option<&Model> {
        self.model.as_ref()
    }

    pub fn load_failure(&self) -> Option<&AssetLoadFailure> {
        self.load_failure.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loader.is_pending()
    }

    /// Window listeners still registered.
    pub fn listener_count(&self) -> usize {
        self.listeners.active_count()
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }
}

impl<R: Renderable, O: Orbitable, L: Loadable, N: Notifier> Drop for Viewer<R, O, L, N> {
    fn drop(&mut self) {
        self.deactivate();
    }
}

fn build_scene(config: &SceneConfig) -> Scene {
    let mut scene = Scene::new();
    scene.background = Color::from_hex(config.background);
    scene.add_light(Light::Ambient {
        color: Color::WHITE,
        intensity: config.ambient_intensity,
    });
    scene.add_light(Light::Directional {
        color: Color::WHITE,
        intensity: config.directional_intensity,
        position: config.directional_position,
    });
    scene
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Vec2, Vec3};
    use orbitview_assets::{MemoryLoader, ModelGraph};
    use orbitview_input::PointerButton;
    use orbitview_orbit::OrbitControls;
    use orbitview_render::DebugTextRenderer;

    #[derive(Default)]
    struct Recorded(Vec<String>);

    impl Notifier for Recorded {
        fn notify(&mut self, message: &str) {
            self.0.push(message.to_string());
        }
    }

    type TestViewer = Viewer<DebugTextRenderer, OrbitControls, MemoryLoader, Recorded>;

    fn viewer(loader: MemoryLoader) -> TestViewer {
        let config = ViewerConfig::from_yaml_str("model:\n  source: mem://model\n").unwrap();
        Viewer::activate(
            PixelSize::new(800, 600),
            config,
            Capabilities {
                surface: DebugTextRenderer::new(),
                orbit: OrbitControls::new(ViewerConfig::default().orbit.settings()),
                loader,
                notifier: Recorded::default(),
            },
        )
    }

    #[test]
    fn activation_sets_up_scene_and_listeners() {
        let v = viewer(MemoryLoader::new());
        assert!(v.is_active());
        assert!(v.is_running());
        assert!(v.is_loading());
        assert_eq!(v.listener_count(), 4);
        assert_eq!(v.scene().lights().len(), 2);
        assert_eq!(v.scene().background, Color::from_hex(0xeeeeee));
        assert!(v.orbit().is_bound());
        assert_eq!(v.orbit().target(), Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(v.camera().target, Vec3::new(0.0, 1.0, 0.0));
        assert!(v.model().is_none());
    }

    #[test]
    fn successful_load_attaches_one_model() {
        let graph = ModelGraph::cuboid("crate", Vec3::new(0.0, 4.0, 0.0), Vec3::ONE);
        let mut v = viewer(MemoryLoader::new().with_model("mem://model", graph));

        assert!(v.poll_load());
        assert!(!v.poll_load());

        let model = v.model().unwrap();
        assert_eq!(model.name, "crate");
        assert_eq!(v.scene().node_count(), 1);
        assert!((v.orbit().target() - Vec3::new(0.0, 4.0, 0.0)).length() < 1e-6);
        assert!(v.notifier().0.is_empty());
    }

    #[test]
    fn failed_load_notifies_once() {
        let mut v = viewer(MemoryLoader::new().with_failure("mem://model", "bad magic"));
        assert!(v.poll_load());
        assert!(!v.poll_load());
        assert_eq!(v.notifier().0, vec!["Error loading model: bad magic".to_string()]);
        assert_eq!(v.scene().node_count(), 0);
        assert!(v.frame());
    }

    #[test]
    fn deactivate_is_idempotent_and_releases_everything() {
        let graph = ModelGraph::cuboid("crate", Vec3::ZERO, Vec3::ONE);
        let mut v = viewer(MemoryLoader::new().with_model("mem://model", graph));
        v.poll_load();
        v.frame();

        v.deactivate();
        v.deactivate();

        assert!(!v.is_active());
        assert!(!v.is_running());
        assert_eq!(v.listener_count(), 0);
        assert!(v.orbit().is_disposed());
        assert!(!v.orbit().is_bound());
        assert!(v.viewport().surface().is_disposed());
        assert!(v.model().is_none());
        assert_eq!(v.scene().node_count(), 0);
        assert!(!v.frame());
    }

    #[test]
    fn events_after_deactivation_are_ignored() {
        let mut v = viewer(MemoryLoader::new());
        v.deactivate();
        v.handle_event(&InputEvent::PointerDown {
            position: Vec2::ZERO,
            button: PointerButton::Primary,
        });
        v.handle_event(&InputEvent::Resized(PixelSize::new(10, 10)));
        assert!(!v.pointer().dragging());
        assert_eq!(v.viewport().size(), PixelSize::new(800, 600));
    }
}
