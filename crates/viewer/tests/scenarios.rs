//! End-to-end viewer behaviour through the public API, with a headless
//! surface and in-process loaders.

use std::cell::RefCell;
use std::f32::consts::FRAC_PI_2;
use std::io::Write;
use std::rc::Rc;

use glam::{Vec2, Vec3};
use orbitview_assets::{GltfLoader, LoadHandle, LoadSender, Loadable, MemoryLoader, ModelGraph};
use orbitview_common::PixelSize;
use orbitview_input::{InputEvent, PointerButton};
use orbitview_orbit::{OrbitControls, Orbitable};
use orbitview_render::DebugTextRenderer;
use orbitview_viewer::{Capabilities, DragPhase, Notifier, Viewer, ViewerConfig};

#[derive(Default)]
struct Recorded(Vec<String>);

impl Notifier for Recorded {
    fn notify(&mut self, message: &str) {
        self.0.push(message.to_string());
    }
}

/// Loader whose completion the test triggers by hand.
#[derive(Clone, Default)]
struct ManualLoader {
    sender: Rc<RefCell<Option<LoadSender>>>,
}

impl ManualLoader {
    fn complete(&self, result: Result<ModelGraph, orbitview_assets::LoadError>) {
        let sender = self.sender.borrow_mut().take().expect("no load requested");
        sender.finish(result);
    }
}

impl Loadable for ManualLoader {
    fn load(&self, location: &str) -> LoadHandle {
        let (sender, handle) = LoadHandle::channel(location);
        *self.sender.borrow_mut() = Some(sender);
        handle
    }
}

const SOURCE: &str = "mem://model";

fn config() -> ViewerConfig {
    let mut config = ViewerConfig::default();
    config.model.source = SOURCE.into();
    config
}

fn mount<L: Loadable>(loader: L) -> Viewer<DebugTextRenderer, OrbitControls, L, Recorded> {
    let config = config();
    let orbit = OrbitControls::new(config.orbit.settings());
    Viewer::activate(
        PixelSize::new(800, 600),
        config,
        Capabilities {
            surface: DebugTextRenderer::new(),
            orbit,
            loader,
            notifier: Recorded::default(),
        },
    )
}

fn mount_with_box(center: Vec3) -> Viewer<DebugTextRenderer, OrbitControls, MemoryLoader, Recorded> {
    let graph = ModelGraph::cuboid("crate", center, Vec3::new(1.0, 1.5, 2.0));
    let mut viewer = mount(MemoryLoader::new().with_model(SOURCE, graph));
    assert!(viewer.poll_load());
    viewer
}

fn down(x: f32, y: f32) -> InputEvent {
    InputEvent::PointerDown {
        position: Vec2::new(x, y),
        button: PointerButton::Primary,
    }
}

fn moved(x: f32, y: f32) -> InputEvent {
    InputEvent::PointerMove {
        position: Vec2::new(x, y),
    }
}

fn up(x: f32, y: f32) -> InputEvent {
    InputEvent::PointerUp {
        position: Vec2::new(x, y),
        button: PointerButton::Primary,
    }
}

fn model_rotation<L: Loadable>(viewer: &Viewer<DebugTextRenderer, OrbitControls, L, Recorded>) -> Vec3 {
    let id = viewer.model().expect("model attached").node;
    viewer.scene().get(id).expect("model node").transform.rotation
}

#[test]
fn camera_aspect_tracks_container() {
    let mut viewer = mount(MemoryLoader::new());
    assert!((viewer.camera().aspect - 800.0 / 600.0).abs() < 1e-6);

    for (w, h) in [(1024, 768), (300, 900), (1920, 1080)] {
        viewer.handle_event(&InputEvent::Resized(PixelSize::new(w, h)));
        assert!((viewer.camera().aspect - w as f32 / h as f32).abs() < 1e-6);
        assert_eq!(viewer.viewport().surface().size(), Some(PixelSize::new(w, h)));
    }

    viewer.frame();
    let frame = viewer.viewport().surface().last_frame().unwrap();
    assert!(frame.contains("1920x1080"));
}

#[test]
fn loaded_model_is_normalized_and_becomes_orbit_pivot() {
    let center = Vec3::new(2.0, 1.0, -3.0);
    let viewer = mount_with_box(center);

    let model = viewer.model().unwrap();
    assert!((model.center - center).length() < 1e-5);
    assert!((model.position - Vec3::new(-2.0, -0.5, 3.0)).length() < 1e-5);

    let node = viewer.scene().get(model.node).unwrap();
    assert_eq!(node.transform.scale, Vec3::splat(0.5));
    assert!((viewer.orbit().target() - center).length() < 1e-5);
    assert!((viewer.camera().target - center).length() < 1e-5);
}

#[test]
fn drag_scenario_rotates_model() {
    let mut viewer = mount_with_box(Vec3::ZERO);

    viewer.handle_event(&down(100.0, 100.0));
    viewer.handle_event(&moved(110.0, 125.0));
    viewer.frame();

    let r = model_rotation(&viewer);
    assert!((r.y - 0.10).abs() < 1e-5);
    assert!((r.x - 0.25).abs() < 1e-5);
    assert_eq!(viewer.pointer().previous(), Vec2::new(110.0, 125.0));

    viewer.handle_event(&up(110.0, 125.0));
    viewer.handle_event(&moved(400.0, 400.0));
    viewer.frame();
    viewer.frame();

    let after = model_rotation(&viewer);
    assert!((after - r).length() < 1e-6);
}

#[test]
fn tilt_never_leaves_quarter_turn() {
    let mut viewer = mount_with_box(Vec3::ZERO);

    viewer.handle_event(&down(0.0, 0.0));
    let mut y = 0.0;
    for _ in 0..20 {
        y += 37.0;
        viewer.handle_event(&moved(0.0, y));
        viewer.frame();
        assert!(model_rotation(&viewer).x.abs() <= FRAC_PI_2 + 1e-6);
    }
    assert!((model_rotation(&viewer).x - FRAC_PI_2).abs() < 1e-6);

    for _ in 0..40 {
        y -= 50.0;
        viewer.handle_event(&moved(0.0, y));
        viewer.frame();
        assert!(model_rotation(&viewer).x.abs() <= FRAC_PI_2 + 1e-6);
    }
    assert!((model_rotation(&viewer).x + FRAC_PI_2).abs() < 1e-6);
}

#[test]
fn dragging_follows_last_unmatched_press() {
    let mut viewer = mount(MemoryLoader::new());
    let script = [
        (moved(5.0, 5.0), DragPhase::Idle),
        (down(1.0, 1.0), DragPhase::Dragging),
        (moved(2.0, 2.0), DragPhase::Dragging),
        (InputEvent::Wheel { delta: 1.0 }, DragPhase::Dragging),
        (up(2.0, 2.0), DragPhase::Idle),
        (up(2.0, 2.0), DragPhase::Idle),
        (down(3.0, 3.0), DragPhase::Dragging),
        (down(4.0, 4.0), DragPhase::Dragging),
        (up(4.0, 4.0), DragPhase::Idle),
    ];
    for (event, phase) in script {
        viewer.handle_event(&event);
        assert_eq!(viewer.pointer().phase(), phase, "after {event:?}");
    }
}

#[test]
fn release_outside_viewport_ends_drag() {
    let mut viewer = mount_with_box(Vec3::ZERO);
    viewer.handle_event(&down(400.0, 300.0));
    viewer.handle_event(&moved(-120.0, 900.0));
    viewer.handle_event(&up(-120.0, 900.0));
    assert!(!viewer.pointer().dragging());
}

#[test]
fn drag_before_model_arrives_is_harmless() {
    let loader = ManualLoader::default();
    let mut viewer = mount(loader.clone());

    viewer.handle_event(&down(10.0, 10.0));
    viewer.handle_event(&moved(50.0, 10.0));
    assert!(viewer.frame());
    assert!(viewer.model().is_none());

    loader.complete(Ok(ModelGraph::cuboid("late", Vec3::ZERO, Vec3::ONE)));
    assert!(viewer.poll_load());
    viewer.frame();
    // Movement made before the model existed is applied on its first frame.
    assert!((model_rotation(&viewer).y - 0.40).abs() < 1e-5);
}

#[test]
fn failed_load_notifies_once_and_orbit_still_works() {
    let mut viewer = mount(MemoryLoader::new().with_failure(SOURCE, "unexpected EOF"));

    assert!(viewer.poll_load());
    for _ in 0..5 {
        assert!(!viewer.poll_load());
        viewer.frame();
    }
    assert_eq!(viewer.notifier().0, vec!["Error loading model: unexpected EOF".to_string()]);
    assert!(viewer.model().is_none());
    assert_eq!(viewer.scene().node_count(), 0);
    assert!(viewer.load_failure().is_some());

    let before = viewer.camera().position.distance(viewer.orbit().target());
    viewer.handle_event(&InputEvent::Wheel { delta: 1.0 });
    viewer.frame();
    let after = viewer.camera().position.distance(viewer.orbit().target());
    assert!(after > before);
    assert!(viewer.is_running());
}

#[test]
fn deactivation_releases_all_listeners() {
    let mut viewer = mount_with_box(Vec3::ZERO);
    assert_eq!(viewer.listener_count(), 4);
    viewer.frame();
    let drawn = viewer.viewport().surface().frames();

    viewer.deactivate();

    assert_eq!(viewer.listener_count(), 0);
    assert!(!viewer.is_running());
    assert!(viewer.orbit().is_disposed());
    assert!(viewer.viewport().surface().is_disposed());
    assert!(!viewer.frame());
    assert_eq!(viewer.viewport().surface().frames(), drawn);
}

#[test]
fn completion_after_deactivation_is_discarded() {
    let loader = ManualLoader::default();
    let mut viewer = mount(loader.clone());
    assert!(viewer.is_loading());

    viewer.deactivate();
    loader.complete(Ok(ModelGraph::cuboid("late", Vec3::ZERO, Vec3::ONE)));

    assert!(!viewer.poll_load());
    assert!(viewer.model().is_none());
    assert_eq!(viewer.scene().node_count(), 0);
    assert!(viewer.notifier().0.is_empty());
}

#[test]
fn frame_applies_drag_before_drawing() {
    let mut viewer = mount_with_box(Vec3::ZERO);
    viewer.handle_event(&down(0.0, 0.0));
    viewer.handle_event(&moved(0.0, 50.0));
    viewer.frame();

    let frame = viewer.viewport().surface().last_frame().unwrap();
    assert!(frame.contains("rot=(0.50"), "{frame}");
}

#[test]
fn gltf_from_disk_end_to_end() {
    const TRIANGLE: &str = r#"{
        "asset": { "version": "2.0" },
        "scenes": [ { "nodes": [0] } ],
        "nodes": [ { "mesh": 0 } ],
        "meshes": [ { "primitives": [ { "attributes": { "POSITION": 0 } } ] } ],
        "buffers": [ {
            "byteLength": 36,
            "uri": "data:application/octet-stream;base64,AAAAAAAAAAAAAAAAAAAAQAAAAAAAAAAAAAAAAAAAgEAAAADA"
        } ],
        "bufferViews": [ { "buffer": 0, "byteLength": 36 } ],
        "accessors": [ {
            "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
            "min": [0.0, 0.0, -2.0], "max": [2.0, 4.0, 0.0]
        } ]
    }"#;
    let mut file = tempfile::Builder::new().suffix(".gltf").tempfile().unwrap();
    file.write_all(TRIANGLE.as_bytes()).unwrap();

    let mut config = config();
    config.model.source = file.path().display().to_string();
    let orbit = OrbitControls::new(config.orbit.settings());
    let mut viewer = Viewer::activate(
        PixelSize::new(640, 480),
        config,
        Capabilities {
            surface: DebugTextRenderer::new(),
            orbit,
            loader: GltfLoader::new(),
            notifier: Recorded::default(),
        },
    );

    let mut polls = 0;
    while !viewer.poll_load() {
        polls += 1;
        assert!(polls < 1000, "load never completed");
        std::thread::sleep(std::time::Duration::from_millis(5));
    }
    assert!(viewer.notifier().0.is_empty(), "{:?}", viewer.notifier().0);
    let model = viewer.model().unwrap();
    assert!((model.center - Vec3::new(1.0, 2.0, -1.0)).length() < 1e-5);
}
