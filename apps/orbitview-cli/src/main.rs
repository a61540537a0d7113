use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use glam::{Vec2, Vec3};
use orbitview_assets::{GltfLoader, Loadable, MemoryLoader, ModelGraph};
use orbitview_common::PixelSize;
use orbitview_input::{InputEvent, PointerButton};
use orbitview_orbit::OrbitControls;
use orbitview_render::DebugTextRenderer;
use orbitview_viewer::{Capabilities, LogNotifier, Viewer, ViewerConfig};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "orbitview-cli", about = "CLI tool for orbitview operations")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Viewer configuration (YAML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Decode a glTF model and report how the viewer would place it
    Inspect {
        /// Path, file:// or http(s):// URL
        model: String,
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run the viewer headless and script a drag
    Simulate {
        /// Model to load; a built-in box is used when omitted
        #[arg(short, long)]
        model: Option<String>,
        /// Frames to run after the drag is released
        #[arg(short, long, default_value = "30")]
        frames: u32,
        /// Horizontal drag distance in pixels
        #[arg(long, default_value = "10", allow_hyphen_values = true)]
        dx: f32,
        /// Vertical drag distance in pixels
        #[arg(long, default_value = "25", allow_hyphen_values = true)]
        dy: f32,
    },
}

#[derive(Serialize)]
struct ModelSummary {
    name: String,
    meshes: usize,
    vertices: usize,
    triangles: usize,
    bounds_min: [f32; 3],
    bounds_max: [f32; 3],
    center: [f32; 3],
    placed_position: [f32; 3],
    placed_scale: f32,
}

impl ModelSummary {
    fn new(graph: &ModelGraph, config: &ViewerConfig) -> Self {
        let bounds = graph.bounds();
        let center = bounds.center();
        let placed = -center + Vec3::new(0.0, config.model.vertical_offset, 0.0);
        Self {
            name: graph.name.clone(),
            meshes: graph.meshes.len(),
            vertices: graph.vertex_count(),
            triangles: graph.triangle_count(),
            bounds_min: bounds.min.to_array(),
            bounds_max: bounds.max.to_array(),
            center: center.to_array(),
            placed_position: placed.to_array(),
            placed_scale: config.model.scale,
        }
    }
}

const BUILTIN_BOX: &str = "builtin://box";

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = match &cli.config {
        Some(path) => ViewerConfig::load(path)?,
        None => ViewerConfig::default(),
    };

    match cli.command {
        Commands::Info => {
            println!("orbitview-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("render: {}", orbitview_render::crate_info());
            println!("assets: {}", orbitview_assets::crate_info());
            println!("viewer: {}", orbitview_viewer::crate_info());
            println!("model source: {}", config.model.source);
        }
        Commands::Inspect { model, json } => {
            let graph = GltfLoader::new()
                .load(&model)
                .wait()
                .with_context(|| format!("failed to load {model}"))?;
            let summary = ModelSummary::new(&graph, &config);
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("Model: {}", summary.name);
                println!(
                    "  meshes={} vertices={} triangles={}",
                    summary.meshes, summary.vertices, summary.triangles
                );
                println!(
                    "  bounds=({:?} .. {:?}) center={:?}",
                    summary.bounds_min, summary.bounds_max, summary.center
                );
                println!(
                    "  placed at {:?} with scale {}",
                    summary.placed_position, summary.placed_scale
                );
            }
        }
        Commands::Simulate {
            model,
            frames,
            dx,
            dy,
        } => match model {
            Some(location) => {
                let mut config = config;
                config.model.source = location;
                simulate(config, GltfLoader::new(), frames, Vec2::new(dx, dy))?;
            }
            None => {
                let mut config = config;
                config.model.source = BUILTIN_BOX.into();
                let loader = MemoryLoader::new().with_model(
                    BUILTIN_BOX,
                    ModelGraph::cuboid("box", Vec3::new(0.0, 1.0, 0.0), Vec3::ONE),
                );
                simulate(config, loader, frames, Vec2::new(dx, dy))?;
            }
        },
    }

    Ok(())
}

/// Mount a headless viewer, wait for the model, drag across it, and print
/// the last frame.
fn simulate<L: Loadable>(
    config: ViewerConfig,
    loader: L,
    frames: u32,
    drag: Vec2,
) -> anyhow::Result<()> {
    let orbit = OrbitControls::new(config.orbit.settings());
    let mut viewer = Viewer::activate(
        PixelSize::new(800, 600),
        config,
        Capabilities {
            surface: DebugTextRenderer::new(),
            orbit,
            loader,
            notifier: LogNotifier,
        },
    );

    while viewer.is_loading() {
        if !viewer.poll_load() {
            std::thread::sleep(std::time::Duration::from_millis(5));
        }
    }
    if let Some(failure) = viewer.load_failure() {
        println!("{failure}");
    }

    let start = Vec2::new(400.0, 300.0);
    viewer.handle_event(&InputEvent::PointerDown {
        position: start,
        button: PointerButton::Primary,
    });
    viewer.handle_event(&InputEvent::PointerMove {
        position: start + drag,
    });
    viewer.frame();
    viewer.handle_event(&InputEvent::PointerUp {
        position: start + drag,
        button: PointerButton::Primary,
    });
    for _ in 0..frames {
        viewer.frame();
    }

    if let Some(model) = viewer.model() {
        let node = viewer
            .scene()
            .get(model.node)
            .context("model node missing from scene")?;
        println!(
            "Model '{}' rotation: x={:.3} y={:.3}",
            model.name, node.transform.rotation.x, node.transform.rotation.y
        );
    }
    if let Some(frame) = viewer.viewport().surface().last_frame() {
        print!("{frame}");
    }

    viewer.deactivate();
    println!("Listeners after deactivate: {}", viewer.listener_count());
    Ok(())
}
