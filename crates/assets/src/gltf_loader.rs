use std::path::Path;

use glam::Mat4;
use orbitview_common::{Color, Mesh};
use reqwest::blocking::Client;
use url::Url;

use crate::remote;
use crate::{
    LoadError, LoadHandle, LoadSender, Loadable, ModelGraph, ModelSource, resolve_location,
};

/// glTF 2.0 loader (`.gltf` with external or embedded buffers, and `.glb`)
/// for local files and `http(s)` URLs.
///
/// Each load runs on its own worker thread. There is no cancellation: a
/// worker whose handle was dropped still runs to completion and its result
/// is discarded.
#[derive(Debug, Clone, Default)]
pub struct GltfLoader {
    client: Option<Client>,
}

impl GltfLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `client` for remote fetches instead of building one per load.
    pub fn with_client(client: Client) -> Self {
        Self {
            client: Some(client),
        }
    }

    /// Load synchronously from a local path.
    pub fn load_path(path: &Path) -> Result<ModelGraph, LoadError> {
        let bytes = read_local(path)?;
        decode_local(&bytes, path)
    }

    /// Decode an in-memory glTF/GLB whose buffers are embedded.
    pub fn load_slice(data: &[u8], name: &str) -> Result<ModelGraph, LoadError> {
        let (document, buffers, _images) = gltf::import_slice(data)?;
        let buffers: Vec<Vec<u8>> = buffers.into_iter().map(|b| b.0).collect();
        graph_from_document(&document, &buffers, name)
    }
}

impl Loadable for GltfLoader {
    fn load(&self, location: &str) -> LoadHandle {
        let (sender, handle) = LoadHandle::channel(location);

        let source = match resolve_location(location) {
            Ok(source) => source,
            Err(e) => {
                sender.finish(Err(e));
                return handle;
            }
        };

        tracing::debug!(?source, "spawning glTF load");
        let client = self.client.clone();
        let spawned = std::thread::Builder::new()
            .name("gltf-loader".into())
            .spawn(move || {
                let result = match source {
                    ModelSource::Local(path) => run_local(&path, &sender),
                    ModelSource::Remote(url) => run_remote(client, &url, &sender),
                };
                if let Ok(graph) = &result {
                    tracing::debug!(
                        name = %graph.name,
                        meshes = graph.meshes.len(),
                        triangles = graph.triangle_count(),
                        "glTF decoded"
                    );
                }
                sender.finish(result);
            });
        if let Err(e) = spawned {
            // The sender moved into the failed closure and was dropped, so
            // the handle reports WorkerLost on its next poll.
            tracing::error!("failed to spawn loader thread: {e}");
        }
        handle
    }
}

fn run_local(path: &Path, sender: &LoadSender) -> Result<ModelGraph, LoadError> {
    let bytes = read_local(path)?;
    let total = bytes.len() as u64;
    sender.progress(total, Some(total));
    decode_local(&bytes, path)
}

fn run_remote(
    client: Option<Client>,
    url: &Url,
    sender: &LoadSender,
) -> Result<ModelGraph, LoadError> {
    let client = match client {
        Some(client) => client,
        None => remote::default_client()?,
    };
    let bytes = remote::fetch(&client, url, |loaded, total| sender.progress(loaded, total))?;
    let gltf::Gltf { document, blob } = gltf::Gltf::from_slice(&bytes)?;
    let buffers = remote::fetch_buffers(&client, &document, url, blob)?;
    graph_from_document(&document, &buffers, &remote_name(url))
}

fn read_local(path: &Path) -> Result<Vec<u8>, LoadError> {
    std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// External buffer URIs resolve against the file's directory.
fn decode_local(bytes: &[u8], path: &Path) -> Result<ModelGraph, LoadError> {
    let gltf::Gltf { document, blob } = gltf::Gltf::from_slice(bytes)?;
    let buffers = gltf::import_buffers(&document, path.parent(), blob)?;
    let buffers: Vec<Vec<u8>> = buffers.into_iter().map(|b| b.0).collect();
    graph_from_document(&document, &buffers, &model_name(path))
}

fn model_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "model".into())
}

fn remote_name(url: &Url) -> String {
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|file| !file.is_empty())
        .map(|file| model_name(Path::new(file)))
        .unwrap_or_else(|| "model".into())
}

/// Flatten the default scene (or the first one) into model-local meshes.
fn graph_from_document(
    document: &gltf::Document,
    buffers: &[Vec<u8>],
    name: &str,
) -> Result<ModelGraph, LoadError> {
    let scene = document
        .default_scene()
        .or_else(|| document.scenes().next())
        .ok_or(LoadError::NoScene)?;

    let mut meshes = Vec::new();
    for node in scene.nodes() {
        collect_node(&node, Mat4::IDENTITY, buffers, &mut meshes);
    }
    Ok(ModelGraph::new(name, meshes))
}

fn collect_node(
    node: &gltf::Node<'_>,
    parent: Mat4,
    buffers: &[Vec<u8>],
    out: &mut Vec<Mesh>,
) {
    let world = parent * Mat4::from_cols_array_2d(&node.transform().matrix());

    if let Some(mesh) = node.mesh() {
        let mesh_name = mesh.name().unwrap_or("mesh");
        for (i, primitive) in mesh.primitives().enumerate() {
            if primitive.mode() != gltf::mesh::Mode::Triangles {
                tracing::trace!(mesh = mesh_name, mode = ?primitive.mode(), "skipping non-triangle primitive");
                continue;
            }
            let reader =
                primitive.reader(|buffer| buffers.get(buffer.index()).map(Vec::as_slice));
            let Some(positions) = reader.read_positions() else {
                continue;
            };
            let positions: Vec<[f32; 3]> = positions.collect();
            let normals = reader
                .read_normals()
                .map(|n| n.collect())
                .unwrap_or_else(|| vec![[0.0, 1.0, 0.0]; positions.len()]);
            let indices = reader
                .read_indices()
                .map(|i| i.into_u32().collect())
                .unwrap_or_else(|| (0..positions.len() as u32).collect());
            let base_color = Color(
                primitive
                    .material()
                    .pbr_metallic_roughness()
                    .base_color_factor(),
            );

            let local = Mesh {
                name: format!("{mesh_name}_{i}"),
                positions,
                normals,
                indices,
                base_color,
            };
            out.push(local.transformed(world));
        }
    }

    for child in node.children() {
        collect_node(&child, world, buffers, out);
    }
}
