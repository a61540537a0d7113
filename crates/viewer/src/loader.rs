use glam::Vec3;
use orbitview_assets::{LoadEvent, LoadHandle, Loadable, ModelGraph};
use orbitview_common::{Aabb, NodeId};
use orbitview_render::{Scene, SceneNode};

use crate::config::ModelConfig;

/// A load that did not produce a model. Carries what the user is told.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Error loading model: {diagnostic}")]
pub struct AssetLoadFailure {
    pub location: String,
    pub diagnostic: String,
}

/// The model attached to the scene, after normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    pub node: NodeId,
    pub name: String,
    /// Center of the model's bounds before it was moved. The orbit pivot.
    pub center: Vec3,
    /// Bounds before normalization.
    pub bounds: Aabb,
    pub position: Vec3,
    pub scale: Vec3,
}

/// Requests the single model and turns a completed load into a placed
/// scene node.
pub struct AssetLoader<L: Loadable> {
    loadable: L,
    pending: Option<LoadHandle>,
    requested: bool,
    scale: f32,
    vertical_offset: f32,
}

impl<L: Loadable> AssetLoader<L> {
    pub fn new(loadable: L, config: &ModelConfig) -> Self {
        Self {
            loadable,
            pending: None,
            requested: false,
            scale: config.scale,
            vertical_offset: config.vertical_offset,
        }
    }

    /// Issue the load. Only the first call does anything; a viewer shows
    /// exactly one model.
    pub fn request(&mut self, location: &str) -> bool {
        if self.requested {
            tracing::warn!(location, "model already requested, ignoring");
            return false;
        }
        self.requested = true;
        tracing::info!(location, "requesting model");
        self.pending = Some(self.loadable.load(location));
        true
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drain the pending load. Returns `Some` exactly once, when the load
    /// completes; on success the model is already attached to `scene`.
    pub fn poll(&mut self, scene: &mut Scene) -> Option<Result<Model, AssetLoadFailure>> {
        let handle = self.pending.as_mut()?;
        loop {
            match handle.try_next()? {
                LoadEvent::Progress { loaded, total } => {
                    tracing::trace!(location = handle.location(), loaded, ?total, "load progress");
                }
                LoadEvent::Loaded(graph) => {
                    self.pending = None;
                    return Some(Ok(self.attach(graph, scene)));
                }
                LoadEvent::Failed(e) => {
                    let failure = AssetLoadFailure {
                        location: handle.location().to_string(),
                        diagnostic: e.to_string(),
                    };
                    self.pending = None;
                    return Some(Err(failure));
                }
            }
        }
    }

    /// Forget the in-flight load. Its result, if it ever arrives, is dropped
    /// by the worker. Returns whether anything was pending.
    pub fn abandon(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Recenter the model on the origin, lift it, scale it, and add it to
    /// the scene.
    fn attach(&self, graph: ModelGraph, scene: &mut Scene) -> Model {
        let bounds = graph.bounds();
        let center = bounds.center();
        let position = -center + Vec3::new(0.0, self.vertical_offset, 0.0);
        let scale = Vec3::splat(self.scale);

        let mut node = SceneNode::new(graph.name.clone(), graph.meshes);
        node.transform.position = position;
        node.transform.scale = scale;
        let id = scene.add(node);

        tracing::info!(
            name = %graph.name,
            node = %id.short(),
            center = ?center,
            "model attached"
        );
        Model {
            node: id,
            name: graph.name,
            center,
            bounds,
            position,
            scale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orbitview_assets::MemoryLoader;

    fn loader_with_box(center: Vec3) -> AssetLoader<MemoryLoader> {
        let memory = MemoryLoader::new()
            .with_model("mem://box", ModelGraph::cuboid("box", center, Vec3::ONE))
            .with_failure("mem://broken", "unexpected end of file");
        AssetLoader::new(memory, &ModelConfig::default())
    }

    #[test]
    fn success_normalizes_and_attaches() {
        let center = Vec3::new(2.0, 1.0, -3.0);
        let mut loader = loader_with_box(center);
        let mut scene = Scene::new();

        assert!(loader.request("mem://box"));
        let model = loader.poll(&mut scene).unwrap().unwrap();

        assert!((model.center - center).length() < 1e-6);
        assert!((model.position - Vec3::new(-2.0, -0.5, 3.0)).length() < 1e-6);
        assert_eq!(model.scale, Vec3::splat(0.5));

        let node = scene.get(model.node).unwrap();
        assert_eq!(node.transform.position, model.position);
        assert_eq!(node.transform.scale, Vec3::splat(0.5));
        assert_eq!(node.transform.rotation, Vec3::ZERO);
        assert_eq!(scene.node_count(), 1);
    }

    #[test]
    fn completes_exactly_once() {
        let mut loader = loader_with_box(Vec3::ZERO);
        let mut scene = Scene::new();
        loader.request("mem://box");
        assert!(loader.poll(&mut scene).is_some());
        assert!(loader.poll(&mut scene).is_none());
        assert!(!loader.is_pending());
    }

    #[test]
    fn second_request_is_ignored() {
        let mut loader = loader_with_box(Vec3::ZERO);
        assert!(loader.request("mem://box"));
        assert!(!loader.request("mem://box"));
    }

    #[test]
    fn failure_reports_diagnostic_and_attaches_nothing() {
        let mut loader = loader_with_box(Vec3::ZERO);
        let mut scene = Scene::new();
        loader.request("mem://broken");

        let failure = loader.poll(&mut scene).unwrap().unwrap_err();
        assert_eq!(failure.location, "mem://broken");
        assert_eq!(failure.diagnostic, "unexpected end of file");
        assert_eq!(failure.to_string(), "Error loading model: unexpected end of file");
        assert_eq!(scene.node_count(), 0);
    }

    #[test]
    fn abandoned_load_never_completes() {
        let mut loader = loader_with_box(Vec3::ZERO);
        let mut scene = Scene::new();
        loader.request("mem://box");
        assert!(loader.abandon());
        assert!(loader.poll(&mut scene).is_none());
        assert_eq!(scene.node_count(), 0);
    }

    #[test]
    fn empty_model_is_centered_on_origin() {
        let memory = MemoryLoader::new().with_model("mem://empty", ModelGraph::new("empty", vec![]));
        let mut loader = AssetLoader::new(memory, &ModelConfig::default());
        let mut scene = Scene::new();
        loader.request("mem://empty");
        let model = loader.poll(&mut scene).unwrap().unwrap();
        assert_eq!(model.center, Vec3::ZERO);
        assert_eq!(model.position, Vec3::new(0.0, 0.5, 0.0));
    }
}
