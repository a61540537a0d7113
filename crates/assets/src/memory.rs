use std::collections::HashMap;

use crate::{LoadError, LoadHandle, Loadable, ModelGraph};

/// In-memory model source keyed by location.
///
/// Results are queued on the handle immediately; they are still only
/// observed when the handle is polled.
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    entries: HashMap<String, Result<ModelGraph, String>>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_model(mut self, location: impl Into<String>, graph: ModelGraph) -> Self {
        self.entries.insert(location.into(), Ok(graph));
        self
    }

    /// Make `location` fail with `diagnostic`.
    pub fn with_failure(mut self, location: impl Into<String>, diagnostic: impl Into<String>) -> Self {
        self.entries.insert(location.into(), Err(diagnostic.into()));
        self
    }
}

impl Loadable for MemoryLoader {
    fn load(&self, location: &str) -> LoadHandle {
        let (sender, handle) = LoadHandle::channel(location);
        let result = match self.entries.get(location) {
            Some(Ok(graph)) => Ok(graph.clone()),
            Some(Err(diagnostic)) => Err(LoadError::Rejected(diagnostic.clone())),
            None => Err(LoadError::Rejected(format!("no model registered at {location}"))),
        };
        sender.finish(result);
        handle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LoadEvent;
    use glam::Vec3;

    #[test]
    fn serves_registered_models() {
        let loader = MemoryLoader::new().with_model(
            "mem://box",
            ModelGraph::cuboid("box", Vec3::ZERO, Vec3::ONE),
        );
        let graph = loader.load("mem://box").wait().unwrap();
        assert_eq!(graph.name, "box");
    }

    #[test]
    fn unknown_location_fails() {
        let loader = MemoryLoader::new();
        let mut handle = loader.load("mem://missing");
        match handle.try_next() {
            Some(LoadEvent::Failed(LoadError::Rejected(msg))) => {
                assert!(msg.contains("mem://missing"));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn registered_failure_is_reported() {
        let loader = MemoryLoader::new().with_failure("mem://bad", "network unreachable");
        let err = loader.load("mem://bad").wait().unwrap_err();
        assert_eq!(err.to_string(), "network unreachable");
    }
}
