use std::collections::BTreeMap;

/// The window-level listeners a viewer installs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ListenerKind {
    Resize,
    PointerDown,
    PointerMove,
    PointerUp,
}

impl ListenerKind {
    pub const ALL: [ListenerKind; 4] = [
        ListenerKind::Resize,
        ListenerKind::PointerDown,
        ListenerKind::PointerMove,
        ListenerKind::PointerUp,
    ];
}

/// Handle returned by [`ListenerRegistry::register`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

#[derive(Debug, thiserror::Error)]
pub enum ListenerError {
    #[error("listener {0:?} is not registered")]
    NotRegistered(ListenerId),
}

/// Book-keeping for window listeners.
///
/// The host window owns event delivery; the registry decides which of the
/// delivered events a viewer actually observes.
#[derive(Debug, Default)]
pub struct ListenerRegistry {
    active: BTreeMap<ListenerId, ListenerKind>,
    next_id: u64,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, kind: ListenerKind) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.active.insert(id, kind);
        tracing::debug!(?kind, ?id, "window listener registered");
        id
    }

    pub fn remove(&mut self, id: ListenerId) -> Result<ListenerKind, ListenerError> {
        let kind = self
            .active
            .remove(&id)
            .ok_or(ListenerError::NotRegistered(id))?;
        tracing::debug!(?kind, ?id, "window listener removed");
        Ok(kind)
    }

    pub fn is_listening(&self, kind: ListenerKind) -> bool {
        self.active.values().any(|k| *k == kind)
    }

    /// Number of live registrations.
    pub fn active_count(&self) -> usize {
        self.active.len()
    }
}
