use crossbeam_channel::{Receiver, Sender, TryRecvError};

use crate::{LoadError, ModelGraph};

/// Messages emitted by a load in flight.
#[derive(Debug)]
pub enum LoadEvent {
    /// Bytes read so far, and the total if known.
    Progress { loaded: u64, total: Option<u64> },
    Loaded(ModelGraph),
    Failed(LoadError),
}

impl LoadEvent {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, LoadEvent::Progress { .. })
    }
}

/// Producer side of a load, held by whoever does the decoding.
#[derive(Debug)]
pub struct LoadSender {
    location: String,
    sender: Sender<LoadEvent>,
}

impl LoadSender {
    pub fn progress(&self, loaded: u64, total: Option<u64>) {
        // A dropped handle means nobody is waiting; progress is advisory.
        let _ = self.sender.send(LoadEvent::Progress { loaded, total });
    }

    /// Deliver the terminal result. Consumes the sender so a load can only
    /// finish once.
    pub fn finish(self, result: Result<ModelGraph, LoadError>) {
        let event = match result {
            Ok(graph) => LoadEvent::Loaded(graph),
            Err(e) => LoadEvent::Failed(e),
        };
        if self.sender.send(event).is_err() {
            tracing::debug!(location = %self.location, "load finished after its handle was dropped");
        }
    }
}

/// Consumer side of a load. Poll it from the event context.
#[derive(Debug)]
pub struct LoadHandle {
    location: String,
    receiver: Receiver<LoadEvent>,
    finished: bool,
}

impl LoadHandle {
    /// Create a connected sender/handle pair for `location`.
    pub fn channel(location: impl Into<String>) -> (LoadSender, LoadHandle) {
        let location = location.into();
        let (sender, receiver) = crossbeam_channel::unbounded();
        (
            LoadSender {
                location: location.clone(),
                sender,
            },
            LoadHandle {
                location,
                receiver,
                finished: false,
            },
        )
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    /// True once the terminal event has been handed out.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Next pending event without blocking.
    ///
    /// A producer that disappears without finishing is reported once as
    /// [`LoadError::WorkerLost`]. After the terminal event this returns `None`.
    pub fn try_next(&mut self) -> Option<LoadEvent> {
        if self.finished {
            return None;
        }
        let event = match self.receiver.try_recv() {
            Ok(event) => event,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => LoadEvent::Failed(LoadError::WorkerLost),
        };
        self.finished = event.is_terminal();
        Some(event)
    }

    /// Block until the terminal event, skipping progress.
    pub fn wait(self) -> Result<ModelGraph, LoadError> {
        if self.finished {
            return Err(LoadError::WorkerLost);
        }
        loop {
            match self.receiver.recv() {
                Ok(LoadEvent::Progress { .. }) => continue,
                Ok(LoadEvent::Loaded(graph)) => return Ok(graph),
                Ok(LoadEvent::Failed(e)) => return Err(e),
                Err(_) => return Err(LoadError::WorkerLost),
            }
        }
    }
}
