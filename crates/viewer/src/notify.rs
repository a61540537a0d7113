/// Blocking user-facing notification, used when the model fails to load.
pub trait Notifier {
    fn notify(&mut self, message: &str);
}

/// Reports through the log only. For headless runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&mut self, message: &str) {
        tracing::warn!(target: "orbitview::notify", "{message}");
    }
}
