//! Process-wide stop notification shared by the HTTP server and the signal task.

use tokio::sync::broadcast;

/// Cloneable handle fanning one stop notification out to every subscriber.
///
/// Clones share the same channel. Subscribe before triggering: a receiver
/// created afterwards never sees the notification.
#[derive(Debug, Clone)]
pub struct Shutdown {
    notify: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (notify, _) = broadcast::channel(1);
        Self { notify }
    }

    /// Receiver that resolves once [`trigger`](Self::trigger) is called.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.notify.subscribe()
    }

    /// Notify every current subscriber and return how many were listening.
    pub fn trigger(&self) -> usize {
        let listeners = self.notify.send(()).unwrap_or(0);
        tracing::debug!(listeners, "Shutdown triggered");
        listeners
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
