//! Shutdown coordination for the proxy.

use std::sync::Arc;

use tokio::sync::broadcast;

use crate::upstream::UpstreamClient;

/// Coordinator for graceful shutdown.
///
/// Long-running tasks subscribe to a broadcast channel; [`finish`] releases
/// the upstream pool once they have drained.
///
/// [`finish`]: Shutdown::finish
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    /// Create a new shutdown coordinator.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Subscribe to the shutdown signal.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Trigger the shutdown signal. Extra calls are harmless.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    /// Get the number of active subscribers (tasks still running).
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Release the upstream pool after the server has stopped.
    pub fn finish(&self, client: &Arc<UpstreamClient>) {
        client.shutdown();
        tracing::info!(
            pending_subscribers = self.receiver_count(),
            "Shutdown complete"
        );
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
