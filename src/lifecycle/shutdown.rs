//! Stop signal shared by the listener and the signal task.

use tokio::sync::broadcast;

/// Cloneable stop switch for a hop process.
///
/// `main` hands one receiver to the server; integration tests start several
/// hops off a single `Shutdown` and stop them together.
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Tell every server to stop accepting and drain. Returns how many
    /// servers were still waiting; zero means nothing was running.
    pub fn trigger(&self) -> usize {
        self.tx.send(()).unwrap_or(0)
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
