//! Shutdown coordination for the broker.
//!
//! A `watch` channel rather than a broadcast: a listener created after the
//! trigger still observes it, so a server started late stops right away.

use tokio::sync::watch;

/// Owner side: flips the shutdown flag once.
pub struct Shutdown {
    tx: watch::Sender<bool>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx }
    }

    pub fn subscribe(&self) -> ShutdownListener {
        ShutdownListener {
            rx: self.tx.subscribe(),
        }
    }

    /// Signal every listener. Returns how many were still listening.
    pub fn trigger(&self) -> usize {
        let listening = self.tx.receiver_count();
        self.tx.send_replace(true);
        tracing::info!(draining = listening, "Shutdown triggered");
        listening
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Listener side, handed to long-running tasks.
pub struct ShutdownListener {
    rx: watch::Receiver<bool>,
}

impl ShutdownListener {
    /// Resolve once shutdown has been triggered, or the owner is gone.
    pub async fn recv(&mut self) {
        let _ = self.rx.wait_for(|triggered| *triggered).await;
    }
}
