//! Shutdown Coordination
//!
//! A single broadcast signal shared between the container lifecycle and every
//! running listener loop. The signal fires exactly once at container exit and
//! stays observably fired forever afterwards.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Coordinates graceful shutdown across the container and its listeners.
///
/// Cheap to clone; all clones share the same signal.
#[derive(Clone)]
pub struct ShutdownCoordinator {
    shutdown_tx: broadcast::Sender<()>,
    fired: Arc<AtomicBool>,
}

impl ShutdownCoordinator {
    pub fn new() -> Self {
        // Capacity above 1 so a late burst of subscribers never drops the signal
        let (shutdown_tx, _shutdown_rx) = broadcast::channel(8);
        Self {
            shutdown_tx,
            fired: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Subscribe to shutdown notifications.
    ///
    /// A receiver only observes a trigger that happens after subscription.
    /// Callers subscribe first and then consult [`is_fired`](Self::is_fired)
    /// so a trigger racing the subscription is seen either way.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    /// Fire the shutdown signal. Only the first call sends; the signal is
    /// never re-armed.
    pub fn trigger(&self) {
        // AcqRel swap synchronizes-with the Acquire loads in is_fired()
        if !self.fired.swap(true, Ordering::AcqRel) {
            let _ = self.shutdown_tx.send(());
        }
    }

    /// Check whether the signal has fired.
    pub fn is_fired(&self) -> bool {
        self.fired.load(Ordering::Acquire)
    }
}

impl Default for ShutdownCoordinator {
    fn default() -> Self {
        Self::new()
    }
}
