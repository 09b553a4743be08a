//! Queue handles
//!
//! [`QueueHandle`] is a cheap clone over the shared queue core. The container
//! and an active listener loop jointly keep the core alive; the queue lives
//! until explicitly unsubscribed or until container shutdown, and is never
//! destroyed while a listener loop still references it.

use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

use crate::bus::api::{Message, MessageBus};
use crate::core::shutdown::ShutdownCoordinator;
use crate::core::sync::handle_mutex_poison;
use crate::queue::error::{QueueError, QueueResult};
use crate::queue::types::QueueOptions;

pub(crate) struct QueueCore {
    pub(crate) name: String,
    pub(crate) concurrency: usize,
    pub(crate) subscriber_id: u64,
    pub(crate) bus: Arc<MessageBus>,
    pub(crate) shutdown: ShutdownCoordinator,
    /// Kept open across unsubscribe so messages already buffered stay
    /// drainable; taken by container teardown to close the buffer.
    intake: Mutex<Option<mpsc::Sender<Arc<Message>>>>,
    /// Taken exactly once by `listen` and never returned; a terminated
    /// listener cannot restart.
    pub(crate) receiver: tokio::sync::Mutex<Option<mpsc::Receiver<Arc<Message>>>>,
}

/// Handle to a named, bounded queue bound to one bus topic.
///
/// The name is the topic key, nothing more: several queues may share a name,
/// each receiving every tuple published under it.
#[derive(Clone)]
pub struct QueueHandle {
    pub(crate) core: Arc<QueueCore>,
}

impl QueueHandle {
    pub(crate) fn create(
        name: String,
        options: &QueueOptions,
        subscriber_id: u64,
        bus: Arc<MessageBus>,
        shutdown: ShutdownCoordinator,
    ) -> QueueResult<Self> {
        options.validate()?;
        let (intake_tx, intake_rx) = mpsc::channel(options.buffer_capacity());
        Ok(Self {
            core: Arc::new(QueueCore {
                name,
                concurrency: options.concurrency_limit(),
                subscriber_id,
                bus,
                shutdown,
                intake: Mutex::new(Some(intake_tx)),
                receiver: tokio::sync::Mutex::new(Some(intake_rx)),
            }),
        })
    }

    /// Topic this queue is bound to.
    pub fn name(&self) -> &str {
        &self.core.name
    }

    /// Fixed maximum of simultaneous handler invocations.
    pub fn concurrency(&self) -> usize {
        self.core.concurrency
    }

    /// Register this queue's channel with the bus under its topic.
    ///
    /// Idempotent: a second call re-registers the same channel harmlessly.
    pub fn subscribe(&self) -> QueueResult<()> {
        let sender = {
            let intake = handle_mutex_poison(self.core.intake.lock(), Self::poisoned)?;
            intake.clone().ok_or_else(|| QueueError::IntakeClosed {
                name: self.core.name.clone(),
            })?
        };
        self.core
            .bus
            .subscribe(self.core.subscriber_id, sender, &self.core.name)?;
        Ok(())
    }

    /// Deregister from the bus. No new messages arrive afterwards; messages
    /// already buffered remain until drained by an active listen loop.
    /// Idempotent.
    pub fn unsubscribe(&self) -> QueueResult<()> {
        self.core
            .bus
            .unsubscribe(self.core.subscriber_id, &self.core.name)?;
        Ok(())
    }

    /// Drop the held intake sender so the buffer closes once the bus side is
    /// gone too. Container teardown safety net.
    pub(crate) fn close_intake(&self) {
        if let Ok(mut intake) = self.core.intake.lock() {
            intake.take();
        }
    }

    pub(crate) fn poisoned(message: String) -> QueueError {
        QueueError::Poisoned { message }
    }
}

impl std::fmt::Debug for QueueHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueueHandle")
            .field("name", &self.core.name)
            .field("concurrency", &self.core.concurrency)
            .finish()
    }
}
