//! Topic multiplexer implementation
//!
//! Keeps the topic → subscriber-channel table and performs the fan-out for
//! both publish flavours. The table is mutated under a read/write lock:
//! publishes snapshot the senders under the read lock and deliver after
//! releasing it, so a subscription change concurrent with a publish may or
//! may not be observed, but a single publish never delivers the same
//! message twice to one channel.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use tokio::sync::mpsc;

use crate::bus::error::{BusError, BusResult};
use crate::bus::message::Message;
use crate::core::sync::{handle_rwlock_read, handle_rwlock_write};

/// Bus-side registration of one subscriber channel.
struct SubscriberEntry {
    id: u64,
    sender: mpsc::Sender<Arc<Message>>,
}

/// Process-wide topic multiplexer.
///
/// Multiple channels may register under one topic (fan-out), and one channel
/// may register under multiple topics. Subscriber identity is the numeric id
/// assigned by the container, not the topic name.
pub struct MessageBus {
    topics: RwLock<HashMap<String, Vec<SubscriberEntry>>>,
    shut: AtomicBool,
}

impl MessageBus {
    pub fn new() -> Self {
        Self {
            topics: RwLock::new(HashMap::new()),
            shut: AtomicBool::new(false),
        }
    }

    fn poisoned(message: String) -> BusError {
        BusError::Poisoned { message }
    }

    /// Register `sender` under `topic`.
    ///
    /// Re-registering the same subscriber id replaces the previous entry, so
    /// a repeated subscribe is harmless.
    pub fn subscribe(
        &self,
        id: u64,
        sender: mpsc::Sender<Arc<Message>>,
        topic: &str,
    ) -> BusResult<()> {
        if self.is_shut() {
            return Err(BusError::Shutdown);
        }

        let mut topics = handle_rwlock_write(self.topics.write(), Self::poisoned)?;
        let entries = topics.entry(topic.to_string()).or_default();
        if let Some(existing) = entries.iter_mut().find(|entry| entry.id == id) {
            existing.sender = sender;
        } else {
            entries.push(SubscriberEntry { id, sender });
        }
        Ok(())
    }

    /// Deregister `id` from `topic`. Unknown id or topic is a no-op.
    pub fn unsubscribe(&self, id: u64, topic: &str) -> BusResult<()> {
        let mut topics = handle_rwlock_write(self.topics.write(), Self::poisoned)?;
        if let Some(entries) = topics.get_mut(topic) {
            entries.retain(|entry| entry.id != id);
            if entries.is_empty() {
                topics.remove(topic);
            }
        }
        Ok(())
    }

    /// Deregister `id` from every topic it subscribed under.
    pub fn unsubscribe_all(&self, id: u64) -> BusResult<()> {
        let mut topics = handle_rwlock_write(self.topics.write(), Self::poisoned)?;
        topics.retain(|_, entries| {
            entries.retain(|entry| entry.id != id);
            !entries.is_empty()
        });
        Ok(())
    }

    /// Deliver `message` to every channel under `topic`, waiting until each
    /// channel has accepted it; a full channel blocks the publisher.
    ///
    /// Channels whose receiver is gone are pruned and that delivery is
    /// skipped. Returns the number of channels that accepted the message.
    pub async fn publish(&self, topic: &str, message: Arc<Message>) -> BusResult<usize> {
        if self.is_shut() {
            return Err(BusError::Shutdown);
        }

        let subscribers = self.snapshot(topic)?;
        let mut delivered = 0;
        let mut dead = Vec::new();
        for (id, sender) in subscribers {
            match sender.send(Arc::clone(&message)).await {
                Ok(()) => delivered += 1,
                Err(_) => dead.push(id),
            }
        }
        self.prune(topic, &dead)?;
        Ok(delivered)
    }

    /// Best-effort fan-out: a full channel drops that single delivery;
    /// deliveries to other channels proceed independently. Never suspends
    /// the publisher.
    pub fn try_publish(&self, topic: &str, message: Arc<Message>) -> BusResult<usize> {
        if self.is_shut() {
            return Err(BusError::Shutdown);
        }

        let subscribers = self.snapshot(topic)?;
        let mut delivered = 0;
        let mut dead = Vec::new();
        for (id, sender) in subscribers {
            match sender.try_send(Arc::clone(&message)) {
                Ok(()) => delivered += 1,
                Err(mpsc::error::TrySendError::Full(_)) => {
                    log::trace!("bus: dropped message for subscriber {id} on '{topic}': buffer full");
                }
                Err(mpsc::error::TrySendError::Closed(_)) => dead.push(id),
            }
        }
        self.prune(topic, &dead)?;
        Ok(delivered)
    }

    /// Disable publishing and drop the bus side of every subscriber channel.
    ///
    /// Exactly-once is the container's contract; a second call here is a no-op.
    pub fn shutdown(&self) {
        if self.shut.swap(true, Ordering::AcqRel) {
            return;
        }
        if let Ok(mut topics) = self.topics.write() {
            topics.clear();
        }
        log::info!("message bus shut down");
    }

    pub fn is_shut(&self) -> bool {
        self.shut.load(Ordering::Acquire)
    }

    /// Number of channels currently registered under `topic`.
    pub fn subscriber_count(&self, topic: &str) -> BusResult<usize> {
        let topics = handle_rwlock_read(self.topics.read(), Self::poisoned)?;
        Ok(topics.get(topic).map_or(0, Vec::len))
    }

    // Clone the senders out so no lock is held across an await point.
    fn snapshot(&self, topic: &str) -> BusResult<Vec<(u64, mpsc::Sender<Arc<Message>>)>> {
        let topics = handle_rwlock_read(self.topics.read(), Self::poisoned)?;
        Ok(topics.get(topic).map_or_else(Vec::new, |entries| {
            entries
                .iter()
                .map(|entry| (entry.id, entry.sender.clone()))
                .collect()
        }))
    }

    fn prune(&self, topic: &str, dead: &[u64]) -> BusResult<()> {
        if dead.is_empty() {
            return Ok(());
        }
        log::trace!("bus: pruning {} closed subscriber(s) on '{topic}'", dead.len());
        let mut topics = handle_rwlock_write(self.topics.write(), Self::poisoned)?;
        if let Some(entries) = topics.get_mut(topic) {
            entries.retain(|entry| !dead.contains(&entry.id));
            if entries.is_empty() {
                topics.remove(topic);
            }
        }
        Ok(())
    }
}

impl Default for MessageBus {
    fn default() -> Self {
        Self::new()
    }
}
