//! Container implementation
//!
//! Owns the bus, the provider and queue registries, the value store and the
//! shared shutdown signal, and exposes the messaging facade providers and
//! application code publish through.

use std::any::Any;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Instant;

use crate::bus::api::{Message, MessageBus};
use crate::container::error::{ContainerError, ContainerResult};
use crate::container::metadata::MetadataStore;
use crate::container::provider::Provider;
use crate::container::registry::ProviderRegistry;
use crate::container::values::ValueStore;
use crate::core::shutdown::ShutdownCoordinator;
use crate::core::sync::{handle_rwlock_read, handle_rwlock_write};
use crate::queue::api::{QueueError, QueueHandle, QueueOptions, QueueResult};

/// In-process extension container.
///
/// # Example
///
/// ```rust,no_run
/// use modhost::bus::api::Message;
/// use modhost::container::api::Container;
/// use modhost::queue::api::{Handler, HandlerError, QueueOptions};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let container = Container::new();
///
/// let jobs = container.queue("jobs", QueueOptions::new().concurrency(2))?;
/// let listener = tokio::spawn(async move {
///     jobs.listen(Handler::of(|message| async move {
///         let id = *message.expect_value::<u64>(0)?;
///         println!("job {id}");
///         Ok::<(), HandlerError>(())
///     }))
///     .await
/// });
///
/// container.publish("jobs", Message::of(1u64)).await?;
/// container.exit().await;
/// listener.await??;
/// # Ok(())
/// # }
/// ```
pub struct Container {
    providers: RwLock<ProviderRegistry>,
    values: ValueStore,
    metadata: MetadataStore,
    bus: Arc<MessageBus>,
    queues: RwLock<Vec<QueueHandle>>,
    shutdown: ShutdownCoordinator,
    next_subscriber_id: AtomicU64,
    exited: AtomicBool,
}

impl Container {
    /// Explicit construction; there is no process-wide default instance.
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            providers: RwLock::new(ProviderRegistry::default()),
            values: ValueStore::default(),
            metadata: MetadataStore::default(),
            bus: Arc::new(MessageBus::new()),
            queues: RwLock::new(Vec::new()),
            shutdown: ShutdownCoordinator::new(),
            next_subscriber_id: AtomicU64::new(0),
            exited: AtomicBool::new(false),
        })
    }

    fn poisoned(message: String) -> ContainerError {
        ContainerError::Poisoned { message }
    }

    // --- provider registration -------------------------------------------

    /// Append a provider to the load order.
    pub fn push(&self, provider: Arc<dyn Provider>) -> ContainerResult<()> {
        handle_rwlock_write(self.providers.write(), Self::poisoned)?.push(provider)
    }

    /// Place a provider at the front of the load order.
    pub fn front(&self, provider: Arc<dyn Provider>) -> ContainerResult<()> {
        handle_rwlock_write(self.providers.write(), Self::poisoned)?.front(provider)
    }

    /// Insert a provider before the named one (front when unknown).
    pub fn before(&self, anchor: &str, provider: Arc<dyn Provider>) -> ContainerResult<()> {
        handle_rwlock_write(self.providers.write(), Self::poisoned)?.before(anchor, provider)
    }

    /// Insert a provider after the named one (end when unknown).
    pub fn after(&self, anchor: &str, provider: Arc<dyn Provider>) -> ContainerResult<()> {
        handle_rwlock_write(self.providers.write(), Self::poisoned)?.after(anchor, provider)
    }

    pub fn provider_count(&self) -> ContainerResult<usize> {
        Ok(handle_rwlock_read(self.providers.read(), Self::poisoned)?.len())
    }

    /// Registered providers, in load order.
    pub fn providers(&self) -> ContainerResult<Vec<Arc<dyn Provider>>> {
        Ok(handle_rwlock_read(self.providers.read(), Self::poisoned)?.in_order())
    }

    /// Run provider `load` hooks in registration order, timing each. The
    /// first failure aborts the sequence and propagates.
    pub async fn load(self: &Arc<Self>) -> ContainerResult<()> {
        let providers = handle_rwlock_read(self.providers.read(), Self::poisoned)?.in_order();
        for provider in providers {
            let started = Instant::now();
            provider.load(self).await?;
            log::info!(
                "provider '{}' loaded in {:?}",
                provider.name(),
                started.elapsed()
            );
        }
        Ok(())
    }

    // --- shared values ----------------------------------------------------

    /// Store a shared value, indexed by its type.
    pub fn set<T: Any + Send + Sync>(&self, value: T) -> ContainerResult<()> {
        self.values.set(value)
    }

    /// Retrieve the shared value of type `T`.
    pub fn get<T: Any + Send + Sync>(&self) -> ContainerResult<Arc<T>> {
        self.values.get()
    }

    /// Panicking convenience over [`get`](Self::get), for bootstrap code
    /// where a missing value is unrecoverable.
    pub fn must_get<T: Any + Send + Sync>(&self) -> Arc<T> {
        match self.get::<T>() {
            Ok(value) => value,
            Err(err) => panic!("{err}"),
        }
    }

    // --- string-keyed metadata --------------------------------------------

    /// Store metadata under `key`, replacing any previous entry. Keys are
    /// free-form; the same type may live under many keys.
    pub fn set_meta<T: Any + Send + Sync>(
        &self,
        key: impl Into<String>,
        value: T,
    ) -> ContainerResult<()> {
        self.metadata.set(key, value)
    }

    /// Retrieve the metadata entry under `key` as a `T`. A missing key and a
    /// type mismatch are distinct errors.
    pub fn get_meta<T: Any + Send + Sync>(&self, key: &str) -> ContainerResult<Arc<T>> {
        self.metadata.get(key)
    }

    /// Panicking convenience over [`get_meta`](Self::get_meta).
    pub fn must_get_meta<T: Any + Send + Sync>(&self, key: &str) -> Arc<T> {
        match self.get_meta::<T>(key) {
            Ok(value) => value,
            Err(err) => panic!("{err}"),
        }
    }

    /// True when any metadata entry exists under `key`.
    pub fn has_meta(&self, key: &str) -> ContainerResult<bool> {
        self.metadata.contains(key)
    }

    // --- messaging --------------------------------------------------------

    /// Create a queue bound to topic `name` and register it for teardown.
    ///
    /// Options are validated here; the queue's concurrency limit and buffer
    /// capacity are fixed for its lifetime.
    pub fn queue(&self, name: &str, options: QueueOptions) -> QueueResult<QueueHandle> {
        let subscriber_id = self.next_subscriber_id.fetch_add(1, Ordering::SeqCst);
        let handle = QueueHandle::create(
            name.to_string(),
            &options,
            subscriber_id,
            Arc::clone(&self.bus),
            self.shutdown.clone(),
        )?;
        handle_rwlock_write(self.queues.write(), |message| QueueError::Poisoned {
            message,
        })?
        .push(handle.clone());
        Ok(handle)
    }

    /// Blocking fan-out publish: completes once every subscriber channel
    /// under `topic` has accepted the message. Returns the delivery count.
    pub async fn publish(&self, topic: &str, message: Message) -> ContainerResult<usize> {
        Ok(self.bus.publish(topic, Arc::new(message)).await?)
    }

    /// Best-effort fan-out publish: a full subscriber buffer drops that one
    /// delivery; never suspends the caller.
    pub fn try_publish(&self, topic: &str, message: Message) -> ContainerResult<usize> {
        Ok(self.bus.try_publish(topic, Arc::new(message))?)
    }

    /// Handle on the shared shutdown signal, for code outside listener loops
    /// that wants to observe container exit.
    pub fn shutdown_signal(&self) -> ShutdownCoordinator {
        self.shutdown.clone()
    }

    /// Full shutdown sequence: provider `exit` hooks in reverse registration
    /// order, fire the shutdown signal, shut the bus down, then unsubscribe
    /// and close every queue this container created.
    ///
    /// Exactly-once: a second call is a warned no-op.
    pub async fn exit(&self) {
        if self.exited.swap(true, Ordering::AcqRel) {
            log::warn!("container exit called more than once; ignoring");
            return;
        }

        let providers = match self.providers.read() {
            Ok(registry) => registry.in_order(),
            Err(_) => Vec::new(),
        };
        for provider in providers.iter().rev() {
            let started = Instant::now();
            provider.exit().await;
            log::info!(
                "provider '{}' exited in {:?}",
                provider.name(),
                started.elapsed()
            );
        }

        self.shutdown.trigger();
        self.bus.shutdown();

        // Safety net: listeners unsubscribe themselves on the signal, but a
        // queue whose loop never ran (or already returned) is cleaned here
        let queues = match self.queues.read() {
            Ok(queues) => queues.clone(),
            Err(_) => Vec::new(),
        };
        for queue in queues {
            if let Err(err) = queue.unsubscribe() {
                log::warn!(
                    "queue '{}' unsubscribe during exit failed: {err}",
                    queue.name()
                );
            }
            queue.close_intake();
        }
    }
}
