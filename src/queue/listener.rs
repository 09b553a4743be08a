//! Listener runtime
//!
//! Drives a single queue's consume loop: dequeues message tuples in FIFO
//! order, invokes the registered handler either inline or through a counting
//! admission gate, and participates in the coordinated shutdown protocol
//! shared with the container lifecycle.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use tokio::sync::Semaphore;

use crate::bus::api::{BusError, Message};
use crate::queue::error::{QueueError, QueueResult};
use crate::queue::handle::QueueHandle;

/// Error type a handler invocation may resolve to. Failures are contained to
/// the invocation and reported through the log; they never unwind the loop.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

type MessageFn =
    dyn Fn(Arc<Message>) -> BoxFuture<'static, Result<(), HandlerError>> + Send + Sync;
type WithQueueFn =
    dyn Fn(QueueHandle, Arc<Message>) -> BoxFuture<'static, Result<(), HandlerError>> + Send + Sync;

/// Handler call convention, selected once at registration time.
///
/// A [`with_queue`](Handler::with_queue) handler declares that its first
/// argument is a queue reference, and the runtime supplies one: the tuple's
/// own leading queue handle when present, otherwise a back-reference to the
/// owning queue (useful for self-unsubscription).
#[derive(Clone)]
pub enum Handler {
    Message(Arc<MessageFn>),
    WithQueue(Arc<WithQueueFn>),
}

impl Handler {
    /// Plain message handler: receives the tuple unmodified, always.
    pub fn of<F, Fut>(f: F) -> Self
    where
        F: Fn(Arc<Message>) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Result<(), HandlerError>> + Send + 'static,
    {
        Handler::Message(Arc::new(move |message| f(message).boxed()))
    }

    /// Handler whose first argument is a queue reference.
    pub fn with_queue<F, Fut>(f: F) -> Self
    where
        F: Fn(QueueHandle, Arc<Message>) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Result<(), HandlerError>> + Send + 'static,
    {
        Handler::WithQueue(Arc::new(move |queue, message| f(queue, message).boxed()))
    }
}

impl QueueHandle {
    /// Blocking consume loop.
    ///
    /// Subscribes on entry, then races the buffer against the shared shutdown
    /// signal each iteration. Returns only when the shutdown signal fires or
    /// the buffer closes with nothing pending; a queue whose loop terminated
    /// can never be listened on again.
    ///
    /// With concurrency 1 every invocation completes before the next dequeue
    /// (strict FIFO, starts and completions). Above 1, up to `concurrency`
    /// invocations run simultaneously; admission blocks when the gate is
    /// exhausted, throttling consumption from the buffer. On shutdown, all
    /// admitted invocations drain before this call returns.
    pub async fn listen(&self, handler: Handler) -> QueueResult<()> {
        let mut receiver = self.core.receiver.lock().await.take().ok_or_else(|| {
            QueueError::ListenerUnavailable {
                name: self.name().to_string(),
            }
        })?;

        // Take the shutdown receiver before checking the fired flag so a
        // trigger racing the loop startup is observed on one path or the
        // other.
        let mut shutdown_rx = self.core.shutdown.subscribe();
        let gate = (self.concurrency() > 1)
            .then(|| Arc::new(Semaphore::new(self.concurrency())));

        if self.core.shutdown.is_fired() {
            self.finish_on_shutdown(&gate).await;
            return Ok(());
        }

        // Container teardown can land between the fired pre-check and this
        // subscribe; the errors below only arise from that teardown, so they
        // are a shutdown observation, not a failure.
        if let Err(err) = self.subscribe() {
            return match err {
                QueueError::Bus(BusError::Shutdown) | QueueError::IntakeClosed { .. } => {
                    self.finish_on_shutdown(&gate).await;
                    Ok(())
                }
                other => Err(other),
            };
        }
        log::info!("queue '{}' listening", self.name());

        loop {
            tokio::select! {
                received = receiver.recv() => match received {
                    Some(message) => self.dispatch(&handler, message, &gate).await,
                    None => {
                        log::info!("queue '{}' buffer closed, exiting", self.name());
                        break;
                    }
                },
                _ = shutdown_rx.recv() => {
                    self.finish_on_shutdown(&gate).await;
                    break;
                }
            }
        }
        Ok(())
    }

    /// Shutdown path: no new admissions from here on. The unsubscribe runs on
    /// a detached task so it cannot block loop termination; admitted
    /// invocations drain before the loop returns.
    async fn finish_on_shutdown(&self, gate: &Option<Arc<Semaphore>>) {
        log::info!("queue '{}' observed shutdown, exiting", self.name());
        let handle = self.clone();
        tokio::spawn(async move {
            if let Err(err) = handle.unsubscribe() {
                log::warn!("queue '{}' unsubscribe failed: {err}", handle.name());
            }
        });
        if let Some(gate) = gate {
            // Every admitted invocation holds one permit until it finishes
            let _ = gate.acquire_many(self.concurrency() as u32).await;
        }
    }

    async fn dispatch(
        &self,
        handler: &Handler,
        message: Arc<Message>,
        gate: &Option<Arc<Semaphore>>,
    ) {
        match gate {
            None => Self::invoke(handler.clone(), self.clone(), message).await,
            Some(gate) => {
                let permit = match Arc::clone(gate).acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => return,
                };
                let handler = handler.clone();
                let handle = self.clone();
                tokio::spawn(async move {
                    Self::invoke(handler, handle, message).await;
                    drop(permit);
                });
            }
        }
    }

    /// One handler invocation. Errors and panics are contained here: logged,
    /// scoped to this message, and invisible to the loop.
    async fn invoke(handler: Handler, owner: QueueHandle, message: Arc<Message>) {
        let queue_name = owner.name().to_string();
        let invocation = match handler {
            Handler::Message(f) => f(message),
            Handler::WithQueue(f) => match message.value::<QueueHandle>(0) {
                // The tuple already leads with a queue reference: pass it
                // through and hand the handler the remaining values.
                Some(leading) => {
                    let leading = leading.clone();
                    f(leading, Arc::new(message.tail()))
                }
                None => f(owner, message),
            },
        };

        match AssertUnwindSafe(invocation).catch_unwind().await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                log::warn!("queue '{queue_name}' handler failed: {err}");
            }
            Err(_) => {
                log::error!("queue '{queue_name}' handler panicked; continuing");
            }
        }
    }
}
