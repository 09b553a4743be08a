//! Queue and Listener Runtime Component
//!
//! A queue is a named, bounded buffer bound to one bus topic. It wraps a
//! single bus subscription and exposes explicit subscribe/unsubscribe plus a
//! blocking consume loop ([`listen`](handle::QueueHandle::listen)) that
//! invokes a registered handler for every buffered message.
//!
//! # Overview
//!
//! - **Bounded buffer**: the subscriber channel capacity is fixed at creation
//!   (`buffer_size`, default 200) and provides the backpressure the bus
//!   publish flavours react to.
//! - **Concurrency**: the listener admits up to `concurrency` (default 1)
//!   simultaneous handler invocations through a counting admission gate.
//!   With a limit of 1, messages are processed strictly FIFO, start and
//!   completion; above 1, dequeue stays FIFO but completions may interleave.
//! - **Shutdown**: every listen loop races the buffer against the container's
//!   shared shutdown signal. On shutdown it stops admitting work, detaches an
//!   unsubscribe, drains admitted invocations, and returns for good; a
//!   terminated listener can never restart.
//! - **Fan-out**: two queues may share one name; each is an independent
//!   subscriber under the same topic and receives its own reference to every
//!   published tuple.
//!
//! ```text
//!   bus topic "jobs"
//!        │ fan-out
//!        ▼
//! ┌─────────────────┐   recv / shutdown    ┌──────────────────────────┐
//! │ bounded buffer  │ ───────────────────► │ listen loop              │
//! │ (mpsc, size N)  │                      │  gate: Semaphore(conc)   │
//! └─────────────────┘                      │  handler per message     │
//!                                          └──────────────────────────┘
//! ```

pub(crate) mod error;
pub(crate) mod handle;
pub(crate) mod listener;
pub(crate) mod types;

// Public API module - the only public interface for the queue system
pub mod api;
