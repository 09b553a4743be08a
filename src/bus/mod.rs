//! Message Bus Component
//!
//! A process-wide topic multiplexer. Publishers send an ordered tuple of
//! values tagged with a topic name; the bus fans the tuple out to every
//! subscriber channel currently registered for that topic.
//!
//! # Overview
//!
//! - **Fan-out**: one publish delivers the same `Arc`-wrapped tuple to every
//!   channel under the topic, sharing a single allocation (copy-free).
//! - **Backpressure**: [`publish`](internal::MessageBus::publish) awaits each
//!   full channel; [`try_publish`](internal::MessageBus::try_publish) drops
//!   that one delivery instead and never suspends the publisher.
//! - **Shutdown**: after [`shutdown`](internal::MessageBus::shutdown) the bus
//!   rejects further publishing deterministically and drops its side of every
//!   subscriber channel.
//!
//! The bus holds no business data beyond tuples in flight; everything else is
//! subscriber bookkeeping under a read/write lock.
//!
//! ```text
//! ┌─────────────┐   publish("jobs", msg)   ┌───────────────────────────┐
//! │  Publisher  │ ───────────────────────► │ MessageBus                │
//! └─────────────┘                          │   "jobs"  → [ch A, ch B]  │
//!                                          │   "audit" → [ch C]        │
//!                                          └─────┬───────────┬─────────┘
//!                                                ▼           ▼
//!                                            queue A      queue B
//! ```

pub(crate) mod error;
pub(crate) mod internal;
pub(crate) mod message;

// Public API module - the only public interface for the bus
pub mod api;
