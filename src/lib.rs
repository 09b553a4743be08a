//! In-process extension container.
//!
//! `modhost` lets independently-authored modules ("providers") register with
//! a shared [`Container`](container::api::Container), be loaded and exited in
//! a controlled order, exchange shared values by type, and communicate over a
//! lightweight topic-based messaging subsystem:
//!
//! - `bus`: the topic multiplexer. Publishers send message tuples under a
//!   topic name; the bus fans each tuple out to every subscriber channel
//!   registered for that topic.
//! - `queue`: a named, bounded buffer wrapping one bus subscription, plus
//!   the listener runtime that consumes it with configurable concurrency.
//! - `container`: the provider registry, the type-indexed value store, the
//!   string-keyed metadata store, and the lifecycle that owns the bus and the
//!   shared shutdown signal.
//! - `core`: shutdown coordination and lock-poison handling shared by the
//!   modules above.
//!
//! Each module exposes its public surface through its `api` submodule.

pub mod bus;
pub mod container;
pub mod core;
pub mod queue;
