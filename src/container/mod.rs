//! Container Component
//!
//! The container owns the message bus, the ordered provider registry, the
//! queue registry and the single shared shutdown signal. It orchestrates
//! provider `load` in registration order and provider `exit` in reverse
//! order, then tears the messaging subsystem down:
//!
//! 1. provider `exit` hooks, reverse registration order;
//! 2. fire the shutdown signal (the primary path every listener reacts to);
//! 3. shut the bus down;
//! 4. unsubscribe and close every queue the container created, a safety net
//!    for queues whose listener never ran or already returned.
//!
//! The container is constructed explicitly and passed by handle; there is no
//! process-wide default instance.

pub(crate) mod error;
pub(crate) mod manager;
pub(crate) mod metadata;
pub(crate) mod provider;
pub(crate) mod registry;
pub(crate) mod values;

// Public API module - the only public interface for the container
pub mod api;

#[cfg(test)]
mod tests;
