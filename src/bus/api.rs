//! Public API for the message bus
//!
//! External modules should import from here rather than directly from the
//! internal modules. See the module documentation for the fan-out and
//! backpressure semantics.

pub use crate::bus::error::{BusError, BusResult};
pub use crate::bus::internal::MessageBus;
pub use crate::bus::message::Message;
