//! Public API for the queue system
//!
//! External modules should import from here rather than directly from the
//! internal modules. See the module documentation for the listener and
//! shutdown semantics.

pub use crate::queue::error::{QueueError, QueueResult};
pub use crate::queue::handle::QueueHandle;
pub use crate::queue::listener::{Handler, HandlerError};
pub use crate::queue::types::{QueueOptions, DEFAULT_BUFFER_SIZE, DEFAULT_CONCURRENCY};
