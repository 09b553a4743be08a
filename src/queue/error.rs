//! Queue Error Types

use crate::bus::api::BusError;

#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    /// Configuration error at queue creation; values are never silently
    /// clamped.
    #[error("queue option '{field}' must be at least 1")]
    InvalidOptions { field: &'static str },

    /// `listen` was called on a queue whose loop already ran to termination
    /// (or is currently running). A queue is consumed by at most one listener
    /// loop, and a terminated loop never restarts.
    #[error("queue '{name}' listener already running or terminated")]
    ListenerUnavailable { name: String },

    /// The intake side of the buffer was closed by container teardown.
    #[error("queue '{name}' intake is closed")]
    IntakeClosed { name: String },

    #[error(transparent)]
    Bus(#[from] BusError),

    #[error("queue lock poisoned: {message}")]
    Poisoned { message: String },
}

/// Result type for queue operations
pub type QueueResult<T> = Result<T, QueueError>;
