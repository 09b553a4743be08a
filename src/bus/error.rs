//! Bus Error Types

#[derive(Debug, thiserror::Error)]
pub enum BusError {
    /// Publishing or subscribing after the bus shut down. Always reported;
    /// a post-shutdown publish never silently delivers to nobody.
    #[error("message bus is shut down")]
    Shutdown,

    /// A tuple element did not hold the type the handler expected.
    #[error("message value at index {index} is not a {expected}")]
    ValueMismatch {
        index: usize,
        expected: &'static str,
    },

    #[error("bus lock poisoned: {message}")]
    Poisoned { message: String },
}

/// Result type for bus operations
pub type BusResult<T> = Result<T, BusError>;
