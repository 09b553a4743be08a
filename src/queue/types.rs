//! Queue configuration types

use crate::queue::error::{QueueError, QueueResult};

/// Default maximum simultaneous handler invocations.
pub const DEFAULT_CONCURRENCY: usize = 1;

/// Default subscriber channel capacity.
pub const DEFAULT_BUFFER_SIZE: usize = 200;

/// Configuration for a queue, fixed at creation time.
///
/// # Example
///
/// ```rust
/// use modhost::queue::api::QueueOptions;
///
/// let options = QueueOptions::new().concurrency(4).buffer_size(64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueOptions {
    concurrency: usize,
    buffer_size: usize,
}

impl Default for QueueOptions {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

impl QueueOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Maximum simultaneous handler invocations (default 1). Immutable once
    /// the queue is created.
    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Subscriber channel capacity (default 200).
    pub fn buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    /// Fail fast on non-positive values.
    pub(crate) fn validate(&self) -> QueueResult<()> {
        if self.concurrency == 0 {
            return Err(QueueError::InvalidOptions {
                field: "concurrency",
            });
        }
        if self.buffer_size == 0 {
            return Err(QueueError::InvalidOptions {
                field: "buffer_size",
            });
        }
        Ok(())
    }

    pub(crate) fn concurrency_limit(&self) -> usize {
        self.concurrency
    }

    pub(crate) fn buffer_capacity(&self) -> usize {
        self.buffer_size
    }
}
