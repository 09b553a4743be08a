//! Container Error Types

use crate::bus::api::BusError;
use crate::queue::api::QueueError;

#[derive(Debug, thiserror::Error)]
pub enum ContainerError {
    #[error("provider '{name}' is already registered")]
    DuplicateProvider { name: String },

    #[error("provider '{name}' failed to load: {source}")]
    ProviderLoad {
        name: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The type-indexed value store has no entry for the requested type.
    #[error("no value registered for type {type_name}")]
    ValueNotFound { type_name: &'static str },

    /// The metadata store has no entry under the requested key.
    #[error("no metadata registered under key '{key}'")]
    MetadataNotFound { key: String },

    /// The metadata entry under the key holds a different type.
    #[error("metadata under key '{key}' is not a {expected}")]
    MetadataType {
        key: String,
        expected: &'static str,
    },

    #[error(transparent)]
    Bus(#[from] BusError),

    #[error(transparent)]
    Queue(#[from] QueueError),

    #[error("container lock poisoned: {message}")]
    Poisoned { message: String },
}

impl ContainerError {
    /// Wrap a provider's own error for propagation out of `load`.
    pub fn provider(
        name: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::ProviderLoad {
            name: name.into(),
            source: source.into(),
        }
    }
}

/// Result type for container operations
pub type ContainerResult<T> = Result<T, ContainerError>;
