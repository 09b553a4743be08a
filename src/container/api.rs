//! Public API for the container
//!
//! External modules should import from here rather than directly from the
//! internal modules. See the module documentation for the lifecycle and
//! teardown ordering.

pub use crate::container::error::{ContainerError, ContainerResult};
pub use crate::container::manager::Container;
pub use crate::container::provider::Provider;
