//! Provider trait
//!
//! A provider is an independently-authored module with a name and load/exit
//! lifecycle hooks. Providers register with a container, are loaded in
//! registration order and exited in reverse order. A provider typically uses
//! its `load` hook to set shared values, create queues and start listeners.

use std::sync::Arc;

use async_trait::async_trait;

use crate::container::error::ContainerResult;
use crate::container::manager::Container;

#[async_trait]
pub trait Provider: Send + Sync {
    /// Unique provider name; duplicate registrations are rejected.
    fn name(&self) -> &str;

    /// Called once during container load, in registration order. The first
    /// failure aborts the load sequence and propagates to the caller.
    async fn load(&self, container: &Arc<Container>) -> ContainerResult<()>;

    /// Called once during container exit, in reverse registration order,
    /// before the shutdown signal fires.
    async fn exit(&self);
}
