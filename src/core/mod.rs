//! Core infrastructure shared across the container, bus and queue modules.

pub mod shutdown;
pub mod sync;
