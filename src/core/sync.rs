//! Synchronization utilities for robust lock handling
//!
//! The registries in this crate (providers, queues, values, subscriber table)
//! follow a read/write lock discipline on `std::sync` primitives. A panic
//! while holding one of those locks poisons it; these helpers convert poison
//! errors into module-specific errors so poisoning surfaces as an error to
//! the caller instead of a second panic.

use std::sync::{LockResult, RwLockReadGuard, RwLockWriteGuard};

/// Handle a poisoned mutex with a module-specific error constructor.
pub fn handle_mutex_poison<T, E>(
    result: LockResult<T>,
    error_constructor: impl FnOnce(String) -> E,
) -> Result<T, E> {
    result.map_err(|poison_err| {
        error_constructor(format!(
            "mutex poisoned: a panic occurred while the lock was held ({poison_err:?})"
        ))
    })
}

/// Handle a poisoned RwLock read with a module-specific error constructor.
pub fn handle_rwlock_read<T, E>(
    result: LockResult<RwLockReadGuard<T>>,
    error_constructor: impl FnOnce(String) -> E,
) -> Result<RwLockReadGuard<T>, E> {
    result.map_err(|poison_err| {
        error_constructor(format!(
            "rwlock read poisoned: a panic occurred while the write lock was held ({poison_err:?})"
        ))
    })
}

/// Handle a poisoned RwLock write with a module-specific error constructor.
pub fn handle_rwlock_write<T, E>(
    result: LockResult<RwLockWriteGuard<T>>,
    error_constructor: impl FnOnce(String) -> E,
) -> Result<RwLockWriteGuard<T>, E> {
    result.map_err(|poison_err| {
        error_constructor(format!(
            "rwlock write poisoned: a panic occurred while the lock was held ({poison_err:?})"
        ))
    })
}
