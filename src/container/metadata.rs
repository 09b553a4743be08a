//! String-keyed metadata store
//!
//! Free-form metadata shared across providers, keyed by name rather than by
//! type: unlike the value store, the same type may appear under any number of
//! keys. Values are type-erased at rest and typed at the call site; one
//! generic accessor covers what would otherwise be a per-type getter family.

use std::any::{type_name, Any};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::container::error::{ContainerError, ContainerResult};
use crate::core::sync::{handle_rwlock_read, handle_rwlock_write};

#[derive(Default)]
pub(crate) struct MetadataStore {
    entries: RwLock<HashMap<String, Arc<dyn Any + Send + Sync>>>,
}

impl MetadataStore {
    /// Store `value` under `key`, replacing any previous entry.
    pub fn set<T: Any + Send + Sync>(&self, key: impl Into<String>, value: T) -> ContainerResult<()> {
        let mut entries = handle_rwlock_write(self.entries.write(), Self::poisoned)?;
        entries.insert(key.into(), Arc::new(value));
        Ok(())
    }

    /// Retrieve the entry under `key` as a `T`.
    ///
    /// A missing key and an entry of a different type are distinct errors;
    /// the latter names the expected type.
    pub fn get<T: Any + Send + Sync>(&self, key: &str) -> ContainerResult<Arc<T>> {
        let entries = handle_rwlock_read(self.entries.read(), Self::poisoned)?;
        let entry = entries
            .get(key)
            .cloned()
            .ok_or_else(|| ContainerError::MetadataNotFound {
                key: key.to_string(),
            })?;
        entry
            .downcast::<T>()
            .map_err(|_| ContainerError::MetadataType {
                key: key.to_string(),
                expected: type_name::<T>(),
            })
    }

    pub fn contains(&self, key: &str) -> ContainerResult<bool> {
        let entries = handle_rwlock_read(self.entries.read(), Self::poisoned)?;
        Ok(entries.contains_key(key))
    }

    fn poisoned(message: String) -> ContainerError {
        ContainerError::Poisoned { message }
    }
}
