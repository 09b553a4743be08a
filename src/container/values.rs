//! Type-indexed value store
//!
//! Shared values are stored by `TypeId` and retrieved by type: one value per
//! type, later `set` calls replace earlier ones. Lookups are exact type
//! matches; `get` is the fallible accessor, and the panicking convenience
//! lives on the container as `must_get`, kept out of the core paths.

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::container::error::{ContainerError, ContainerResult};
use crate::core::sync::{handle_rwlock_read, handle_rwlock_write};

#[derive(Default)]
pub(crate) struct ValueStore {
    values: RwLock<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>,
}

impl ValueStore {
    pub fn set<T: Any + Send + Sync>(&self, value: T) -> ContainerResult<()> {
        let mut values = handle_rwlock_write(self.values.write(), Self::poisoned)?;
        values.insert(TypeId::of::<T>(), Arc::new(value));
        Ok(())
    }

    pub fn get<T: Any + Send + Sync>(&self) -> ContainerResult<Arc<T>> {
        let values = handle_rwlock_read(self.values.read(), Self::poisoned)?;
        values
            .get(&TypeId::of::<T>())
            .cloned()
            .and_then(|value| value.downcast::<T>().ok())
            .ok_or(ContainerError::ValueNotFound {
                type_name: type_name::<T>(),
            })
    }

    fn poisoned(message: String) -> ContainerError {
        ContainerError::Poisoned { message }
    }
}
