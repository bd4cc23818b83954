//! Entry factory

use std::sync::Arc;

use crate::entry::EntryController;
use crate::payload::Payload;
use crate::registry::CacheRegistry;

/// Register a default-constructed `T` with `registry`.
pub fn create_entry<T: Payload + Default>(registry: &CacheRegistry) -> Arc<EntryController> {
    registry.insert(T::default())
}

/// Register a prepared `payload` with `registry`.
pub fn create_entry_with<T: Payload>(registry: &CacheRegistry, payload: T) -> Arc<EntryController> {
    registry.insert(payload)
}
