//! Persistence store port definition
//!
//! Implemented by infrastructure adapters (in-memory buffer, file snapshot).

use lazycache_domain::Result;

use crate::payload::Payload;

/// Durable save/restore of a whole payload set
///
/// Order is significant: `load` must return payloads in the order they were
/// passed to the last `save`.
pub trait PersistenceStore: Send + Sync {
    /// Replace the stored snapshot with `payloads`.
    ///
    /// # Errors
    /// Returns `CacheError::Store` on backend or encoding failure.
    fn save(&self, payloads: &[&dyn Payload]) -> Result<()>;

    /// Read back the stored snapshot.
    ///
    /// Records whose concrete type cannot be resolved are skipped, not
    /// treated as errors.
    ///
    /// # Errors
    /// Returns `CacheError::Store` on backend or decoding failure.
    fn load(&self) -> Result<Vec<Box<dyn Payload>>>;
}
