//! Bulk restore reporting

use serde::{Deserialize, Serialize};

use crate::errors::CacheError;

/// Per-entry failure recorded during a concurrent bulk load
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryFailure {
    /// Position of the entry within the restored batch
    pub index: usize,
    /// Key of the entry that failed
    pub key: String,
    /// Why it failed
    pub error: CacheError,
}

/// Summary handed to the registry's bulk load callback
///
/// Every restored entry is counted in exactly one of `loaded`, `skipped`, or
/// `failures`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkLoadReport {
    /// Entries appended to the registry from the store
    pub added: usize,
    /// Entries whose payload load ran and succeeded
    pub loaded: usize,
    /// Entries that were already cached or already loading
    pub skipped: usize,
    /// One record per entry whose load failed, in registry order
    pub failures: Vec<EntryFailure>,
}

impl BulkLoadReport {
    /// True if no entry failed.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Number of entries accounted for so far.
    pub fn settled(&self) -> usize {
        self.loaded + self.skipped + self.failures.len()
    }
}
