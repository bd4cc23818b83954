//! `PersistenceStore` adapters
//!
//! - [`MemoryStore`]: snapshot text held in process
//! - [`FileStore`]: snapshot file replaced atomically on save

mod file;
mod memory;

use std::sync::Arc;

pub use file::FileStore;
use lazycache_core::PersistenceStore;
use lazycache_domain::{CacheError, Result, StoreConfig, StoreKind};
pub use memory::MemoryStore;

use crate::codec::PayloadCodec;

/// Open the store described by `config`.
///
/// # Errors
/// Returns `CacheError::Config` when a file store has no path.
pub fn open_store(config: &StoreConfig, codec: PayloadCodec) -> Result<Arc<dyn PersistenceStore>> {
    match config.kind {
        StoreKind::Memory => Ok(Arc::new(MemoryStore::new(codec))),
        StoreKind::File => {
            let path = config.path.clone().ok_or_else(|| {
                CacheError::Config("store.path is required for the file store".to_string())
            })?;
            Ok(Arc::new(FileStore::new(codec, path)))
        }
    }
}
