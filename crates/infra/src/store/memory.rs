//! In-process snapshot buffer

use lazycache_core::{Payload, PersistenceStore};
use lazycache_domain::Result;
use parking_lot::RwLock;
use tracing::debug;

use crate::codec::PayloadCodec;
use crate::errors::report;

/// Keeps the last saved snapshot as text
///
/// Goes through the same codec as [`super::FileStore`], so a payload set
/// restored from memory is a fresh copy, never the saved instances.
#[derive(Debug)]
pub struct MemoryStore {
    codec: PayloadCodec,
    buffer: RwLock<String>,
}

impl MemoryStore {
    /// Empty in-memory store.
    pub fn new(codec: PayloadCodec) -> Self {
        Self::with_contents(codec, String::new())
    }

    /// Start from existing snapshot text.
    pub fn with_contents(codec: PayloadCodec, contents: impl Into<String>) -> Self {
        Self { codec, buffer: RwLock::new(contents.into()) }
    }

    /// Current snapshot text, empty until the first save.
    pub fn contents(&self) -> String {
        self.buffer.read().clone()
    }
}

impl PersistenceStore for MemoryStore {
    fn save(&self, payloads: &[&dyn Payload]) -> Result<()> {
        let text = self.codec.encode(payloads).map_err(|err| report("memory store save", err))?;
        *self.buffer.write() = text;
        debug!(records = payloads.len(), "saved snapshot to memory");
        Ok(())
    }

    fn load(&self) -> Result<Vec<Box<dyn Payload>>> {
        let buffer = self.buffer.read();
        self.codec.decode(&buffer).map_err(|err| report("memory store load", err))
    }
}
