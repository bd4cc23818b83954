//! Cache context - wires configuration, workers, store and registry

use std::sync::Arc;

use lazycache_core::{CacheRegistry, PersistenceStore, WorkerPool};
use lazycache_domain::{CacheConfig, Result};

use crate::codec::{PayloadCodec, PayloadTypes};
use crate::config;
use crate::observability::init_tracing;
use crate::store::open_store;

/// Everything a process needs to use the cache
pub struct CacheContext {
    /// Validated configuration the context was built from.
    pub config: CacheConfig,
    /// Worker pool shared with the registry.
    pub pool: WorkerPool,
    /// Store bound to the registry.
    pub store: Arc<dyn PersistenceStore>,
    /// Registry ready for entries.
    pub registry: CacheRegistry,
}

impl CacheContext {
    /// Build from an explicit configuration.
    ///
    /// `types` lists every payload type that may be saved or restored.
    ///
    /// # Errors
    /// Returns the validation error for a bad configuration, or
    /// `CacheError::Config` when the worker runtime cannot start.
    pub fn build(config: CacheConfig, types: PayloadTypes) -> Result<Self> {
        config.validate()?;

        let payload_types = types.len();
        let pool = WorkerPool::new(&config.workers)?;
        let store = open_store(&config.store, PayloadCodec::new(types))?;
        let registry = CacheRegistry::with_store(pool.clone(), Arc::clone(&store));

        tracing::info!(
            store = %config.store.kind,
            worker_threads = config.workers.worker_threads,
            max_blocking_threads = config.workers.max_blocking_threads,
            payload_types,
            "cache context ready"
        );

        Ok(Self { config, pool, store, registry })
    }

    /// Load configuration, install logging, then [`CacheContext::build`].
    ///
    /// # Errors
    /// Propagates configuration loading and build errors.
    pub fn from_environment(types: PayloadTypes) -> Result<Self> {
        let config = config::load()?;
        if !init_tracing(&config.logging) {
            tracing::debug!("tracing subscriber already installed");
        }
        Self::build(config, types)
    }
}
