//! Cache registry service
//!
//! Owns the ordered set of entry controllers. Membership is by identity
//! (`Arc` pointer equality); keys and types are not unique.
//!
//! Lock order: persistence, then entries, then per-entry locks. Broadcasts
//! and notification setup work on a snapshot of the entry list so callbacks
//! may change membership.

use std::fmt;
use std::sync::Arc;

use futures::future::join_all;
use lazycache_domain::{
    BulkLoadReport, CacheError, EntryFailure, LoadOutcome, LoadStats, LoadingKey,
    NotificationAction, Result,
};
use parking_lot::{Mutex, RwLock};
use tracing::{debug, info};

use super::selector::Selector;
use crate::entry::{EntryController, InvalidateHandler, LoadStatusHandler};
use crate::payload::Payload;
use crate::runtime::{Completion, WorkerPool};
use crate::stats::LoadMetrics;
use crate::store::PersistenceStore;

/// Shared handle to a set of cache entries
///
/// Cloning is cheap; clones see the same entries and store.
#[derive(Clone)]
pub struct CacheRegistry {
    inner: Arc<RegistryInner>,
}

struct RegistryInner {
    entries: RwLock<Vec<Arc<EntryController>>>,
    store: RwLock<Option<Arc<dyn PersistenceStore>>>,
    // Serialises save and load against each other
    persistence: Mutex<()>,
    pool: WorkerPool,
    metrics: Arc<LoadMetrics>,
}

impl CacheRegistry {
    /// Create an empty registry with no store bound.
    pub fn new(pool: WorkerPool) -> Self {
        Self {
            inner: Arc::new(RegistryInner {
                entries: RwLock::new(Vec::new()),
                store: RwLock::new(None),
                persistence: Mutex::new(()),
                pool,
                metrics: Arc::new(LoadMetrics::new()),
            }),
        }
    }

    /// Create an empty registry bound to `store`.
    pub fn with_store(pool: WorkerPool, store: Arc<dyn PersistenceStore>) -> Self {
        let registry = Self::new(pool);
        registry.setup_store(store);
        registry
    }

    /// Bind or replace the persistence store.
    pub fn setup_store(&self, store: Arc<dyn PersistenceStore>) {
        *self.inner.store.write() = Some(store);
    }

    /// True once a store is bound.
    pub fn has_store(&self) -> bool {
        self.inner.store.read().is_some()
    }

    fn store(&self) -> Result<Arc<dyn PersistenceStore>> {
        self.inner.store.read().clone().ok_or_else(CacheError::store_undefined)
    }

    // Persistence
    // -----------------------------------------------------------------

    /// Write every entry's payload, in registry order, to the bound store.
    ///
    /// Payloads are saved as they are; nothing is loaded first. Membership
    /// changes wait until the save finishes.
    ///
    /// # Errors
    /// Returns `CacheError::Config` with no store bound, or the store's error.
    pub fn save(&self) -> Result<()> {
        let store = self.store()?;
        let _persistence = self.inner.persistence.lock();
        let entries = self.inner.entries.read();

        let guards: Vec<_> = entries.iter().map(|entry| entry.data()).collect();
        let payloads: Vec<&dyn Payload> = guards.iter().map(|guard| &**guard).collect();
        store.save(&payloads)?;

        debug!(entries = payloads.len(), "registry saved");
        Ok(())
    }

    /// Restore entries from the store and load each one in turn on the
    /// calling thread.
    ///
    /// Restored entries stay registered even if a later load fails. The
    /// persistence lock is held throughout, so load-status handlers must not
    /// call `save` or `load` on this registry.
    ///
    /// # Errors
    /// Returns `CacheError::Config` with no store bound, the store's error, or
    /// the first payload load failure.
    pub fn load(&self) -> Result<Vec<Arc<EntryController>>> {
        let store = self.store()?;
        let _persistence = self.inner.persistence.lock();
        let added = self.restore_entries(store.as_ref())?;

        for entry in &added {
            entry.load_with_context(true)?;
        }

        info!(restored = added.len(), "registry load complete");
        Ok(added)
    }

    /// Restore entries on the worker pool and load them concurrently.
    ///
    /// `callback` runs exactly once, on a worker thread, after every
    /// triggered load has settled. It receives the same result as the
    /// returned completion.
    pub fn load_with_callback<F>(&self, callback: F) -> Completion<BulkLoadReport>
    where
        F: FnOnce(Result<BulkLoadReport>) + Send + 'static,
    {
        let registry = self.clone();
        let pool = self.inner.pool.clone();
        self.inner.pool.spawn_async("registry bulk load", async move {
            let result = registry.bulk_load().await;
            let delivered = result.clone();
            pool.spawn("registry bulk load callback", move || {
                callback(delivered);
                Ok(())
            })
            .join()
            .await?;
            result
        })
    }

    async fn bulk_load(&self) -> Result<BulkLoadReport> {
        let store = self.store()?;
        let registry = self.clone();
        let added = self
            .inner
            .pool
            .spawn("registry restore", move || {
                let _persistence = registry.inner.persistence.lock();
                registry.restore_entries(store.as_ref())
            })
            .join()
            .await?;

        let loads = added.iter().map(|entry| {
            let entry = Arc::clone(entry);
            self.inner
                .pool
                .spawn(format!("restore load '{}'", entry.key()), move || Ok(entry.guarded_load(true)))
                .join()
        });
        let outcomes = join_all(loads).await;

        let mut report = BulkLoadReport { added: added.len(), ..BulkLoadReport::default() };
        for (index, (entry, outcome)) in added.iter().zip(outcomes).enumerate() {
            match outcome.and_then(|result| result) {
                Ok(LoadOutcome::Loaded) => report.loaded += 1,
                Ok(LoadOutcome::AlreadyCached | LoadOutcome::InFlight) => report.skipped += 1,
                Err(error) => report.failures.push(EntryFailure { index, key: entry.key(), error }),
            }
        }

        info!(
            added = report.added,
            loaded = report.loaded,
            skipped = report.skipped,
            failed = report.failures.len(),
            "registry bulk load complete"
        );
        Ok(report)
    }

    // Caller holds the persistence lock
    fn restore_entries(&self, store: &dyn PersistenceStore) -> Result<Vec<Arc<EntryController>>> {
        let payloads = store.load()?;
        let added: Vec<_> = payloads.into_iter().map(|payload| self.wrap(payload)).collect();
        self.inner.entries.write().extend(added.iter().cloned());
        debug!(restored = added.len(), "entries restored from store");
        Ok(added)
    }

    fn wrap(&self, payload: Box<dyn Payload>) -> Arc<EntryController> {
        Arc::new(EntryController::with_metrics(
            payload,
            self.inner.pool.clone(),
            Arc::clone(&self.inner.metrics),
        ))
    }

    // Broadcasts
    // -----------------------------------------------------------------

    /// Clear every entry, in registry order, on the calling thread.
    pub fn clear(&self) {
        for entry in self.entries() {
            entry.clear();
        }
    }

    /// Invalidate every entry. The completion settles when all have.
    pub fn invalidate(&self) -> Completion<()> {
        let pending: Vec<_> = self.entries().iter().map(|entry| entry.invalidate()).collect();
        self.inner.pool.spawn_async("registry invalidate", async move {
            join_all(pending.into_iter().map(Completion::join)).await.into_iter().collect()
        })
    }

    // Membership
    // -----------------------------------------------------------------

    /// Register an existing entry. Returns false if it is already a member.
    pub fn add(&self, entry: Arc<EntryController>) -> bool {
        let mut entries = self.inner.entries.write();
        if entries.iter().any(|existing| Arc::ptr_eq(existing, &entry)) {
            return false;
        }
        entries.push(entry);
        true
    }

    /// Wrap `payload` in a new entry and register it.
    pub fn insert<P: Payload>(&self, payload: P) -> Arc<EntryController> {
        self.insert_boxed(Box::new(payload))
    }

    /// Wrap an already boxed payload in a new entry and register it.
    pub fn insert_boxed(&self, payload: Box<dyn Payload>) -> Arc<EntryController> {
        let entry = self.wrap(payload);
        self.inner.entries.write().push(Arc::clone(&entry));
        entry
    }

    /// Returns true if `entry` was a member.
    pub fn remove(&self, entry: &Arc<EntryController>) -> bool {
        let mut entries = self.inner.entries.write();
        match entries.iter().position(|existing| Arc::ptr_eq(existing, entry)) {
            Some(index) => {
                entries.remove(index);
                true
            }
            None => false,
        }
    }

    // Queries
    // -----------------------------------------------------------------

    /// Entries matching `selector`, in registry order.
    pub fn get_data(&self, selector: &Selector) -> Vec<Arc<EntryController>> {
        self.inner.entries.read().iter().filter(|entry| selector.matches(entry)).cloned().collect()
    }

    /// Entries whose payload is a `T`, in registry order.
    pub fn by_type<T: Payload>(&self) -> Vec<Arc<EntryController>> {
        self.get_data(&Selector::of_type::<T>())
    }

    /// Entries whose payload key equals `key`, in registry order.
    pub fn by_key(&self, key: &str) -> Vec<Arc<EntryController>> {
        self.get_data(&Selector::key(key))
    }

    /// Entries that are both a `T` and keyed `key`.
    pub fn by_key_and_type<T: Payload>(&self, key: &str) -> Vec<Arc<EntryController>> {
        self.get_data(&Selector::key_and_type::<T>(key))
    }

    fn none_match(&self, selector: &Selector) -> bool {
        !self.inner.entries.read().iter().any(|entry| selector.matches(entry))
    }

    /// True when no entry holds a `T`.
    pub fn empty_by_type<T: Payload>(&self) -> bool {
        self.none_match(&Selector::of_type::<T>())
    }

    /// True if no entry is a `T` keyed `key`.
    pub fn empty_by_type_and_key<T: Payload>(&self, key: &str) -> bool {
        self.none_match(&Selector::key_and_type::<T>(key))
    }

    /// True if the registry holds no entries.
    pub fn is_empty(&self) -> bool {
        self.inner.entries.read().is_empty()
    }

    /// Number of registered entries.
    pub fn len(&self) -> usize {
        self.inner.entries.read().len()
    }

    /// Snapshot of all entries, in registry order.
    pub fn entries(&self) -> Vec<Arc<EntryController>> {
        self.inner.entries.read().clone()
    }

    // Notifications
    // -----------------------------------------------------------------

    /// Subscribe or unsubscribe `handler` on every entry matching `selector`.
    ///
    /// For [`NotificationAction::Add`] each match gets a fresh loading key and
    /// the key of the first match is returned. Otherwise returns `None`.
    pub fn setup_load_notification(
        &self,
        selector: &Selector,
        action: NotificationAction,
        handler: &LoadStatusHandler,
    ) -> Option<LoadingKey> {
        let matches = self.get_data(selector);
        match action {
            NotificationAction::Add => {
                let mut first = None;
                for entry in &matches {
                    let key = entry.subscribe_load(handler);
                    first.get_or_insert(key);
                }
                first
            }
            NotificationAction::Remove => {
                for entry in &matches {
                    entry.unsubscribe_load(handler.token());
                }
                None
            }
        }
    }

    /// Add or remove `handler` as an invalidate subscriber on every entry matching `selector`.
    pub fn setup_invalidate_notification(
        &self,
        selector: &Selector,
        action: NotificationAction,
        handler: &InvalidateHandler,
    ) {
        for entry in self.get_data(selector) {
            match action {
                NotificationAction::Add => entry.subscribe_invalidate(handler),
                NotificationAction::Remove => {
                    entry.unsubscribe_invalidate(handler.token());
                }
            }
        }
    }

    // Inspection
    // -----------------------------------------------------------------

    /// Load counters for entries this registry created.
    pub fn stats(&self) -> LoadStats {
        self.inner.metrics.snapshot()
    }

    /// Worker pool shared by every entry.
    pub fn pool(&self) -> &WorkerPool {
        &self.inner.pool
    }
}

impl fmt::Debug for CacheRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheRegistry")
            .field("entries", &self.len())
            .field("has_store", &self.has_store())
            .field("pool", &self.inner.pool)
            .finish()
    }
}
