//! Entry controller: lazy-load and invalidate state machine for one payload
//!
//! States are `Uncached -> Loading -> Cached`; invalidate and clear fall back
//! to `Uncached`. The payload's own cached flag is the source of truth.
//!
//! Lock order inside an entry is gate, then payload, then key. Subscriber
//! lists are cloned before any callback runs, so handlers may subscribe or
//! unsubscribe from inside a notification.

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::{Duration, Instant};

use lazycache_domain::constants::{LOAD_COMPLETE_MESSAGE, LOAD_STARTED_MESSAGE};
use lazycache_domain::{
    CacheError, LoadOutcome, LoadingKey, LoadingStatus, Result, SubscriptionToken,
};
use parking_lot::{
    MappedRwLockReadGuard, MappedRwLockWriteGuard, Mutex, RwLock, RwLockReadGuard,
    RwLockWriteGuard,
};
use tracing::{debug, trace, warn};

use super::handlers::{InvalidateHandler, LoadStatusHandler};
use crate::keys::next_loading_key;
use crate::payload::{LoadContext, Payload, PayloadType};
use crate::runtime::{Completion, WorkerPool};
use crate::stats::LoadMetrics;

/// Owns one payload and coordinates its loading, invalidation and
/// notifications
pub struct EntryController {
    payload: RwLock<Box<dyn Payload>>,
    payload_type: PayloadType,
    // Copy of the payload key, readable while a load holds the payload lock
    key: RwLock<String>,
    in_flight: Mutex<()>,
    loading_key: AtomicU64,
    load_handlers: Mutex<Vec<LoadStatusHandler>>,
    invalidate_handlers: Mutex<Vec<InvalidateHandler>>,
    pool: WorkerPool,
    metrics: Arc<LoadMetrics>,
}

impl EntryController {
    /// Wrap `payload`. Background operations run on `pool`.
    pub fn new(payload: Box<dyn Payload>, pool: WorkerPool) -> Self {
        Self::with_metrics(payload, pool, Arc::new(LoadMetrics::new()))
    }

    pub(crate) fn with_metrics(
        payload: Box<dyn Payload>,
        pool: WorkerPool,
        metrics: Arc<LoadMetrics>,
    ) -> Self {
        let payload_type = PayloadType::of_payload(&*payload);
        let key = payload.key().to_string();
        Self {
            payload: RwLock::new(payload),
            payload_type,
            key: RwLock::new(key),
            in_flight: Mutex::new(()),
            loading_key: AtomicU64::new(LoadingKey::UNASSIGNED.get()),
            load_handlers: Mutex::new(Vec::new()),
            invalidate_handlers: Mutex::new(Vec::new()),
            pool,
            metrics,
        }
    }

    // Loading
    // -----------------------------------------------------------------

    /// Load the payload on the calling thread unless it is cached or another
    /// load is already running.
    ///
    /// # Errors
    /// Returns `CacheError::PayloadLoad` when the payload's load fails; the
    /// entry stays uncached and a later call retries.
    pub fn load(&self) -> Result<LoadOutcome> {
        self.load_with_context(false)
    }

    pub(crate) fn load_with_context(&self, internal: bool) -> Result<LoadOutcome> {
        let Some(_gate) = self.in_flight.try_lock() else {
            self.metrics.record_skipped();
            trace!(payload_type = %self.payload_type, "load already in flight");
            return Ok(LoadOutcome::InFlight);
        };

        if self.payload.read().is_cached() {
            self.metrics.record_skipped();
            return Ok(LoadOutcome::AlreadyCached);
        }

        let loading_key = self.loading_key();
        self.metrics.record_started();
        debug!(
            payload_type = %self.payload_type,
            key = %self.key(),
            %loading_key,
            internal,
            "payload load starting"
        );
        self.notify_load(LoadingStatus::Starting, loading_key, LOAD_STARTED_MESSAGE);

        let started = Instant::now();
        let result = self.run_payload_load(internal, loading_key);
        let elapsed = started.elapsed();

        match result {
            Ok(()) => {
                self.metrics.record_completed(elapsed);
                debug!(
                    payload_type = %self.payload_type,
                    %loading_key,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "payload load complete"
                );
                self.notify_load(LoadingStatus::Loaded, loading_key, LOAD_COMPLETE_MESSAGE);
                Ok(LoadOutcome::Loaded)
            }
            Err(err) => {
                self.metrics.record_failed(elapsed);
                let detail = format!("{err:#}");
                warn!(
                    payload_type = %self.payload_type,
                    key = %self.key(),
                    error = %detail,
                    "payload load failed"
                );
                Err(CacheError::PayloadLoad(format!("{}: {detail}", self.describe())))
            }
        }
    }

    /// Run the payload's own load under the payload write lock.
    ///
    /// Progress messages go through a channel to a dispatcher thread started
    /// on the first report; subscribers never run while this thread holds the
    /// lock. The dispatcher is drained before returning, so every `Loading`
    /// notification precedes `Loaded`.
    fn run_payload_load(&self, internal: bool, loading_key: LoadingKey) -> anyhow::Result<()> {
        thread::scope(|scope| {
            let (sender, receiver) = mpsc::channel::<String>();
            let receiver = Mutex::new(Some(receiver));
            let dispatcher = Mutex::new(None);

            let result = {
                let reporter = |message: &str| {
                    if let Some(receiver) = receiver.lock().take() {
                        *dispatcher.lock() = Some(scope.spawn(move || {
                            for queued in receiver {
                                self.notify_load(LoadingStatus::Loading, loading_key, &queued);
                            }
                        }));
                    }
                    // The dispatcher only hangs up by panicking in a handler
                    let _ = sender.send(message.to_string());
                };
                let ctx = LoadContext::new(internal, loading_key, &reporter);

                let mut payload = self.payload.write();
                let result = payload.load(&ctx);
                if result.is_ok() {
                    payload.set_cached(true);
                }
                *self.key.write() = payload.key().to_string();
                result
            };

            drop(sender);
            if let Some(handle) = dispatcher.into_inner() {
                if handle.join().is_err() {
                    warn!(payload_type = %self.payload_type, %loading_key, "progress handler panicked");
                }
            }
            result
        })
    }

    /// Load, turning a panicking payload into `CacheError::Task`.
    pub(crate) fn guarded_load(&self, internal: bool) -> Result<LoadOutcome> {
        match panic::catch_unwind(AssertUnwindSafe(|| self.load_with_context(internal))) {
            Ok(result) => result,
            Err(panic) => {
                self.metrics.record_failed(Duration::ZERO);
                let reason = panic_message(&*panic);
                warn!(payload_type = %self.payload_type, key = %self.key(), %reason, "payload load panicked");
                Err(CacheError::Task(format!("{} panicked while loading: {reason}", self.describe())))
            }
        }
    }

    /// Load on the worker pool, then hand the result to `callback`.
    ///
    /// The callback runs on the worker thread after the load returns,
    /// whether it succeeded, failed or panicked. The same result is available
    /// from the returned completion.
    pub fn load_with_callback<F>(self: &Arc<Self>, callback: F) -> Completion<LoadOutcome>
    where
        F: FnOnce(Result<LoadOutcome>) + Send + 'static,
    {
        let entry = Arc::clone(self);
        self.pool.spawn(format!("load {}", self.describe()), move || {
            let result = entry.guarded_load(false);
            callback(result.clone());
            result
        })
    }

    // Invalidation
    // -----------------------------------------------------------------

    /// Mark the payload uncached and fire invalidate subscribers, on the
    /// worker pool.
    pub fn invalidate(self: &Arc<Self>) -> Completion<()> {
        let entry = Arc::clone(self);
        self.pool.spawn(format!("invalidate {}", self.describe()), move || {
            entry.invalidate_now();
            Ok(())
        })
    }

    fn invalidate_now(&self) {
        self.payload.write().set_cached(false);
        self.metrics.record_invalidation();
        debug!(payload_type = %self.payload_type, key = %self.key(), "entry invalidated");
        self.notify_invalidate();
    }

    /// Fire invalidate subscribers without touching the cached flag.
    ///
    /// For payloads that track partial state themselves: reset that state
    /// first, then call this so listeners rebuild only the stale part.
    pub fn invalidate_part(&self) {
        self.notify_invalidate();
    }

    /// Drop the payload's data and invalidate, on the calling thread.
    pub fn clear(&self) {
        {
            let mut payload = self.payload.write();
            payload.clear();
            payload.set_cached(false);
            *self.key.write() = payload.key().to_string();
        }
        self.metrics.record_invalidation();
        debug!(payload_type = %self.payload_type, key = %self.key(), "entry cleared");
        self.notify_invalidate();
    }

    // Data access
    // -----------------------------------------------------------------

    /// Read the payload as-is. Never triggers a load.
    pub fn data(&self) -> MappedRwLockReadGuard<'_, dyn Payload> {
        RwLockReadGuard::map(self.payload.read(), |payload| &**payload)
    }

    /// Read the payload as `T`, or `None` if it is another type.
    pub fn downcast<T: Payload>(&self) -> Option<MappedRwLockReadGuard<'_, T>> {
        RwLockReadGuard::try_map(self.payload.read(), |payload| (**payload).downcast_ref::<T>())
            .ok()
    }

    /// Write access to the payload as `T`.
    ///
    /// Key changes made through the guard reach key queries after the next
    /// load, clear or [`EntryController::refresh_key`].
    pub fn downcast_mut<T: Payload>(&self) -> Option<MappedRwLockWriteGuard<'_, T>> {
        RwLockWriteGuard::try_map(self.payload.write(), |payload| {
            (**payload).downcast_mut::<T>()
        })
        .ok()
    }

    /// Load if needed, then read the payload as `T`.
    ///
    /// # Errors
    /// Returns the load error, or `CacheError::InvalidArgument` when the
    /// payload is not a `T`.
    pub fn fetch<T: Payload>(&self) -> Result<MappedRwLockReadGuard<'_, T>> {
        self.load()?;
        self.downcast::<T>().ok_or_else(|| {
            CacheError::InvalidArgument(format!(
                "entry holds {} not {}",
                self.payload_type.name(),
                std::any::type_name::<T>()
            ))
        })
    }

    /// Re-read the payload key into the index used by queries.
    pub fn refresh_key(&self) {
        let key = self.payload.read().key().to_string();
        *self.key.write() = key;
    }

    // Subscriptions
    // -----------------------------------------------------------------

    /// Register `handler` for load notifications under a fresh loading key.
    ///
    /// Registering a token that is already present keeps a single handler but
    /// still rotates the key.
    pub fn subscribe_load(&self, handler: &LoadStatusHandler) -> LoadingKey {
        let key = next_loading_key();
        self.loading_key.store(key.get(), Ordering::SeqCst);

        let mut handlers = self.load_handlers.lock();
        if !handlers.iter().any(|h| h.token() == handler.token()) {
            handlers.push(handler.clone());
        }
        key
    }

    /// Returns true if a handler with `token` was registered.
    pub fn unsubscribe_load(&self, token: SubscriptionToken) -> bool {
        let mut handlers = self.load_handlers.lock();
        let before = handlers.len();
        handlers.retain(|h| h.token() != token);
        handlers.len() != before
    }

    /// Register `handler` for invalidate notifications. Duplicate tokens are
    /// ignored.
    pub fn subscribe_invalidate(&self, handler: &InvalidateHandler) {
        let mut handlers = self.invalidate_handlers.lock();
        if !handlers.iter().any(|h| h.token() == handler.token()) {
            handlers.push(handler.clone());
        }
    }

    /// Returns true if a handler with `token` was registered.
    pub fn unsubscribe_invalidate(&self, token: SubscriptionToken) -> bool {
        let mut handlers = self.invalidate_handlers.lock();
        let before = handlers.len();
        handlers.retain(|h| h.token() != token);
        handlers.len() != before
    }

    fn notify_load(&self, status: LoadingStatus, key: LoadingKey, message: &str) {
        let handlers = self.load_handlers.lock().clone();
        for handler in &handlers {
            handler.notify(status, key, message);
        }
    }

    fn notify_invalidate(&self) {
        let handlers = self.invalidate_handlers.lock().clone();
        for handler in &handlers {
            handler.notify();
        }
    }

    // Inspection
    // -----------------------------------------------------------------

    /// Payload key as of the last load, clear or refresh.
    pub fn key(&self) -> String {
        self.key.read().clone()
    }

    pub(crate) fn key_matches(&self, key: &str) -> bool {
        *self.key.read() == key
    }

    /// Concrete type of the wrapped payload.
    pub fn payload_type(&self) -> PayloadType {
        self.payload_type
    }

    /// True if the wrapped payload is a `T`.
    pub fn is<T: Payload>(&self) -> bool {
        self.payload_type == PayloadType::of::<T>()
    }

    /// Blocks while a load or invalidation holds the payload. Safe to call
    /// from any notification handler.
    pub fn is_cached(&self) -> bool {
        self.payload.read().is_cached()
    }

    /// Key from the most recent load subscription, or
    /// [`LoadingKey::UNASSIGNED`].
    pub fn loading_key(&self) -> LoadingKey {
        LoadingKey::new(self.loading_key.load(Ordering::SeqCst))
    }

    /// Number of registered load-status handlers.
    pub fn load_subscriber_count(&self) -> usize {
        self.load_handlers.lock().len()
    }

    /// Number of registered invalidate handlers.
    pub fn invalidate_subscriber_count(&self) -> usize {
        self.invalidate_handlers.lock().len()
    }

    fn describe(&self) -> String {
        format!("{} '{}'", self.payload_type, self.key())
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

impl fmt::Debug for EntryController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntryController")
            .field("payload_type", &self.payload_type)
            .field("key", &*self.key.read())
            .field("loading_key", &self.loading_key())
            .field("load_subscribers", &self.load_subscriber_count())
            .field("invalidate_subscribers", &self.invalidate_subscriber_count())
            .finish_non_exhaustive()
    }
}
