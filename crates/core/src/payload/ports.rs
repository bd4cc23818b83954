//! Payload port
//!
//! A payload is the data object an entry wraps. It knows how to populate
//! itself, how to drop its data, and carries its own cached flag. The entry
//! controller decides when those operations run.

use std::any::Any;

use lazycache_domain::LoadingKey;

/// Object-safe access to the concrete type behind a `dyn Payload`
///
/// Implemented for every `'static` type. Call it on `&dyn Payload`, never on
/// a `Box<dyn Payload>`, or the box itself is what gets inspected.
pub trait AsAny: Any {
    /// Borrow as `Any` for downcasting.
    fn as_any(&self) -> &dyn Any;
    /// Mutable counterpart of [`AsAny::as_any`].
    fn as_any_mut(&mut self) -> &mut dyn Any;
    /// Fully qualified Rust type name, for logs and errors.
    fn type_name(&self) -> &'static str;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

/// Data wrapped by a cache entry
pub trait Payload: AsAny + Send + Sync {
    /// Lookup key; not required to be unique within a registry.
    fn key(&self) -> &str;

    /// True once loaded and until the next invalidation.
    fn is_cached(&self) -> bool;

    /// Set by the entry controller after a successful load and cleared on
    /// invalidation. Payloads should not flip it themselves.
    fn set_cached(&mut self, cached: bool);

    /// Populate the payload.
    ///
    /// Runs with the entry's payload lock held. Progress reported through
    /// `ctx` is delivered to load-status subscribers from a separate thread,
    /// so a subscriber that reads the entry waits for the load to finish
    /// instead of blocking it.
    ///
    /// # Errors
    /// Any error aborts the load; the entry stays uncached.
    fn load(&mut self, ctx: &LoadContext<'_>) -> anyhow::Result<()>;

    /// Drop loaded data.
    fn clear(&mut self);
}

/// Per-call information handed to [`Payload::load`]
pub struct LoadContext<'a> {
    internal: bool,
    loading_key: LoadingKey,
    reporter: &'a dyn Fn(&str),
}

impl<'a> LoadContext<'a> {
    /// Context for one load; `reporter` receives each progress message.
    pub fn new(internal: bool, loading_key: LoadingKey, reporter: &'a dyn Fn(&str)) -> Self {
        Self { internal, loading_key, reporter }
    }

    /// True when the registry triggered this load while restoring a snapshot,
    /// false for consumer-initiated loads.
    pub fn is_internal(&self) -> bool {
        self.internal
    }

    /// Key the entry announced with this load's notifications.
    pub fn loading_key(&self) -> LoadingKey {
        self.loading_key
    }

    /// Emit a `Loading` notification with `message` to the entry's load-status
    /// subscribers.
    pub fn report_progress(&self, message: &str) {
        (self.reporter)(message);
    }
}

impl std::fmt::Debug for LoadContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadContext")
            .field("internal", &self.internal)
            .field("loading_key", &self.loading_key)
            .finish_non_exhaustive()
    }
}

impl dyn Payload {
    /// Borrow as the concrete type `T`, if that is what this payload is.
    pub fn downcast_ref<T: Payload>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// Mutable counterpart of [`downcast_ref`](Self::downcast_ref).
    pub fn downcast_mut<T: Payload>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }

    /// True if the concrete type is `T`.
    pub fn is<T: Payload>(&self) -> bool {
        self.as_any().is::<T>()
    }
}

impl std::fmt::Debug for dyn Payload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Payload")
            .field("type", &self.type_name())
            .field("key", &self.key())
            .field("cached", &self.is_cached())
            .finish_non_exhaustive()
    }
}
