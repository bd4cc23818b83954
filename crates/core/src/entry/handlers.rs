//! Subscriber handlers for entry notifications

use std::fmt;
use std::sync::Arc;

use lazycache_domain::{LoadingKey, LoadingStatus, SubscriptionToken};

use crate::keys::next_subscription_token;

type LoadStatusFn = dyn Fn(LoadingStatus, LoadingKey, &str) + Send + Sync;
type InvalidateFn = dyn Fn() + Send + Sync;

/// Callback receiving `(status, loading_key, message)` for each load phase
///
/// Cloning keeps the token, so a clone unsubscribes the original.
#[derive(Clone)]
pub struct LoadStatusHandler {
    token: SubscriptionToken,
    callback: Arc<LoadStatusFn>,
}

impl LoadStatusHandler {
    /// Wrap `callback` under a fresh subscription token.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(LoadingStatus, LoadingKey, &str) + Send + Sync + 'static,
    {
        Self { token: next_subscription_token(), callback: Arc::new(callback) }
    }

    /// Token identifying this handler and its clones.
    pub fn token(&self) -> SubscriptionToken {
        self.token
    }

    pub(crate) fn notify(&self, status: LoadingStatus, key: LoadingKey, message: &str) {
        (self.callback)(status, key, message);
    }
}

impl fmt::Debug for LoadStatusHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadStatusHandler").field("token", &self.token).finish_non_exhaustive()
    }
}

/// Callback fired when an entry's data is invalidated or cleared
#[derive(Clone)]
pub struct InvalidateHandler {
    token: SubscriptionToken,
    callback: Arc<InvalidateFn>,
}

impl InvalidateHandler {
    /// Wrap `callback` under a fresh subscription token.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self { token: next_subscription_token(), callback: Arc::new(callback) }
    }

    /// Token identifying this handler and its clones.
    pub fn token(&self) -> SubscriptionToken {
        self.token
    }

    pub(crate) fn notify(&self) {
        (self.callback)();
    }
}

impl fmt::Debug for InvalidateHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InvalidateHandler").field("token", &self.token).finish_non_exhaustive()
    }
}
