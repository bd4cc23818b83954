//! Process-wide key generators
//!
//! Loading keys and subscription tokens are drawn from two independent
//! atomic counters. Both start at 1 and are never reused while the process
//! runs.

use std::sync::atomic::{AtomicU64, Ordering};

use lazycache_domain::{LoadingKey, SubscriptionToken};

static NEXT_LOADING_KEY: AtomicU64 = AtomicU64::new(1);
static NEXT_SUBSCRIPTION_TOKEN: AtomicU64 = AtomicU64::new(1);

/// Allocate a fresh loading key.
pub fn next_loading_key() -> LoadingKey {
    LoadingKey::new(NEXT_LOADING_KEY.fetch_add(1, Ordering::Relaxed))
}

/// Allocate a fresh subscription token.
pub fn next_subscription_token() -> SubscriptionToken {
    SubscriptionToken::new(NEXT_SUBSCRIPTION_TOKEN.fetch_add(1, Ordering::Relaxed))
}
