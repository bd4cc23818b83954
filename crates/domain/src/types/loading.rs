//! Load notification vocabulary

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::UNASSIGNED_LOADING_KEY;

/// Phase reported to load-status subscribers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadingStatus {
    /// Emitted before the payload's load runs
    Starting,
    /// Progress reported by the payload itself while loading
    Loading,
    /// Emitted after the payload's load returned successfully
    Loaded,
}

crate::impl_cache_enum_conversions!(LoadingStatus {
    Starting => "starting",
    Loading => "loading",
    Loaded => "loaded",
});

/// Whether a notification setup call registers or unregisters a handler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationAction {
    Add,
    Remove,
}

crate::impl_cache_enum_conversions!(NotificationAction {
    Add => "add",
    Remove => "remove",
});

/// Process-unique key correlating load notifications to a subscription
///
/// Keys are handed out by an atomic counter starting at 1. An entry that never
/// had a load subscription reports [`LoadingKey::UNASSIGNED`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LoadingKey(u64);

impl LoadingKey {
    /// Key of an entry that has never had a load subscriber.
    pub const UNASSIGNED: Self = Self(UNASSIGNED_LOADING_KEY);

    /// Wrap a raw value.
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Raw value.
    pub const fn get(self) -> u64 {
        self.0
    }

    /// False only for [`LoadingKey::UNASSIGNED`].
    pub const fn is_assigned(self) -> bool {
        self.0 != UNASSIGNED_LOADING_KEY
    }
}

impl Default for LoadingKey {
    fn default() -> Self {
        Self::UNASSIGNED
    }
}

impl fmt::Display for LoadingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque handle identifying one registered handler
///
/// Fixed when the handler is created; unsubscribing requires the same token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubscriptionToken(u64);

impl SubscriptionToken {
    /// Wrap a raw value.
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Raw value.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriptionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// What a single entry load call actually did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadOutcome {
    /// The payload's load ran and succeeded
    Loaded,
    /// Nothing to do, the payload was already cached
    AlreadyCached,
    /// Another load held the entry's gate; this call was dropped
    InFlight,
}

impl LoadOutcome {
    /// True when this call invoked the payload's load operation.
    pub const fn did_load(self) -> bool {
        matches!(self, Self::Loaded)
    }
}
