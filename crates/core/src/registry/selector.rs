//! Entry selection for queries and notification routing

use crate::entry::EntryController;
use crate::payload::{Payload, PayloadType};

/// Which entries a query or notification setup applies to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// Payload concrete type
    Type(PayloadType),
    /// Payload key
    Key(String),
    /// Both must match
    KeyAndType(String, PayloadType),
}

impl Selector {
    /// Match entries whose payload is a `T`.
    pub fn of_type<T: Payload>() -> Self {
        Self::Type(PayloadType::of::<T>())
    }

    /// Match entries keyed `key`, whatever their type.
    pub fn key(key: impl Into<String>) -> Self {
        Self::Key(key.into())
    }

    /// Match entries that are a `T` keyed `key`.
    pub fn key_and_type<T: Payload>(key: impl Into<String>) -> Self {
        Self::KeyAndType(key.into(), PayloadType::of::<T>())
    }

    /// True if `entry` is selected.
    pub fn matches(&self, entry: &EntryController) -> bool {
        match self {
            Self::Type(payload_type) => entry.payload_type() == *payload_type,
            Self::Key(key) => entry.key_matches(key),
            Self::KeyAndType(key, payload_type) => {
                entry.payload_type() == *payload_type && entry.key_matches(key)
            }
        }
    }
}
