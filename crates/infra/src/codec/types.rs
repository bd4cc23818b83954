//! Payload type registry for snapshot encoding
//!
//! Every payload type that may appear in a snapshot is registered once at
//! startup under a stable tag. Decoding looks the tag up; encoding looks the
//! concrete type up.

use std::collections::HashMap;
use std::fmt;

use lazycache_core::{Payload, PayloadType};
use lazycache_domain::{CacheError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

type DecodeFn = fn(Value) -> serde_json::Result<Box<dyn Payload>>;
type EncodeFn = fn(&dyn Payload) -> Option<serde_json::Result<Value>>;

#[derive(Clone)]
struct Registration {
    tag: String,
    decode: DecodeFn,
    encode: EncodeFn,
}

fn decode_as<T>(state: Value) -> serde_json::Result<Box<dyn Payload>>
where
    T: Payload + DeserializeOwned,
{
    let payload: T = serde_json::from_value(state)?;
    Ok(Box::new(payload))
}

fn encode_as<T>(payload: &dyn Payload) -> Option<serde_json::Result<Value>>
where
    T: Payload + Serialize,
{
    payload.downcast_ref::<T>().map(serde_json::to_value)
}

/// Tag <-> payload type mapping
#[derive(Clone, Default)]
pub struct PayloadTypes {
    by_tag: HashMap<String, Registration>,
    by_type: HashMap<PayloadType, String>,
}

impl PayloadTypes {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `T` under `tag`.
    ///
    /// # Errors
    /// Returns `CacheError::InvalidArgument` for an empty tag, a tag already
    /// in use, or a type already registered under another tag.
    pub fn register<T>(&mut self, tag: impl Into<String>) -> Result<&mut Self>
    where
        T: Payload + Serialize + DeserializeOwned,
    {
        let tag = tag.into();
        let payload_type = PayloadType::of::<T>();

        if tag.trim().is_empty() {
            return Err(CacheError::InvalidArgument(format!(
                "empty type tag for {}",
                payload_type.name()
            )));
        }
        if self.by_tag.contains_key(&tag) {
            return Err(CacheError::InvalidArgument(format!("type tag '{tag}' already registered")));
        }
        if let Some(existing) = self.by_type.get(&payload_type) {
            return Err(CacheError::InvalidArgument(format!(
                "{} already registered as '{existing}'",
                payload_type.name()
            )));
        }

        self.by_type.insert(payload_type, tag.clone());
        self.by_tag.insert(
            tag.clone(),
            Registration { tag, decode: decode_as::<T>, encode: encode_as::<T> },
        );
        Ok(self)
    }

    /// Builder form of [`PayloadTypes::register`].
    ///
    /// # Errors
    /// Same as `register`.
    pub fn with<T>(mut self, tag: impl Into<String>) -> Result<Self>
    where
        T: Payload + Serialize + DeserializeOwned,
    {
        self.register::<T>(tag)?;
        Ok(self)
    }

    /// Tag registered for the concrete type of `payload`.
    pub fn tag_of(&self, payload: &dyn Payload) -> Option<&str> {
        self.by_type.get(&PayloadType::of_payload(payload)).map(String::as_str)
    }

    /// True if `tag` is registered.
    pub fn contains_tag(&self, tag: &str) -> bool {
        self.by_tag.contains_key(tag)
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.by_tag.len()
    }

    /// True if no type is registered.
    pub fn is_empty(&self) -> bool {
        self.by_tag.is_empty()
    }

    /// Serialize `payload` and return it with its tag.
    ///
    /// `None` when the payload's type is not registered.
    pub(crate) fn encode(&self, payload: &dyn Payload) -> Option<(&str, serde_json::Result<Value>)> {
        let tag = self.tag_of(payload)?;
        let registration = self.by_tag.get(tag)?;
        let state = (registration.encode)(payload)?;
        Some((registration.tag.as_str(), state))
    }

    /// Rebuild a payload from its tagged state.
    ///
    /// `None` when `tag` is not registered.
    pub(crate) fn decode(&self, tag: &str, state: Value) -> Option<serde_json::Result<Box<dyn Payload>>> {
        self.by_tag.get(tag).map(|registration| (registration.decode)(state))
    }
}

impl fmt::Debug for PayloadTypes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tags: Vec<_> = self.by_tag.keys().collect();
        tags.sort();
        f.debug_struct("PayloadTypes").field("tags", &tags).finish()
    }
}
