//! Serializable payloads shared by the infra integration tests

#![allow(dead_code)]

use lazycache_core::{LoadContext, Payload};
use lazycache_infra::{PayloadCodec, PayloadTypes};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestModel {
    pub key: String,
    pub model: String,
    #[serde(default)]
    pub cached: bool,
}

impl TestModel {
    pub fn new(key: &str, model: &str) -> Self {
        Self { key: key.to_string(), model: model.to_string(), cached: false }
    }
}

impl Payload for TestModel {
    fn key(&self) -> &str {
        &self.key
    }

    fn is_cached(&self) -> bool {
        self.cached
    }

    fn set_cached(&mut self, cached: bool) {
        self.cached = cached;
    }

    fn load(&mut self, ctx: &LoadContext<'_>) -> anyhow::Result<()> {
        ctx.report_progress("fetching model");
        if self.model.is_empty() {
            self.model = format!("loaded:{}", self.key);
        }
        Ok(())
    }

    fn clear(&mut self) {
        self.model.clear();
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Counter {
    pub hits: u32,
    #[serde(default)]
    pub cached: bool,
}

impl Payload for Counter {
    fn key(&self) -> &str {
        "counter"
    }

    fn is_cached(&self) -> bool {
        self.cached
    }

    fn set_cached(&mut self, cached: bool) {
        self.cached = cached;
    }

    fn load(&mut self, _ctx: &LoadContext<'_>) -> anyhow::Result<()> {
        self.hits += 1;
        Ok(())
    }

    fn clear(&mut self) {
        self.hits = 0;
    }
}

pub fn types() -> PayloadTypes {
    PayloadTypes::new()
        .with::<TestModel>("test_model")
        .and_then(|types| types.with::<Counter>("counter"))
        .expect("payload types should register")
}

pub fn codec() -> PayloadCodec {
    PayloadCodec::new(types())
}
