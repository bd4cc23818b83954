//! Shared fixtures for core integration tests

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::bail;
use lazycache_core::{CacheRegistry, LoadContext, Payload, PersistenceStore, Result, WorkerPool};
use lazycache_domain::WorkerConfig;
use parking_lot::Mutex;

/// Payload with observable load behaviour
#[derive(Debug, Clone, Default)]
pub struct TestCacheData {
    pub key: String,
    pub model: String,
    pub cached: bool,
    /// Value `model` takes once loaded; unchanged when `None`
    pub loaded_model: Option<String>,
    pub delay: Option<Duration>,
    pub fail: bool,
    pub panic: bool,
    /// Messages reported through the load context, in order
    pub progress: Vec<String>,
    pub loads: Arc<AtomicUsize>,
}

impl TestCacheData {
    pub fn new(key: &str, model: &str) -> Self {
        Self { key: key.to_string(), model: model.to_string(), ..Self::default() }
    }

    pub fn slow(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn reporting(mut self, messages: &[&str]) -> Self {
        self.progress = messages.iter().map(|message| message.to_string()).collect();
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn panicking(mut self) -> Self {
        self.panic = true;
        self
    }

    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

impl Payload for TestCacheData {
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
        self.loads.fetch_add(1, Ordering::SeqCst);
        for message in &self.progress {
            ctx.report_progress(message);
        }
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        if self.panic {
            panic!("test payload '{}' exploded", self.key);
        }
        if self.fail {
            bail!("model source for '{}' unavailable", self.key);
        }
        if let Some(model) = &self.loaded_model {
            self.model = model.clone();
        }
        Ok(())
    }

    fn clear(&mut self) {
        self.model.clear();
    }
}

/// Second payload type for type-based queries
#[derive(Debug, Clone, Default)]
pub struct OtherCacheData {
    pub cached: bool,
}

impl Payload for OtherCacheData {
    fn key(&self) -> &str {
        "other"
    }

    fn is_cached(&self) -> bool {
        self.cached
    }

    fn set_cached(&mut self, cached: bool) {
        self.cached = cached;
    }

    fn load(&mut self, _ctx: &LoadContext<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    fn clear(&mut self) {}
}

/// Store keeping copies of saved `TestCacheData` payloads
///
/// Other payload types are dropped on save, like an unregistered tag.
#[derive(Debug, Default)]
pub struct RecordingStore {
    saved: Mutex<Vec<TestCacheData>>,
    saves: AtomicUsize,
}

impl RecordingStore {
    pub fn seeded(payloads: Vec<TestCacheData>) -> Self {
        Self { saved: Mutex::new(payloads), saves: AtomicUsize::new(0) }
    }

    pub fn saved(&self) -> Vec<TestCacheData> {
        self.saved.lock().clone()
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl PersistenceStore for RecordingStore {
    fn save(&self, payloads: &[&dyn Payload]) -> Result<()> {
        let copies = payloads
            .iter()
            .filter_map(|payload| payload.downcast_ref::<TestCacheData>())
            .map(|data| TestCacheData { loads: Arc::new(AtomicUsize::new(0)), ..data.clone() })
            .collect();
        *self.saved.lock() = copies;
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn load(&self) -> Result<Vec<Box<dyn Payload>>> {
        Ok(self.saved.lock().iter().cloned().map(|data| Box::new(data) as Box<dyn Payload>).collect())
    }
}

pub fn pool() -> WorkerPool {
    WorkerPool::new(&WorkerConfig::default()).expect("worker pool")
}

pub fn registry() -> CacheRegistry {
    CacheRegistry::new(pool())
}
