//! Worker pool running payload loads off the caller's thread
//!
//! Payload work is synchronous, so it goes to tokio's blocking pool.
//! Orchestration (bulk restore, fan-in joins) runs as async tasks on the
//! same runtime.

use std::future::Future;
use std::sync::Arc;

use lazycache_common::CommonError;
use lazycache_domain::{CacheError, Result, WorkerConfig};
use tokio::runtime::{Builder, Handle, Runtime};
use tracing::{debug, trace};

use super::completion::Completion;

/// Cloneable handle to the runtime executing cache work
#[derive(Clone)]
pub struct WorkerPool {
    handle: Handle,
    // Present only when this pool built its own runtime
    owned: Option<Arc<OwnedRuntime>>,
}

struct OwnedRuntime(Option<Runtime>);

impl Drop for OwnedRuntime {
    fn drop(&mut self) {
        if let Some(runtime) = self.0.take() {
            runtime.shutdown_background();
        }
    }
}

impl WorkerPool {
    /// Start a dedicated multi-threaded runtime sized by `config`.
    ///
    /// # Errors
    /// Returns `CacheError::InvalidArgument` for invalid sizes and
    /// `CacheError::Config` if the runtime cannot be started.
    pub fn new(config: &WorkerConfig) -> Result<Self> {
        config.validate()?;

        let runtime = Builder::new_multi_thread()
            .worker_threads(config.worker_threads)
            .max_blocking_threads(config.max_blocking_threads)
            .thread_name(config.thread_name.clone())
            .enable_all()
            .build()
            .map_err(|e| {
                let err = CommonError::config_field("workers", format!("failed to start runtime: {e}"));
                CacheError::Config(err.to_string())
            })?;

        debug!(
            worker_threads = config.worker_threads,
            max_blocking_threads = config.max_blocking_threads,
            thread_name = %config.thread_name,
            "worker pool started"
        );

        Ok(Self { handle: runtime.handle().clone(), owned: Some(Arc::new(OwnedRuntime(Some(runtime)))) })
    }

    /// Borrow an existing runtime. The pool does not own or shut it down.
    pub fn from_handle(handle: Handle) -> Self {
        Self { handle, owned: None }
    }

    /// Use the runtime the caller is running on.
    ///
    /// # Errors
    /// Returns `CacheError::Config` outside a tokio runtime.
    pub fn current() -> Result<Self> {
        Handle::try_current().map(Self::from_handle).map_err(|e| {
            CacheError::Config(CommonError::config(format!("no current runtime: {e}")).to_string())
        })
    }

    /// Runtime handle tasks are spawned on.
    pub fn handle(&self) -> &Handle {
        &self.handle
    }

    /// Run blocking `work` on the pool.
    pub fn spawn<T, F>(&self, label: impl Into<String>, work: F) -> Completion<T>
    where
        T: Send + 'static,
        F: FnOnce() -> Result<T> + Send + 'static,
    {
        let label = label.into();
        trace!(task = %label, "spawning blocking task");
        let task = self.handle.spawn_blocking(work);
        Completion::new(self.handle.clone(), task, label)
    }

    /// Run an async orchestration task on the pool.
    pub fn spawn_async<T, Fut>(&self, label: impl Into<String>, future: Fut) -> Completion<T>
    where
        T: Send + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let label = label.into();
        trace!(task = %label, "spawning async task");
        let task = self.handle.spawn(future);
        Completion::new(self.handle.clone(), task, label)
    }

    /// Completion that settles once every one of `completions` has settled.
    ///
    /// All tasks are awaited even when one fails; the first failure in input
    /// order is the combined error.
    pub fn join_all<T>(&self, label: impl Into<String>, completions: Vec<Completion<T>>) -> Completion<Vec<T>>
    where
        T: Send + 'static,
    {
        self.spawn_async(label, async move {
            let results = futures::future::join_all(completions.into_iter().map(Completion::join)).await;
            results.into_iter().collect()
        })
    }
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool").field("owns_runtime", &self.owned.is_some()).finish()
    }
}
