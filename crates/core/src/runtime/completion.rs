//! Join handle for background cache work

use std::fmt;
use std::time::Duration;

use lazycache_common::CommonError;
use lazycache_domain::{CacheError, Result};
use tokio::runtime::Handle;
use tokio::task::{JoinError, JoinHandle};

/// Pending result of work scheduled on a [`WorkerPool`](super::WorkerPool)
///
/// Dropping a completion detaches the task; it still runs to the end.
pub struct Completion<T> {
    runtime: Handle,
    task: JoinHandle<Result<T>>,
    label: String,
}

impl<T: Send + 'static> Completion<T> {
    pub(crate) fn new(runtime: Handle, task: JoinHandle<Result<T>>, label: String) -> Self {
        Self { runtime, task, label }
    }

    /// Label given when the task was spawned.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// True once the task has settled.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Await the task from async code.
    ///
    /// # Errors
    /// Returns the task's own error, or `CacheError::Task` if it panicked or
    /// was cancelled.
    pub async fn join(self) -> Result<T> {
        let Self { task, label, .. } = self;
        settle(task.await, &label)
    }

    /// Block the calling thread until the task finishes.
    ///
    /// # Errors
    /// Same as [`Completion::join`].
    ///
    /// # Panics
    /// Panics when called from inside an async task; use `join` there.
    pub fn wait(self) -> Result<T> {
        let Self { runtime, task, label } = self;
        runtime.block_on(async move { settle(task.await, &label) })
    }

    /// Block for at most `timeout`.
    ///
    /// On expiry the task keeps running detached.
    ///
    /// # Errors
    /// Returns `CacheError::Timeout` on expiry, otherwise same as
    /// [`Completion::join`].
    ///
    /// # Panics
    /// Panics when called from inside an async task.
    pub fn wait_timeout(self, timeout: Duration) -> Result<T> {
        let Self { runtime, task, label } = self;
        runtime.block_on(async move {
            match tokio::time::timeout(timeout, task).await {
                Ok(joined) => settle(joined, &label),
                Err(_) => Err(CacheError::Timeout(CommonError::timeout(label, timeout).to_string())),
            }
        })
    }
}

fn settle<T>(joined: std::result::Result<Result<T>, JoinError>, label: &str) -> Result<T> {
    match joined {
        Ok(result) => result,
        Err(err) => {
            let reason = if err.is_panic() { "worker panicked".to_string() } else { err.to_string() };
            Err(CacheError::Task(CommonError::task_cancelled_with_reason(label, reason).to_string()))
        }
    }
}

impl<T> fmt::Debug for Completion<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Completion")
            .field("label", &self.label)
            .field("finished", &self.task.is_finished())
            .finish()
    }
}
