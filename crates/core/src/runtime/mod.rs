//! Background execution: worker pool and completion handles

pub mod completion;
pub mod pool;

pub use completion::Completion;
pub use pool::WorkerPool;
