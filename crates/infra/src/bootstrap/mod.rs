//! Process bootstrap

mod context;

pub use context::CacheContext;
