//! Cache registry: the set of entries plus persistence and routing

pub mod selector;
pub mod service;

pub use selector::Selector;
pub use service::CacheRegistry;
