//! Persistence port

pub mod ports;

pub use ports::PersistenceStore;
