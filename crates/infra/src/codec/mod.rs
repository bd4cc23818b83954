//! Snapshot encoding for persistence stores

mod snapshot;
mod types;

pub use snapshot::PayloadCodec;
pub use types::PayloadTypes;
