//! Payload capability: the data each cache entry owns

pub mod ports;
pub mod type_info;

pub use ports::{AsAny, LoadContext, Payload};
pub use type_info::PayloadType;
