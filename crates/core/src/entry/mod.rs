//! Cache entries: one controller per payload

pub mod controller;
pub mod handlers;

pub use controller::EntryController;
pub use handlers::{InvalidateHandler, LoadStatusHandler};
