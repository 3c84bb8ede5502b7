//! Pipeline module - encoding, request context rows and dataset I/O

pub mod context;
pub mod encoder;
pub mod loader;
pub mod persist;

pub use context::*;
pub use encoder::*;
pub use loader::*;
pub use persist::*;
