//! Report module - summarizing encoder state

pub mod summary;

pub use summary::*;
