//! trafreq: frequency encoding for hourly traffic volume prediction
//!
//! A library for learning and applying categorical frequency encodings,
//! and for deriving the previous/selected/next hour rows a traffic volume
//! request is scored on.

pub mod cli;
pub mod pipeline;
pub mod report;
pub mod utils;
