//! CLI module - argument parsing, prompts and subcommand runners

mod args;
pub mod context;
pub mod fit;
pub mod inspect;
mod prompts;
pub mod transform;

pub use args::*;
pub use prompts::*;
