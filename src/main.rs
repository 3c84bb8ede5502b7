//! trafreq: frequency encoding CLI for hourly traffic volume prediction

use anyhow::Result;
use clap::Parser;

use trafreq::cli::{self, Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Fit(args) => cli::fit::run_fit(args),
        Commands::Transform(args) => cli::transform::run_transform(args),
        Commands::Context(args) => cli::context::run_context(args),
        Commands::Inspect(args) => cli::inspect::run_inspect(args),
    }
}
