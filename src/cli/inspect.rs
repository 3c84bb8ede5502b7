//! `trafreq inspect` - show a saved encoder

use anyhow::Result;
use console::style;

use super::InspectArgs;
use crate::pipeline::load_artifact;
use crate::report::EncodingSummary;

pub fn run_inspect(args: &InspectArgs) -> Result<()> {
    let artifact = load_artifact(&args.encoder)?;
    let metadata = &artifact.metadata;

    println!();
    println!("    {} {}", style("Encoder:").bold(), args.encoder.display());
    println!("    {} {}", style("Created:").bold(), metadata.created_at);
    println!("    {} {}", style("Version:").bold(), metadata.trafreq_version);
    if let Some(source) = &metadata.source_file {
        println!("    {} {}", style("Fit on:").bold(), source);
    }

    EncodingSummary::from_encoder(&artifact.encoder).display();

    if args.all {
        for name in artifact.encoder.columns() {
            let Some(table) = artifact.encoder.table(name) else {
                continue;
            };
            println!();
            println!("    {}", style(name).cyan().bold());
            let mut entries: Vec<(&str, f64)> = table.iter().collect();
            entries.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
            for (key, freq) in entries {
                println!("      {:<30} {:.6}", key, freq);
            }
        }
    }

    println!();
    Ok(())
}
