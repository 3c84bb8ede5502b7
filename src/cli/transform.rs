//! `trafreq transform` - apply a saved encoder to a dataset

use std::time::Instant;

use anyhow::{Context, Result};
use console::style;

use super::{confirm_overwrite, TransformArgs};
use crate::pipeline::{
    freq_column_name, load_dataset_with_progress, load_encoder, save_dataset, EncoderState,
    MissingColumns,
};
use crate::utils::{
    create_spinner, display_path, finish_with_success, finish_with_warning, print_banner,
    print_completion, print_config, print_info, print_step_header, print_step_time,
    print_warning, COLUMNS, FOLDER, SAVE,
};

/// Run the transform pipeline: load encoder and dataset, encode, save.
pub fn run_transform(args: &TransformArgs) -> Result<()> {
    let output_path = args.output_path();

    print_banner(env!("CARGO_PKG_VERSION"));
    print_config(
        "⚙️  Transform Configuration",
        &[
            (&FOLDER, "Input", display_path(&args.input)),
            (&COLUMNS, "Encoder", display_path(&args.encoder)),
            (&SAVE, "Output", display_path(&output_path)),
        ],
    );

    if !confirm_overwrite(&output_path, args.no_confirm)? {
        print_info("Cancelled by user.");
        return Ok(());
    }

    // Step 1: Load encoder and dataset
    print_step_header(1, "Load Inputs");
    let step_start = Instant::now();
    let mut encoder = load_encoder(&args.encoder)?;
    if args.skip_missing {
        encoder = encoder.with_missing_columns(MissingColumns::Skip);
    }
    if encoder.state() == EncoderState::Unfit {
        print_warning("Encoder was never fit; every encoded value will be 0");
    }
    let (df, rows, cols, _) = load_dataset_with_progress(&args.input, args.infer_schema_length)?;
    println!("      Rows: {}", rows);
    println!("      Columns: {}", cols);
    print_step_time(step_start.elapsed());

    // Step 2: Encode
    print_step_header(2, "Encode Columns");
    let step_start = Instant::now();
    let spinner = create_spinner("Applying frequencies...");
    let mut encoded = match encoder.transform(&df) {
        Ok(encoded) => encoded,
        Err(err) => {
            finish_with_warning(&spinner, "Encoding failed");
            return Err(err).with_context(|| format!("Failed to encode {}", args.input.display()));
        }
    };

    let skipped: Vec<&String> = encoder
        .columns()
        .iter()
        .filter(|name| df.get_column_index(name).is_none())
        .collect();
    if skipped.is_empty() {
        finish_with_success(&spinner, "Columns encoded");
    } else {
        finish_with_warning(
            &spinner,
            &format!("Columns encoded, {} absent column(s) skipped", skipped.len()),
        );
    }

    for name in encoder.columns() {
        if df.get_column_index(name).is_some() {
            println!(
                "      {} {} {}",
                name,
                style("→").dim(),
                style(freq_column_name(name)).cyan()
            );
        }
    }
    for name in &skipped {
        println!("      {} {}", style(name).dim(), style("(absent, skipped)").yellow());
    }
    print_step_time(step_start.elapsed());

    // Step 3: Save output
    print_step_header(3, "Save Results");
    let step_start = Instant::now();
    let spinner = create_spinner("Writing output file...");
    save_dataset(&mut encoded, &output_path)?;
    finish_with_success(&spinner, &format!("Saved to {}", output_path.display()));
    print_step_time(step_start.elapsed());

    print_completion("Transform complete!");

    Ok(())
}
