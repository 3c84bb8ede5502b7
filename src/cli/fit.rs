//! `trafreq fit` - learn category frequencies and save the encoder

use std::time::Instant;

use anyhow::{Context, Result};

use super::{confirm_overwrite, FitArgs};
use crate::pipeline::{load_dataset_with_progress, save_encoder, FrequencyEncoder, MissingColumns};
use crate::report::EncodingSummary;
use crate::utils::{
    create_spinner, display_path, finish_with_success, finish_with_warning, print_banner,
    print_completion, print_config, print_count, print_info, print_step_header, print_step_time,
    COLUMNS, FOLDER, SAVE,
};

/// Run the fit pipeline: load, fit, summarize, save.
pub fn run_fit(args: &FitArgs) -> Result<()> {
    let output_path = args.output_path();

    print_banner(env!("CARGO_PKG_VERSION"));
    print_config(
        "⚙️  Fit Configuration",
        &[
            (&FOLDER, "Input", display_path(&args.input)),
            (&COLUMNS, "Columns", args.columns.join(", ")),
            (&SAVE, "Encoder", display_path(&output_path)),
        ],
    );

    if !confirm_overwrite(&output_path, args.no_confirm)? {
        print_info("Cancelled by user.");
        return Ok(());
    }

    // Step 1: Load dataset
    print_step_header(1, "Load Dataset");
    let step_start = Instant::now();
    let (df, rows, cols, memory_mb) = load_dataset_with_progress(&args.input, args.infer_schema_length)?;
    println!("      Rows: {}", rows);
    println!("      Columns: {}", cols);
    println!("      Estimated memory: {:.2} MB", memory_mb);
    print_step_time(step_start.elapsed());

    // Step 2: Learn frequencies
    print_step_header(2, "Learn Frequencies");
    let step_start = Instant::now();
    let policy = if args.skip_missing {
        MissingColumns::Skip
    } else {
        MissingColumns::Error
    };
    let mut encoder = FrequencyEncoder::new(args.columns.clone())?.with_missing_columns(policy);

    let spinner = create_spinner("Counting categories...");
    if let Err(err) = encoder.fit(&df) {
        finish_with_warning(&spinner, "Fit failed");
        return Err(err)
            .with_context(|| format!("Failed to fit encoder on {}", args.input.display()));
    }
    finish_with_success(&spinner, "Frequencies learned");

    let summary = EncodingSummary::from_encoder(&encoder);
    print_count(
        "distinct categories",
        summary.total_categories(),
        Some(&format!("across {} column(s)", summary.columns.len())),
    );
    print_step_time(step_start.elapsed());

    // Step 3: Save encoder
    print_step_header(3, "Save Encoder");
    let step_start = Instant::now();
    let spinner = create_spinner("Writing encoder...");
    let source = args.input.display().to_string();
    save_encoder(&encoder, &output_path, Some(&source))?;
    finish_with_success(&spinner, &format!("Saved to {}", output_path.display()));
    print_step_time(step_start.elapsed());

    summary.display();
    print_completion("Encoder fit complete!");

    Ok(())
}
