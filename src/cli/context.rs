//! `trafreq context` - build the three scoring rows of one request

use anyhow::{Context, Result};
use chrono::Local;
use console::style;

use super::{confirm_overwrite, ContextArgs};
use crate::pipeline::{
    build_context_frame, context_timestamps, load_encoder, save_dataset, TrafficConditions,
};
use crate::utils::{print_info, print_success};

impl ContextArgs {
    /// Request conditions described by the arguments
    pub fn conditions(&self) -> TrafficConditions {
        TrafficConditions {
            date: self.date.unwrap_or_else(|| Local::now().date_naive()),
            hour: self.hour,
            holiday: self.holiday.clone(),
            temp_celsius: self.temp,
            rain_mm: self.rain,
            snow_mm: self.snow,
            clouds_pct: self.clouds,
            weather: self.weather.clone(),
        }
    }
}

/// Print (and optionally encode and save) the previous/selected/next hour rows.
pub fn run_context(args: &ContextArgs) -> Result<()> {
    let conditions = args.conditions();

    let timestamps = context_timestamps(&conditions)?;
    let mut frame = build_context_frame(&conditions)?;

    if let Some(encoder_path) = &args.encoder {
        let encoder = load_encoder(encoder_path)?;
        frame = encoder
            .transform(&frame)
            .context("Failed to encode request rows")?;
        print_info(&format!(
            "Encoded {} with {}",
            encoder.columns().join(", "),
            encoder_path.display()
        ));
    }

    println!();
    for (context, ts) in &timestamps {
        println!(
            "    {:<9} {}",
            style(context).cyan().bold(),
            style(ts.format("%Y-%m-%d %H:%M")).dim()
        );
    }
    println!();
    println!("{}", frame);

    if let Some(output) = &args.output {
        if !confirm_overwrite(output, args.no_confirm)? {
            print_info("Cancelled by user.");
            return Ok(());
        }
        save_dataset(&mut frame, output)?;
        print_success(&format!("Saved to {}", output.display()));
    }

    Ok(())
}
