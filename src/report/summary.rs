//! Encoder summary report

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;

use crate::pipeline::{EncoderState, FrequencyEncoder, MissingColumns};
use crate::utils::CHART;

/// One target column of a fitted encoder
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSummary {
    pub column: String,
    pub categories: usize,
    pub observations: usize,
    pub most_common: Option<(String, f64)>,
}

/// Summary of an encoder's learned state
#[derive(Debug, Clone, PartialEq)]
pub struct EncodingSummary {
    pub state: EncoderState,
    pub missing_columns: MissingColumns,
    pub columns: Vec<ColumnSummary>,
}

impl EncodingSummary {
    pub fn from_encoder(encoder: &FrequencyEncoder) -> Self {
        let columns = encoder
            .columns()
            .iter()
            .map(|name| match encoder.table(name) {
                Some(table) => ColumnSummary {
                    column: name.clone(),
                    categories: table.len(),
                    observations: table.observations(),
                    most_common: table.most_common().map(|(k, f)| (k.to_string(), f)),
                },
                None => ColumnSummary {
                    column: name.clone(),
                    categories: 0,
                    observations: 0,
                    most_common: None,
                },
            })
            .collect();

        Self {
            state: encoder.state(),
            missing_columns: encoder.missing_columns(),
            columns,
        }
    }

    pub fn total_categories(&self) -> usize {
        self.columns.iter().map(|c| c.categories).sum()
    }

    pub fn display(&self) {
        println!();
        println!(
            "    {}{}",
            CHART,
            style("ENCODER SUMMARY").white().bold()
        );
        println!("    {}", style("─".repeat(50)).dim());

        let state = match self.state {
            EncoderState::Fit => style("fit").green(),
            EncoderState::Unfit => style("unfit (every value encodes to 0)").yellow(),
        };
        let policy = match self.missing_columns {
            MissingColumns::Error => "error",
            MissingColumns::Skip => "skip",
        };
        println!("      State: {}", state);
        println!("      Missing columns at transform: {}", style(policy).dim());
        println!();

        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Column").add_attribute(Attribute::Bold),
            Cell::new("Categories").add_attribute(Attribute::Bold),
            Cell::new("Rows").add_attribute(Attribute::Bold),
            Cell::new("Most Common").add_attribute(Attribute::Bold),
            Cell::new("Frequency").add_attribute(Attribute::Bold),
        ]);

        for column in &self.columns {
            let (label, freq) = match &column.most_common {
                Some((label, freq)) => (label.clone(), format!("{:.4}", freq)),
                None => ("-".to_string(), "-".to_string()),
            };
            table.add_row(vec![
                Cell::new(&column.column).fg(Color::Cyan),
                Cell::new(column.categories),
                Cell::new(column.observations),
                Cell::new(label),
                Cell::new(freq).fg(Color::Green),
            ]);
        }

        // Indent the table
        for line in table.to_string().lines() {
            println!("    {}", line);
        }
    }
}
