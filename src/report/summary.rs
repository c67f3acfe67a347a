//! Preprocessing summary report generation

use std::time::Duration;

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;
use serde::Serialize;

use crate::pipeline::{CollapsedLevels, ImputedColumn, IncomeQuartiles, Stage, WinsorBounds};

/// How many of the most-missing raw columns to list
const TOP_MISSING: usize = 20;

/// Wall-clock time spent in one stage
#[derive(Debug, Clone, Serialize)]
pub struct StageTiming {
    pub stage: String,
    pub seconds: f64,
}

/// Summary of one preprocessing run
#[derive(Debug, Clone, Default, Serialize)]
pub struct PreprocessSummary {
    pub initial_rows: usize,
    pub initial_columns: usize,
    pub final_rows: usize,
    pub final_columns: usize,
    /// Missing ratio per column after feature engineering, descending
    pub missing_ratios: Vec<(String, f64)>,
    pub dropped_missing: Vec<String>,
    pub imputed: Vec<ImputedColumn>,
    pub collapsed: Vec<CollapsedLevels>,
    pub winsor_bounds: Vec<WinsorBounds>,
    pub quartiles: Option<IncomeQuartiles>,
    pub stage_times: Vec<StageTiming>,
}

impl PreprocessSummary {
    pub fn new(initial_rows: usize, initial_columns: usize) -> Self {
        Self {
            initial_rows,
            initial_columns,
            final_rows: initial_rows,
            final_columns: initial_columns,
            ..Default::default()
        }
    }

    pub fn add_missing_drops(&mut self, features: Vec<String>) {
        self.dropped_missing = features;
    }

    pub fn set_stage_time(&mut self, stage: Stage, elapsed: Duration) {
        self.stage_times.push(StageTiming {
            stage: stage.title().to_string(),
            seconds: elapsed.as_secs_f64(),
        });
    }

    /// Total number of nulls replaced across all columns
    pub fn total_imputed(&self) -> usize {
        self.imputed.iter().map(|i| i.filled).sum()
    }

    pub fn display(&self) {
        println!();
        println!(
            "    {} {}",
            style("📋").cyan(),
            style("PREPROCESSING SUMMARY").white().bold()
        );
        println!("    {}", style("─".repeat(50)).dim());
        println!();

        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Metric").add_attribute(Attribute::Bold),
            Cell::new("Value").add_attribute(Attribute::Bold),
        ]);

        table.add_row(vec![
            Cell::new("📁 Raw Shape"),
            Cell::new(format!("{} x {}", self.initial_rows, self.initial_columns)),
        ]);

        table.add_row(vec![
            Cell::new("🗑️  Dropped (Missing)"),
            Cell::new(self.dropped_missing.len()).fg(highlight(self.dropped_missing.is_empty())),
        ]);

        table.add_row(vec![
            Cell::new("🩹 Imputed Values"),
            Cell::new(format!(
                "{} in {} column(s)",
                self.total_imputed(),
                self.imputed.len()
            ))
            .fg(highlight(self.imputed.is_empty())),
        ]);

        table.add_row(vec![
            Cell::new("🧺 Rare Levels Collapsed"),
            Cell::new(self.collapsed.iter().map(|c| c.levels.len()).sum::<usize>())
                .fg(highlight(self.collapsed.is_empty())),
        ]);

        table.add_row(vec![
            Cell::new("✂️  Winsorized Values"),
            Cell::new(self.winsor_bounds.iter().map(|b| b.clipped).sum::<usize>()),
        ]);

        if let Some(q) = &self.quartiles {
            table.add_row(vec![
                Cell::new("💰 Income Quartiles"),
                Cell::new(format!("{:.0} / {:.0} / {:.0}", q.q1, q.q2, q.q3)),
            ]);
        }

        table.add_row(vec![
            Cell::new("✅ Canonical Shape"),
            Cell::new(format!("{} x {}", self.final_rows, self.final_columns))
                .fg(Color::Green)
                .add_attribute(Attribute::Bold),
        ]);

        // Indent the table
        for line in table.to_string().lines() {
            println!("    {}", line);
        }

        self.display_winsor_bounds();
        self.display_missing_details();
    }

    fn display_winsor_bounds(&self) {
        if self.winsor_bounds.is_empty() {
            return;
        }
        println!();
        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Column").add_attribute(Attribute::Bold),
            Cell::new("Lower").add_attribute(Attribute::Bold),
            Cell::new("Upper").add_attribute(Attribute::Bold),
            Cell::new("Clipped").add_attribute(Attribute::Bold),
        ]);
        for b in &self.winsor_bounds {
            table.add_row(vec![
                Cell::new(&b.column),
                Cell::new(format!("{:.2}", b.lower)),
                Cell::new(format!("{:.2}", b.upper)),
                Cell::new(b.clipped),
            ]);
        }
        for line in table.to_string().lines() {
            println!("    {}", line);
        }
    }

    fn display_missing_details(&self) {
        let with_missing: Vec<&(String, f64)> = self
            .missing_ratios
            .iter()
            .filter(|(_, r)| *r > 0.0)
            .take(TOP_MISSING)
            .collect();

        if with_missing.is_empty() && self.dropped_missing.is_empty() {
            return;
        }

        println!();
        println!(
            "    {} {}",
            style("📝").cyan(),
            style("MISSING VALUES").white().bold()
        );
        println!("    {}", style("─".repeat(50)).dim());

        for (name, ratio) in with_missing {
            let dropped = self.dropped_missing.contains(name);
            let marker = if dropped {
                style("dropped").red().to_string()
            } else {
                style("imputed").dim().to_string()
            };
            println!(
                "        {} {:<40} {:>6.1}%  {}",
                style("•").dim(),
                name,
                ratio * 100.0,
                marker
            );
        }
    }
}

fn highlight(empty: bool) -> Color {
    if empty {
        Color::White
    } else {
        Color::Yellow
    }
}
