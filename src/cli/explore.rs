//! Interactive exploration loop
//!
//! Each iteration re-applies the filters to the canonical dataset and
//! redraws the indicators. One `FilterState` lives for the whole loop, so
//! the age range and bracket selection survive every redraw.

use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::Result;
use console::style;
use dialoguer::{Input, MultiSelect, Select};
use polars::prelude::*;

use super::output::save_dataset;
use crate::filter::{apply_filters, AgeRange, FilterState, FixedIncomeBracket, PredicateSelection};
use crate::pipeline::Col;
use crate::report::{default_rate_by, display_kpis, display_segment_rates, FinancialKpis, OverviewKpis};
use crate::utils::{print_filters, print_info, print_success};

const MENU: [&str; 10] = [
    "Gender",
    "Education",
    "Family status",
    "Housing type",
    "Age range",
    "Income bracket",
    "Default rate by segment",
    "Save filtered view",
    "Reset filters",
    "Quit",
];

/// Run the explorer until the user quits
pub fn run_explore(canonical: &DataFrame) -> Result<()> {
    let mut state = FilterState::initialize(canonical);
    let mut selection = PredicateSelection::new();

    loop {
        let filtered = apply_filters(canonical, &selection, &mut state)?;
        // Age and bracket choices now live in the state
        selection.age_range = None;
        selection.income_brackets = None;

        print_filters(&selection, &state);
        println!(
            "\n    {} of {} applicants match",
            style(filtered.height()).yellow().bold(),
            canonical.height()
        );
        display_kpis(&OverviewKpis::compute(&filtered), &FinancialKpis::compute(&filtered));
        println!();

        let choice = Select::new()
            .with_prompt("Adjust")
            .items(&MENU)
            .default(0)
            .interact()?;

        match choice {
            0..=3 => {
                let col = Col::FILTERABLE[choice];
                let options = observed_levels(canonical, col);
                if options.is_empty() {
                    print_info(&format!("'{}' has no levels to choose from", col));
                    continue;
                }
                if let Some(current) = selection.categorical_mut(col) {
                    *current = pick_many(MENU[choice], &options, current)?;
                }
            }
            4 => {
                let range = state.age_range();
                let bounds = state.age_bounds().unwrap_or(range);
                let min: i64 = Input::new()
                    .with_prompt(format!("Minimum age ({}–{})", bounds.min, bounds.max))
                    .default(range.min)
                    .interact_text()?;
                let max: i64 = Input::new()
                    .with_prompt(format!("Maximum age ({}–{})", bounds.min, bounds.max))
                    .default(range.max)
                    .interact_text()?;
                selection.age_range = Some(AgeRange::new(min, max));
            }
            5 => {
                let labels: Vec<String> = FixedIncomeBracket::ALL
                    .iter()
                    .map(|b| b.label().to_string())
                    .collect();
                let chosen = pick_many(MENU[choice], &labels, state.income_brackets())?;
                selection.income_brackets = Some(chosen);
            }
            6 => {
                for col in Col::FILTERABLE.iter().chain([Col::FixedIncomeBracket].iter()) {
                    display_segment_rates(col.as_str(), &default_rate_by(&filtered, *col));
                }
            }
            7 => {
                let path: String = Input::new()
                    .with_prompt("Output file (.csv or .parquet)")
                    .default("filtered.csv".to_string())
                    .interact_text()?;
                let path = PathBuf::from(path);
                let mut view = filtered.clone();
                save_dataset(&mut view, &path)?;
                print_success(&format!("Saved {} rows to {}", view.height(), path.display()));
            }
            8 => {
                state.reset();
                selection = PredicateSelection::new();
            }
            _ => return Ok(()),
        }
    }
}

fn observed_levels(df: &DataFrame, col: Col) -> Vec<String> {
    let Ok(column) = df.column(col.as_str()) else {
        return Vec::new();
    };
    let Ok(strings) = column.cast(&DataType::String) else {
        return Vec::new();
    };
    let Ok(ca) = strings.str() else {
        return Vec::new();
    };
    let levels: BTreeSet<String> = ca.into_iter().flatten().map(str::to_string).collect();
    levels.into_iter().collect()
}

fn pick_many(prompt: &str, options: &[String], current: &BTreeSet<String>) -> Result<BTreeSet<String>> {
    let defaults: Vec<bool> = options.iter().map(|o| current.contains(o)).collect();
    let picked = MultiSelect::new()
        .with_prompt(format!("{} (space to toggle, none = any)", prompt))
        .items(options)
        .defaults(&defaults)
        .interact()?;
    Ok(picked.into_iter().map(|i| options[i].clone()).collect())
}
