//! LoanLens: loan application data preparation CLI
//!
//! Loads a raw application table, runs the preprocessing pipeline, applies
//! the requested filters and reports key indicators.

use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use console::style;

use loanlens::cli::{confirm_overwrite, run_explore, save_dataset, Cli, Commands};
use loanlens::filter::{apply_filters, FilterState};
use loanlens::pipeline::{load_dataset_with_progress, process_with_progress};
use loanlens::report::{
    display_kpis, export_report, ExportParams, FinancialKpis, OverviewKpis,
};
use loanlens::utils::{
    print_banner, print_completion, print_config, print_count, print_filters, print_info,
    print_step_header, print_step_time, print_success,
};

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let input = cli.input_path();
    let config = cli.preprocess_config();
    config.validate()?;

    print_banner(env!("CARGO_PKG_VERSION"));
    print_config(&input, cli.output.as_deref(), &config);

    // Step 1: Load dataset
    print_step_header(1, "Load Dataset");
    let step_start = Instant::now();
    let (raw, rows, cols, memory_mb) = load_dataset_with_progress(&input, config.schema_length())?;
    println!("\n    {} Dataset Statistics:", style("✧").cyan());
    println!("      Rows: {}", rows);
    println!("      Columns: {}", cols);
    println!("      Estimated memory: {:.2} MB", memory_mb);
    print_step_time(step_start.elapsed());

    // Step 2: Preprocess
    print_step_header(2, "Preprocess");
    let step_start = Instant::now();
    let processed = process_with_progress(&raw, &config)?;
    if processed.summary.dropped_missing.is_empty() {
        print_info("No columns exceed the missing value threshold");
    } else {
        print_count(
            "column(s) dropped for missing values",
            processed.summary.dropped_missing.len(),
            Some(&format!("(>{:.1}%)", config.missing_threshold * 100.0)),
        );
    }
    print_step_time(step_start.elapsed());
    processed.summary.display();

    let canonical = processed.frame();

    if let Some(Commands::Explore) = &cli.command {
        run_explore(canonical)?;
        print_completion();
        return Ok(());
    }

    // Step 3: Filter
    print_step_header(3, "Filter");
    let step_start = Instant::now();
    let mut state = FilterState::initialize(canonical);
    let bounds = state.age_range();
    let selection = cli.selection(bounds);
    let filtered = apply_filters(canonical, &selection, &mut state)?;
    print_filters(&selection, &state);
    println!(
        "\n    {} of {} applicants match",
        style(filtered.height()).yellow().bold(),
        canonical.height()
    );
    print_step_time(step_start.elapsed());

    display_kpis(&OverviewKpis::compute(&filtered), &FinancialKpis::compute(&filtered));

    // Step 4: Save results
    if cli.output.is_some() || cli.report.is_some() {
        print_step_header(4, "Save Results");
    }

    if let Some(output_path) = &cli.output {
        let proceed = cli.no_confirm || !output_path.exists() || confirm_overwrite(output_path)?;
        if proceed {
            let mut table = if cli.canonical {
                canonical.clone()
            } else {
                filtered.clone()
            };
            save_dataset(&mut table, output_path)?;
            print_success(&format!("Saved to {}", output_path.display()));
        } else {
            print_info("Output not written");
        }
    }

    if let Some(report_path) = &cli.report {
        let input_display = input.display().to_string();
        export_report(
            canonical,
            &filtered,
            report_path,
            &ExportParams {
                input_file: &input_display,
                config: &config,
                summary: &processed.summary,
                selection: &selection,
                filter_state: &state,
            },
        )?;
        print_success(&format!("Report written to {}", report_path.display()));
    }

    print_completion();
    Ok(())
}
