//! Pipeline module - turns a raw application table into the canonical dataset
//!
//! Stages run in a fixed order, each reading the previous stage's output:
//! feature engineering, cleaning (drop, impute, collapse), outlier
//! containment, segmentation.

pub mod categories;
pub mod config;
pub mod error;
pub mod features;
pub mod loader;
pub mod missing;
pub mod outliers;
pub mod schema;
pub mod segmentation;
pub mod stats;

pub use categories::*;
pub use config::*;
pub use error::*;
pub use features::*;
pub use loader::*;
pub use missing::*;
pub use outliers::*;
pub use schema::Col;
pub use segmentation::*;

use std::fmt;
use std::path::Path;
use std::time::{Duration, Instant};

use indicatif::ProgressBar;
use polars::prelude::*;

use crate::report::PreprocessSummary;
use crate::utils::{create_spinner, finish_with_success};

/// Pipeline stage, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    FeatureEngineering,
    Cleaning,
    OutlierContainment,
    Segmentation,
}

impl Stage {
    pub const ORDER: [Stage; 4] = [
        Stage::FeatureEngineering,
        Stage::Cleaning,
        Stage::OutlierContainment,
        Stage::Segmentation,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Stage::FeatureEngineering => "Feature Engineering",
            Stage::Cleaning => "Data Cleaning",
            Stage::OutlierContainment => "Outlier Containment",
            Stage::Segmentation => "Income Segmentation",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Canonical dataset plus the record of how it was produced
#[derive(Debug, Clone)]
pub struct ProcessedDataset {
    frame: DataFrame,
    pub summary: PreprocessSummary,
}

impl ProcessedDataset {
    /// Read-only view of the canonical table
    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn into_frame(self) -> DataFrame {
        self.frame
    }
}

/// Run the full pipeline on a raw table.
///
/// Deterministic: the same input and config always give an identical table.
/// Any stage error aborts the whole run.
pub fn process(raw: &DataFrame, config: &PreprocessConfig) -> PipelineResult<ProcessedDataset> {
    run_stages(raw, config, false)
}

/// [`process`] with a spinner per stage
pub fn process_with_progress(
    raw: &DataFrame,
    config: &PreprocessConfig,
) -> PipelineResult<ProcessedDataset> {
    run_stages(raw, config, true)
}

/// Load a file and run the pipeline on it
pub fn load_and_preprocess(path: &Path, config: &PreprocessConfig) -> PipelineResult<ProcessedDataset> {
    config.validate()?;
    let raw = load_dataset(path, config.schema_length())?;
    process(&raw, config)
}

fn run_stages(
    raw: &DataFrame,
    config: &PreprocessConfig,
    show_progress: bool,
) -> PipelineResult<ProcessedDataset> {
    config.validate()?;
    validate_required_columns(raw)?;
    if raw.height() == 0 {
        return Err(PipelineError::EmptyDataset);
    }

    let mut summary = PreprocessSummary::new(raw.height(), raw.width());
    let mut tracker = StageTracker::new(show_progress);

    // Feature engineering
    tracker.start(Stage::FeatureEngineering);
    let df = engineer_features(raw)?;
    summary.set_stage_time(Stage::FeatureEngineering, tracker.finish());

    // Cleaning: drop sparse columns, impute, collapse rare levels
    tracker.start(Stage::Cleaning);
    let missing_ratios = analyze_missing_values(&df);
    let to_drop = get_features_above_threshold(&missing_ratios, config.missing_threshold);
    let df = df.drop_many(to_drop.iter().map(String::as_str));
    if !to_drop.is_empty() {
        log::info!(
            "Dropped {} column(s) above {:.0}% missing",
            to_drop.len(),
            config.missing_threshold * 100.0
        );
    }
    let (df, imputed) = impute_missing_values(&df)?;
    let (df, collapsed) = collapse_rare_categories(
        &df,
        config.rare_category_threshold,
        &config.rare_category_label,
    )?;
    summary.missing_ratios = missing_ratios;
    summary.add_missing_drops(to_drop);
    summary.imputed = imputed;
    summary.collapsed = collapsed;
    summary.set_stage_time(Stage::Cleaning, tracker.finish());

    // Outlier containment
    tracker.start(Stage::OutlierContainment);
    let (df, bounds) = winsorize(
        &df,
        &config.winsorize_columns,
        config.winsor_lower,
        config.winsor_upper,
    )?;
    summary.winsor_bounds = bounds;
    summary.set_stage_time(Stage::OutlierContainment, tracker.finish());

    // Segmentation
    tracker.start(Stage::Segmentation);
    let (df, quartiles) = assign_income_brackets(&df)?;
    summary.quartiles = Some(quartiles);
    summary.set_stage_time(Stage::Segmentation, tracker.finish());

    summary.final_rows = df.height();
    summary.final_columns = df.width();
    Ok(ProcessedDataset { frame: df, summary })
}

/// Times each stage and optionally shows a spinner while it runs
struct StageTracker {
    show_progress: bool,
    current: Option<(Stage, Instant, Option<ProgressBar>)>,
}

impl StageTracker {
    fn new(show_progress: bool) -> Self {
        Self {
            show_progress,
            current: None,
        }
    }

    fn start(&mut self, stage: Stage) {
        log::debug!("Starting stage: {}", stage);
        let spinner = self
            .show_progress
            .then(|| create_spinner(&format!("{}...", stage.title())));
        self.current = Some((stage, Instant::now(), spinner));
    }

    fn finish(&mut self) -> Duration {
        match self.current.take() {
            Some((stage, started, spinner)) => {
                if let Some(pb) = spinner {
                    finish_with_success(&pb, &format!("{} complete", stage.title()));
                }
                started.elapsed()
            }
            None => Duration::ZERO,
        }
    }
}

impl Drop for StageTracker {
    /// A stage that failed leaves its spinner running; clear it
    fn drop(&mut self) {
        if let Some((stage, _, Some(pb))) = self.current.take() {
            log::debug!("Stage '{}' did not complete", stage);
            pb.finish_and_clear();
        }
    }
}
