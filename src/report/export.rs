//! JSON export of a preprocessing and filtering run

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use polars::prelude::DataFrame;
use serde::Serialize;

use super::kpi::{default_rate_by, DemographicKpis, FinancialKpis, OverviewKpis, SegmentRate};
use super::summary::PreprocessSummary;
use crate::filter::{FilterState, PredicateSelection};
use crate::pipeline::{Col, PreprocessConfig};

/// Metadata about the run
#[derive(Serialize)]
pub struct RunMetadata {
    /// Timestamp of the run (ISO 8601 format)
    pub timestamp: String,
    /// LoanLens version
    pub loanlens_version: String,
    /// Input file path
    pub input_file: String,
}

/// Indicators for one table (canonical or filtered)
#[derive(Serialize)]
pub struct TableIndicators {
    pub rows: usize,
    pub overview: OverviewKpis,
    pub demographics: DemographicKpis,
    pub financial: FinancialKpis,
    /// Default rate per level, keyed by column name
    pub segments: BTreeMap<String, Vec<SegmentRate>>,
}

impl TableIndicators {
    pub fn compute(df: &DataFrame) -> Self {
        let segments = Col::FILTERABLE
            .iter()
            .chain([Col::ContractType, Col::IncomeBracket, Col::FixedIncomeBracket].iter())
            .map(|c| (c.as_str().to_string(), default_rate_by(df, *c)))
            .filter(|(_, rates)| !rates.is_empty())
            .collect();

        Self {
            rows: df.height(),
            overview: OverviewKpis::compute(df),
            demographics: DemographicKpis::compute(df),
            financial: FinancialKpis::compute(df),
            segments,
        }
    }
}

/// Complete run export
#[derive(Serialize)]
pub struct RunReport<'a> {
    pub metadata: RunMetadata,
    pub config: &'a PreprocessConfig,
    pub preprocessing: &'a PreprocessSummary,
    pub selection: &'a PredicateSelection,
    pub filter_state: &'a FilterState,
    pub canonical: TableIndicators,
    pub filtered: TableIndicators,
}

/// Parameters for a run export
pub struct ExportParams<'a> {
    pub input_file: &'a str,
    pub config: &'a PreprocessConfig,
    pub summary: &'a PreprocessSummary,
    pub selection: &'a PredicateSelection,
    pub filter_state: &'a FilterState,
}

/// Write the run report as pretty-printed JSON
pub fn export_report(
    canonical: &DataFrame,
    filtered: &DataFrame,
    output_path: &Path,
    params: &ExportParams,
) -> Result<()> {
    let report = RunReport {
        metadata: RunMetadata {
            timestamp: Utc::now().to_rfc3339(),
            loanlens_version: env!("CARGO_PKG_VERSION").to_string(),
            input_file: params.input_file.to_string(),
        },
        config: params.config,
        preprocessing: params.summary,
        selection: params.selection,
        filter_state: params.filter_state,
        canonical: TableIndicators::compute(canonical),
        filtered: TableIndicators::compute(filtered),
    };

    let json = serde_json::to_string_pretty(&report).context("Failed to serialize run report")?;
    std::fs::write(output_path, json)
        .with_context(|| format!("Failed to write report: {}", output_path.display()))?;

    Ok(())
}
