//! Outlier containment by percentile winsorization

use polars::prelude::*;
use serde::Serialize;

use super::error::{PipelineError, PipelineResult};
use super::schema::Col;
use super::stats::{quantile_sorted, sorted_values};

const STAGE: &str = "winsorization";

/// Clamp range applied to one column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WinsorBounds {
    pub column: String,
    pub lower: f64,
    pub upper: f64,
    /// Number of values moved onto a bound
    pub clipped: usize,
}

/// Compute the `[lower_q, upper_q]` percentile range of a column
pub fn percentile_bounds(df: &DataFrame, col: Col, lower_q: f64, upper_q: f64) -> PipelineResult<(f64, f64)> {
    let column = df
        .column(col.as_str())
        .map_err(|_| PipelineError::degenerate(col.as_str(), STAGE))?;
    let sorted = sorted_values(column)?;
    match (quantile_sorted(&sorted, lower_q), quantile_sorted(&sorted, upper_q)) {
        (Some(lo), Some(hi)) => Ok((lo, hi)),
        _ => Err(PipelineError::degenerate(col.as_str(), STAGE)),
    }
}

/// Winsorize each listed column into its own percentile range.
///
/// Must run after imputation: percentiles are taken over the values present
/// when this stage starts. Clamped columns become Float64.
pub fn winsorize(
    df: &DataFrame,
    columns: &[Col],
    lower_q: f64,
    upper_q: f64,
) -> PipelineResult<(DataFrame, Vec<WinsorBounds>)> {
    let mut out = df.clone();
    let mut bounds = Vec::with_capacity(columns.len());

    for &col in columns {
        let (lower, upper) = percentile_bounds(df, col, lower_q, upper_q)?;
        let float_col = df.column(col.as_str())?.cast(&DataType::Float64)?;

        let mut clipped = 0usize;
        let clamped: Float64Chunked = float_col
            .f64()?
            .into_iter()
            .map(|v| {
                v.map(|x| {
                    if x.is_nan() {
                        return x;
                    }
                    let c = x.clamp(lower, upper);
                    if c != x {
                        clipped += 1;
                    }
                    c
                })
            })
            .collect();
        out.with_column(clamped.with_name(col.into()).into_series())?;

        log::debug!(
            "Winsorized '{}' into [{}, {}], {} value(s) clipped",
            col,
            lower,
            upper,
            clipped
        );
        bounds.push(WinsorBounds {
            column: col.as_str().to_string(),
            lower,
            upper,
            clipped,
        });
    }

    Ok((out, bounds))
}
