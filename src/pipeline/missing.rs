//! Missing value analysis, column dropping and imputation

use polars::prelude::*;
use rayon::prelude::*;
use serde::Serialize;

use super::error::{PipelineError, PipelineResult};
use super::stats::{median_sorted, mode, sorted_values};

const STAGE: &str = "imputation";

/// Analyze missing values in the dataset.
///
/// Returns `(column, missing_ratio)` pairs sorted by ratio descending. Only
/// nulls count as missing; NaN produced by arithmetic is a value.
pub fn analyze_missing_values(df: &DataFrame) -> Vec<(String, f64)> {
    // Handle empty DataFrame
    if df.height() == 0 {
        return Vec::new();
    }

    let height = df.height() as f64;
    let mut missing_ratios: Vec<(String, f64)> = df
        .get_columns()
        .par_iter()
        .map(|col| (col.name().to_string(), col.null_count() as f64 / height))
        .collect();

    // Stable sort keeps column order among equal ratios
    missing_ratios.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    missing_ratios
}

/// Get columns to drop based on missing value threshold (strictly above)
pub fn get_features_above_threshold(missing_ratios: &[(String, f64)], threshold: f64) -> Vec<String> {
    missing_ratios
        .iter()
        .filter(|(_, ratio)| *ratio > threshold)
        .map(|(name, _)| name.clone())
        .collect()
}

/// Record of one imputed column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImputedColumn {
    pub column: String,
    /// Fill value rendered as text (mode or median)
    pub fill_value: String,
    /// Number of nulls replaced
    pub filled: usize,
}

/// Replace every null: categorical columns take their mode, numeric columns
/// their median. Statistics are computed fresh from `df`.
///
/// Columns without nulls are left untouched, dtype included. Only nulls are
/// filled: a NaN from a 0/0 ratio is kept as a value and is skipped when the
/// median is computed. This differs from a pandas `fillna`, which treats
/// NaN as missing and would overwrite it with the median.
pub fn impute_missing_values(df: &DataFrame) -> PipelineResult<(DataFrame, Vec<ImputedColumn>)> {
    let results: Vec<(Column, Option<ImputedColumn>)> = df
        .get_columns()
        .par_iter()
        .map(impute_column)
        .collect::<PipelineResult<_>>()?;

    let mut columns = Vec::with_capacity(results.len());
    let mut imputed = Vec::new();
    for (col, record) in results {
        columns.push(col);
        if let Some(record) = record {
            log::debug!(
                "Imputed {} null(s) in '{}' with {}",
                record.filled,
                record.column,
                record.fill_value
            );
            imputed.push(record);
        }
    }

    Ok((DataFrame::new(columns)?, imputed))
}

fn impute_column(col: &Column) -> PipelineResult<(Column, Option<ImputedColumn>)> {
    let filled = col.null_count();
    if filled == 0 {
        return Ok((col.clone(), None));
    }

    let name = col.name().clone();
    let (new_col, fill_value) = match col.dtype() {
        DataType::String => {
            let ca = col.str()?;
            let fill = mode(ca.into_iter().flatten())
                .ok_or_else(|| PipelineError::degenerate(name.as_str(), STAGE))?
                .to_string();
            let out: StringChunked = ca
                .into_iter()
                .map(|v| Some(v.unwrap_or(fill.as_str())))
                .collect();
            (out.with_name(name.clone()).into_series().into(), fill)
        }
        DataType::Boolean => {
            let ca = col.bool()?;
            let fill = mode(ca.into_iter().flatten())
                .ok_or_else(|| PipelineError::degenerate(name.as_str(), STAGE))?;
            let out: BooleanChunked = ca.into_iter().map(|v| Some(v.unwrap_or(fill))).collect();
            (out.with_name(name.clone()).into_series().into(), fill.to_string())
        }
        dtype if dtype.is_primitive_numeric() => {
            let fill = median_sorted(&sorted_values(col)?)
                .ok_or_else(|| PipelineError::degenerate(name.as_str(), STAGE))?;
            let float_col = col.cast(&DataType::Float64)?;
            let out: Float64Chunked = float_col
                .f64()?
                .into_iter()
                .map(|v| Some(v.unwrap_or(fill)))
                .collect();
            (out.with_name(name.clone()).into_series().into(), fill.to_string())
        }
        dtype => {
            return Err(PipelineError::UnsupportedColumnType {
                column: name.to_string(),
                dtype: dtype.to_string(),
            })
        }
    };

    Ok((
        new_col,
        Some(ImputedColumn {
            column: name.to_string(),
            fill_value,
            filled,
        }),
    ))
}
