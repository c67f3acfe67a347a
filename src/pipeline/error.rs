//! Error types for the preprocessing pipeline.
//!
//! Every variant aborts the whole transform; no partial canonical dataset
//! is ever returned to the caller.

use polars::prelude::PolarsError;
use thiserror::Error;

/// Errors that can occur while loading or preprocessing a dataset.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Input could not be read or parsed as a table.
    #[error("Failed to load dataset: {0}")]
    Load(String),

    /// Input lacks raw columns that downstream stages read.
    #[error("Dataset is missing required column(s): {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// Input parsed but contains no rows.
    #[error("Dataset contains no rows")]
    EmptyDataset,

    /// A statistic (median, mode, percentile) had no usable values.
    #[error("Cannot compute {stage} statistics for column '{column}': no usable values")]
    DegenerateStatistics {
        /// Column the statistic was requested for
        column: String,
        /// Stage that requested it
        stage: &'static str,
    },

    /// Column dtype has no imputation rule.
    #[error("Column '{column}' has unsupported type {dtype}")]
    UnsupportedColumnType { column: String, dtype: String },

    /// A policy constant is out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Underlying dataframe operation failed.
    #[error(transparent)]
    Polars(#[from] PolarsError),
}

impl PipelineError {
    pub(crate) fn degenerate(column: impl Into<String>, stage: &'static str) -> Self {
        PipelineError::DegenerateStatistics {
            column: column.into(),
            stage,
        }
    }
}

pub type PipelineResult<T> = Result<T, PipelineError>;
