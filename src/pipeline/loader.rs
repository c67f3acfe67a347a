//! Dataset loader for CSV and Parquet files

use std::io::Cursor;
use std::path::Path;

use polars::prelude::*;

use super::error::{PipelineError, PipelineResult};
use super::schema::Col;
use crate::utils::{create_spinner, finish_with_success};

/// Input file used when the caller does not supply one
pub const DEFAULT_INPUT_PATH: &str = "application_train.csv";

/// Load a dataset from a file (CSV or Parquet based on extension)
///
/// # Arguments
/// * `path` - Input file path
/// * `infer_schema_length` - Rows used for CSV schema inference (`None` = full scan)
pub fn load_dataset(path: &Path, infer_schema_length: Option<usize>) -> PipelineResult<DataFrame> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let lf = match extension.as_str() {
        "csv" => LazyCsvReader::new(path)
            .with_infer_schema_length(infer_schema_length)
            .finish()
            .map_err(|e| load_error(path, e))?,
        "parquet" => LazyFrame::scan_parquet(path, Default::default())
            .map_err(|e| load_error(path, e))?,
        _ => {
            return Err(PipelineError::Load(format!(
                "Unsupported file format: '{}'. Supported formats: csv, parquet",
                extension
            )))
        }
    };

    let df = lf.collect().map_err(|e| load_error(path, e))?;
    log::info!(
        "Loaded {} rows x {} columns from {}",
        df.height(),
        df.width(),
        path.display()
    );
    Ok(df)
}

/// Load CSV content from an in-memory byte stream (e.g. an uploaded file)
pub fn load_dataset_from_reader(
    bytes: Vec<u8>,
    infer_schema_length: Option<usize>,
) -> PipelineResult<DataFrame> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(infer_schema_length)
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()
        .map_err(|e| PipelineError::Load(format!("Failed to parse CSV stream: {}", e)))?;
    log::info!(
        "Loaded {} rows x {} columns from byte stream",
        df.height(),
        df.width()
    );
    Ok(df)
}

/// Load a dataset with a spinner and return it with its statistics
///
/// Returns `(df, rows, cols, memory_mb)`.
pub fn load_dataset_with_progress(
    path: &Path,
    infer_schema_length: Option<usize>,
) -> PipelineResult<(DataFrame, usize, usize, f64)> {
    let spinner = create_spinner(&format!("Loading {}...", path.display()));
    let df = match load_dataset(path, infer_schema_length) {
        Ok(df) => df,
        Err(e) => {
            spinner.finish_and_clear();
            return Err(e);
        }
    };
    finish_with_success(&spinner, "Dataset loaded");

    let (rows, cols) = df.shape();
    let memory_mb = df.estimated_size() as f64 / (1024.0 * 1024.0);
    Ok((df, rows, cols, memory_mb))
}

/// Check that every raw column read by downstream stages is present and
/// numeric.
///
/// All absent columns are reported together. A required column that was
/// read as text (e.g. a stray `n/a` token in a CSV) is rejected, never cast.
pub fn validate_required_columns(df: &DataFrame) -> PipelineResult<()> {
    let schema = df.schema();
    let missing: Vec<String> = Col::REQUIRED
        .iter()
        .filter(|c| schema.get(c.as_str()).is_none())
        .map(|c| c.as_str().to_string())
        .collect();

    if !missing.is_empty() {
        return Err(PipelineError::MissingColumns(missing));
    }

    for col in Col::REQUIRED {
        if let Some(dtype) = schema.get(col.as_str()) {
            if !dtype.is_primitive_numeric() {
                return Err(PipelineError::UnsupportedColumnType {
                    column: col.as_str().to_string(),
                    dtype: dtype.to_string(),
                });
            }
        }
    }
    Ok(())
}

fn load_error(path: &Path, err: PolarsError) -> PipelineError {
    PipelineError::Load(format!("{}: {}", path.display(), err))
}
