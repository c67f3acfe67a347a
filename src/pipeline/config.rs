//! Policy constants for the preprocessing pipeline

use serde::Serialize;

use super::error::PipelineError;
use super::schema::Col;

/// Default missing-value ratio above which a column is dropped
pub const DEFAULT_MISSING_THRESHOLD: f64 = 0.60;

/// Default frequency below which a categorical level is collapsed
pub const DEFAULT_RARE_CATEGORY_THRESHOLD: f64 = 0.01;

/// Label given to collapsed categorical levels
pub const DEFAULT_RARE_CATEGORY_LABEL: &str = "Other";

/// Default winsorization percentiles
pub const DEFAULT_WINSOR_LOWER: f64 = 0.01;
pub const DEFAULT_WINSOR_UPPER: f64 = 0.99;

/// Default number of rows used for CSV schema inference
pub const DEFAULT_INFER_SCHEMA_LENGTH: usize = 10000;

/// Configuration for a single preprocessing run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreprocessConfig {
    /// Drop columns whose missing ratio is strictly greater than this value
    pub missing_threshold: f64,
    /// Collapse categorical levels whose frequency is strictly less than this value
    pub rare_category_threshold: f64,
    /// Replacement level for collapsed categories
    pub rare_category_label: String,
    /// Lower winsorization percentile (0.0 to 1.0)
    pub winsor_lower: f64,
    /// Upper winsorization percentile (0.0 to 1.0)
    pub winsor_upper: f64,
    /// Monetary columns clamped into their percentile range
    #[serde(serialize_with = "serialize_columns")]
    pub winsorize_columns: Vec<Col>,
    /// Rows used for CSV schema inference (0 = full scan)
    pub infer_schema_length: usize,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            missing_threshold: DEFAULT_MISSING_THRESHOLD,
            rare_category_threshold: DEFAULT_RARE_CATEGORY_THRESHOLD,
            rare_category_label: DEFAULT_RARE_CATEGORY_LABEL.to_string(),
            winsor_lower: DEFAULT_WINSOR_LOWER,
            winsor_upper: DEFAULT_WINSOR_UPPER,
            winsorize_columns: vec![Col::IncomeTotal, Col::Credit, Col::Annuity],
            infer_schema_length: DEFAULT_INFER_SCHEMA_LENGTH,
        }
    }
}

impl PreprocessConfig {
    /// Check that every threshold lies in its valid range
    pub fn validate(&self) -> Result<(), PipelineError> {
        for (name, value) in [
            ("missing_threshold", self.missing_threshold),
            ("rare_category_threshold", self.rare_category_threshold),
            ("winsor_lower", self.winsor_lower),
            ("winsor_upper", self.winsor_upper),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(PipelineError::InvalidConfig(format!(
                    "{} must be between 0.0 and 1.0, got {}",
                    name, value
                )));
            }
        }

        if self.winsor_lower >= self.winsor_upper {
            return Err(PipelineError::InvalidConfig(format!(
                "winsor_lower ({}) must be below winsor_upper ({})",
                self.winsor_lower, self.winsor_upper
            )));
        }

        if self.rare_category_label.is_empty() {
            return Err(PipelineError::InvalidConfig(
                "rare_category_label must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Schema inference length as polars expects it (`None` = full scan)
    pub fn schema_length(&self) -> Option<usize> {
        if self.infer_schema_length == 0 {
            None
        } else {
            Some(self.infer_schema_length)
        }
    }
}

fn serialize_columns<S>(cols: &[Col], serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.collect_seq(cols.iter().map(|c| c.as_str()))
}
