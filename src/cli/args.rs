//! Command-line argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::filter::{AgeRange, FixedIncomeBracket, PredicateSelection};
use crate::pipeline::{PreprocessConfig, DEFAULT_INPUT_PATH};

/// LoanLens - Prepare a loan-application dataset and explore filtered views
#[derive(Parser, Debug)]
#[command(name = "loanlens")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Input file path (CSV or Parquet). Defaults to application_train.csv
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Write the filtered table here (CSV or Parquet, determined by extension)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Write the canonical (unfiltered) table to --output instead of the filtered view
    #[arg(long, default_value = "false")]
    pub canonical: bool,

    /// Write a JSON report (preprocessing summary, filters, indicators) here
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Missing value threshold - drop columns with missing ratio above this value
    #[arg(long, default_value = "0.6", value_parser = validate_ratio)]
    pub missing_threshold: f64,

    /// Rare category threshold - collapse levels with frequency below this value
    #[arg(long, default_value = "0.01", value_parser = validate_ratio)]
    pub rare_threshold: f64,

    /// Replacement label for collapsed categorical levels
    #[arg(long, default_value = "Other")]
    pub rare_label: String,

    /// Lower winsorization percentile (0.0 to 1.0)
    #[arg(long, default_value = "0.01", value_parser = validate_ratio)]
    pub winsor_lower: f64,

    /// Upper winsorization percentile (0.0 to 1.0)
    #[arg(long, default_value = "0.99", value_parser = validate_ratio)]
    pub winsor_upper: f64,

    /// Keep only these genders (comma-separated, e.g. F,M)
    #[arg(long, value_delimiter = ',')]
    pub gender: Vec<String>,

    /// Keep only these education types (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub education: Vec<String>,

    /// Keep only these family statuses (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub family_status: Vec<String>,

    /// Keep only these housing types (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub housing: Vec<String>,

    /// Minimum age in years (defaults to the youngest applicant)
    #[arg(long)]
    pub age_min: Option<i64>,

    /// Maximum age in years (defaults to the oldest applicant)
    #[arg(long)]
    pub age_max: Option<i64>,

    /// Keep only these fixed income brackets: low, medium, high, very-high
    #[arg(long, value_delimiter = ',', value_parser = parse_income_bracket)]
    pub income_bracket: Vec<String>,

    /// Skip interactive confirmation prompts
    #[arg(long, default_value = "false")]
    pub no_confirm: bool,

    /// Number of rows to use for schema inference (CSV only).
    /// Use 0 for full table scan (very slow for large files).
    #[arg(long, default_value = "10000")]
    pub infer_schema_length: usize,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Explore the canonical dataset interactively with persistent filters
    Explore,
}

impl Cli {
    /// Input path, falling back to the default dataset file
    pub fn input_path(&self) -> PathBuf {
        self.input
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT_PATH))
    }

    /// Preprocessing policy built from the threshold flags
    pub fn preprocess_config(&self) -> PreprocessConfig {
        PreprocessConfig {
            missing_threshold: self.missing_threshold,
            rare_category_threshold: self.rare_threshold,
            rare_category_label: self.rare_label.clone(),
            winsor_lower: self.winsor_lower,
            winsor_upper: self.winsor_upper,
            infer_schema_length: self.infer_schema_length,
            ..Default::default()
        }
    }

    /// Predicate selection from the filter flags.
    ///
    /// A missing age bound is taken from `bounds`; with neither bound given
    /// the age range is left to the filter state.
    pub fn selection(&self, bounds: AgeRange) -> PredicateSelection {
        let mut selection = PredicateSelection::new()
            .with_gender(self.gender.iter().cloned())
            .with_education(self.education.iter().cloned())
            .with_family_status(self.family_status.iter().cloned())
            .with_housing(self.housing.iter().cloned());

        if self.age_min.is_some() || self.age_max.is_some() {
            selection = selection.with_age_range(
                self.age_min.unwrap_or(bounds.min),
                self.age_max.unwrap_or(bounds.max),
            );
        }
        if !self.income_bracket.is_empty() {
            selection = selection.with_income_brackets(self.income_bracket.iter().cloned());
        }
        selection
    }
}

/// Validator for ratio parameters
fn validate_ratio(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if !(0.0..=1.0).contains(&value) {
        Err(format!("value must be between 0.0 and 1.0, got {}", value))
    } else {
        Ok(value)
    }
}

/// Parse an income bracket alias into its display label
fn parse_income_bracket(s: &str) -> Result<String, String> {
    s.parse::<FixedIncomeBracket>().map(|b| b.label().to_string())
}
