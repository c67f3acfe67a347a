//! Quantile-based income segmentation (`INCOME_BRACKET`)

use std::fmt;

use polars::prelude::*;
use serde::Serialize;

use super::error::{PipelineError, PipelineResult};
use super::schema::Col;
use super::stats::{quantile_sorted, sorted_values};

const STAGE: &str = "segmentation";

/// Income quartiles computed once per pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IncomeQuartiles {
    pub q1: f64,
    pub q2: f64,
    pub q3: f64,
}

/// Three-level bracket assigned from the quartiles.
///
/// The second quartile is folded into `Mid`: `x <= Q1` is `Low`,
/// `Q1 < x <= Q3` is `Mid`, `x > Q3` is `High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum IncomeBracket {
    Low,
    Mid,
    High,
}

impl IncomeBracket {
    pub const ALL: [IncomeBracket; 3] = [IncomeBracket::Low, IncomeBracket::Mid, IncomeBracket::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            IncomeBracket::Low => "Low",
            IncomeBracket::Mid => "Mid",
            IncomeBracket::High => "High",
        }
    }
}

impl fmt::Display for IncomeBracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl IncomeQuartiles {
    /// Quartiles of the current `AMT_INCOME_TOTAL` values
    pub fn compute(df: &DataFrame) -> PipelineResult<Self> {
        let column = df
            .column(Col::IncomeTotal.as_str())
            .map_err(|_| PipelineError::degenerate(Col::IncomeTotal.as_str(), STAGE))?;
        let sorted = sorted_values(column)?;
        let q = |p| {
            quantile_sorted(&sorted, p)
                .ok_or_else(|| PipelineError::degenerate(Col::IncomeTotal.as_str(), STAGE))
        };
        Ok(Self {
            q1: q(0.25)?,
            q2: q(0.5)?,
            q3: q(0.75)?,
        })
    }

    /// Bracket for one income value. NaN compares false everywhere and lands in `High`.
    pub fn classify(&self, income: f64) -> IncomeBracket {
        if income <= self.q1 {
            IncomeBracket::Low
        } else if income <= self.q3 {
            IncomeBracket::Mid
        } else {
            IncomeBracket::High
        }
    }
}

/// Add the `INCOME_BRACKET` column and return the quartiles used
pub fn assign_income_brackets(df: &DataFrame) -> PipelineResult<(DataFrame, IncomeQuartiles)> {
    let quartiles = IncomeQuartiles::compute(df)?;
    let income = df.column(Col::IncomeTotal.as_str())?.cast(&DataType::Float64)?;

    let brackets: StringChunked = income
        .f64()?
        .into_iter()
        .map(|v| v.map(|x| quartiles.classify(x).as_str()))
        .collect();

    let mut out = df.clone();
    out.with_column(brackets.with_name(Col::IncomeBracket.into()).into_series())?;

    log::info!(
        "Income quartiles: Q1={:.2} Q2={:.2} Q3={:.2}",
        quartiles.q1,
        quartiles.q2,
        quartiles.q3
    );
    Ok((out, quartiles))
}
