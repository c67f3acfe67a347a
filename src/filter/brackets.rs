//! Fixed-threshold income brackets used by the filter engine
//!
//! Independent of the quantile-based `INCOME_BRACKET`; the two schemes can
//! disagree for the same applicant.

use std::fmt;
use std::str::FromStr;

use polars::prelude::*;

use crate::pipeline::Col;

/// Cut points below the open-ended top bracket
pub const FIXED_CUTS: [f64; 4] = [0.0, 200_000.0, 500_000.0, 1_000_000.0];

/// Smallest upper edge of the top bracket
pub const MIN_TOP_EDGE: f64 = 1_000_001.0;

/// Absolute income bracket. Intervals are open on the left and closed on
/// the right: `(0, 2L]`, `(2L, 5L]`, `(5L, 10L]`, `(10L, top]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FixedIncomeBracket {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl FixedIncomeBracket {
    pub const ALL: [FixedIncomeBracket; 4] = [
        FixedIncomeBracket::Low,
        FixedIncomeBracket::Medium,
        FixedIncomeBracket::High,
        FixedIncomeBracket::VeryHigh,
    ];

    /// Display label, also the value stored in `FIXED_INCOME_BRACKET`
    pub fn label(&self) -> &'static str {
        match self {
            FixedIncomeBracket::Low => "Low (0–2L)",
            FixedIncomeBracket::Medium => "Medium (2–5L)",
            FixedIncomeBracket::High => "High (5–10L)",
            FixedIncomeBracket::VeryHigh => "Very High (10L+)",
        }
    }

    /// Bracket for an income given the top edge. Values at or below zero,
    /// above the top edge, null or NaN have no bracket.
    pub fn classify(income: f64, top_edge: f64) -> Option<Self> {
        if income.is_nan() || income <= FIXED_CUTS[0] || income > top_edge {
            None
        } else if income <= FIXED_CUTS[1] {
            Some(FixedIncomeBracket::Low)
        } else if income <= FIXED_CUTS[2] {
            Some(FixedIncomeBracket::Medium)
        } else if income <= FIXED_CUTS[3] {
            Some(FixedIncomeBracket::High)
        } else {
            Some(FixedIncomeBracket::VeryHigh)
        }
    }
}

impl fmt::Display for FixedIncomeBracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FixedIncomeBracket {
    type Err = String;

    /// Accepts the full label or a short alias (`low`, `medium`, `high`, `very-high`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(b) = Self::ALL.iter().find(|b| b.label() == s) {
            return Ok(*b);
        }
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "low" => Ok(FixedIncomeBracket::Low),
            "medium" => Ok(FixedIncomeBracket::Medium),
            "high" => Ok(FixedIncomeBracket::High),
            "very-high" | "veryhigh" => Ok(FixedIncomeBracket::VeryHigh),
            _ => Err(format!(
                "Unknown income bracket: '{}'. Use low, medium, high or very-high.",
                s
            )),
        }
    }
}

/// Upper edge of the top bracket: the observed maximum income, but never
/// below [`MIN_TOP_EDGE`].
pub fn top_edge(max_income: Option<f64>) -> f64 {
    match max_income {
        Some(m) if m > FIXED_CUTS[3] => m,
        _ => MIN_TOP_EDGE,
    }
}

/// Build the `FIXED_INCOME_BRACKET` column from the current income values.
///
/// A missing income column yields an all-null bracket column.
pub fn fixed_income_brackets(df: &DataFrame) -> PolarsResult<StringChunked> {
    let name: PlSmallStr = Col::FixedIncomeBracket.into();
    let column = match df.column(Col::IncomeTotal.as_str()) {
        Ok(c) => c.cast(&DataType::Float64)?,
        Err(_) => {
            log::warn!("'{}' not present; no income brackets assigned", Col::IncomeTotal);
            return Ok(StringChunked::full_null(name, df.height()));
        }
    };
    let income = column.f64()?;
    let edge = top_edge(income.into_iter().flatten().filter(|v| !v.is_nan()).reduce(f64::max));

    let brackets: StringChunked = income
        .into_iter()
        .map(|v| v.and_then(|x| FixedIncomeBracket::classify(x, edge)).map(|b| b.label()))
        .collect();
    Ok(brackets.with_name(name))
}
