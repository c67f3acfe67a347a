//! Per-session filter state
//!
//! One [`FilterState`] belongs to one user session. It is created once from
//! the canonical dataset and then updated in place by every filter
//! application, so a redraw with the same dataset keeps prior selections.

use std::collections::BTreeSet;

use polars::prelude::*;
use serde::Serialize;

use super::selection::AgeRange;
use crate::pipeline::Col;

/// Persisted filter selections for one session
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterState {
    /// Observed `AGE_YEARS` bounds at initialization, `None` if no ages exist
    age_bounds: Option<AgeRange>,
    age_range: AgeRange,
    income_brackets: BTreeSet<String>,
}

impl FilterState {
    /// Initialize from the canonical dataset: the age range spans the
    /// observed `AGE_YEARS` values (floor of min, ceil of max) and no
    /// income bracket is selected.
    ///
    /// A dataset without usable ages gets an empty `0–0` range.
    pub fn initialize(df: &DataFrame) -> Self {
        let age_bounds = observed_age_bounds(df);
        if age_bounds.is_none() {
            log::warn!("No usable '{}' values; age filter will match nothing", Col::AgeYears);
        }
        Self {
            age_bounds,
            age_range: age_bounds.unwrap_or(AgeRange::new(0, 0)),
            income_brackets: BTreeSet::new(),
        }
    }

    pub fn age_bounds(&self) -> Option<AgeRange> {
        self.age_bounds
    }

    pub fn age_range(&self) -> AgeRange {
        self.age_range
    }

    pub fn income_brackets(&self) -> &BTreeSet<String> {
        &self.income_brackets
    }

    pub fn set_age_range(&mut self, range: AgeRange) {
        self.age_range = range;
    }

    pub fn set_income_brackets(&mut self, brackets: BTreeSet<String>) {
        self.income_brackets = brackets;
    }

    /// Return to the selections made at initialization
    pub fn reset(&mut self) {
        self.age_range = self.age_bounds.unwrap_or(AgeRange::new(0, 0));
        self.income_brackets.clear();
    }
}

fn observed_age_bounds(df: &DataFrame) -> Option<AgeRange> {
    let column = df.column(Col::AgeYears.as_str()).ok()?;
    let ages = column.cast(&DataType::Float64).ok()?;
    let (min, max) = ages
        .f64()
        .ok()?
        .into_iter()
        .flatten()
        .filter(|v| v.is_finite())
        .fold(None, |acc: Option<(f64, f64)>, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })?;
    Some(AgeRange::new(min.floor() as i64, max.ceil() as i64))
}
