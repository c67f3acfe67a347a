//! Filter engine: applies a predicate selection to the canonical dataset

use std::collections::BTreeSet;

use polars::prelude::*;
use thiserror::Error;

use super::brackets::fixed_income_brackets;
use super::selection::{AgeRange, PredicateSelection};
use super::state::FilterState;
use crate::pipeline::Col;

/// Errors from the filter engine. Selection problems never surface here;
/// they narrow the result instead.
#[derive(Error, Debug)]
pub enum FilterError {
    #[error(transparent)]
    Polars(#[from] PolarsError),
}

/// Apply `selection` to `canonical`, updating `state` with the effective
/// age range and income-bracket selection.
///
/// A record is kept iff every non-empty categorical selection contains its
/// value, its `AGE_YEARS` lies in the age range, and its
/// `FIXED_INCOME_BRACKET` is selected (when any bracket is). Values that do
/// not occur in the data, or columns that are absent, simply match nothing.
///
/// Returns a new table with `FIXED_INCOME_BRACKET` appended; `canonical` is
/// never modified.
pub fn apply_filters(
    canonical: &DataFrame,
    selection: &PredicateSelection,
    state: &mut FilterState,
) -> Result<DataFrame, FilterError> {
    if let Some(range) = selection.age_range {
        state.set_age_range(range);
    }
    if let Some(brackets) = &selection.income_brackets {
        state.set_income_brackets(brackets.clone());
    }

    let mut view = canonical.clone();
    let brackets = fixed_income_brackets(&view)?;
    view.with_column(brackets.clone().into_series())?;

    let height = view.height();
    let mut mask = vec![true; height];

    for (col, selected) in selection.categorical() {
        if !selected.is_empty() {
            restrict_to_values(&view, col, selected, &mut mask)?;
        }
    }

    restrict_to_age_range(&view, state.age_range(), &mut mask)?;

    if !state.income_brackets().is_empty() {
        for (keep, label) in mask.iter_mut().zip(brackets.into_iter()) {
            *keep &= label.is_some_and(|l| state.income_brackets().contains(l));
        }
    }

    let mask = BooleanChunked::from_slice("mask".into(), &mask);
    let filtered = view.filter(&mask)?;

    log::debug!(
        "Filter kept {} of {} rows (age {}, {} bracket(s))",
        filtered.height(),
        height,
        state.age_range(),
        state.income_brackets().len()
    );
    Ok(filtered)
}

fn restrict_to_values(
    df: &DataFrame,
    col: Col,
    selected: &BTreeSet<String>,
    mask: &mut [bool],
) -> PolarsResult<()> {
    let column = match df.column(col.as_str()) {
        Ok(c) => c.cast(&DataType::String)?,
        Err(_) => {
            log::warn!("Filter column '{}' not present; selection matches nothing", col);
            mask.iter_mut().for_each(|k| *k = false);
            return Ok(());
        }
    };

    for (keep, value) in mask.iter_mut().zip(column.str()?.into_iter()) {
        *keep &= value.is_some_and(|v| selected.contains(v));
    }
    Ok(())
}

fn restrict_to_age_range(df: &DataFrame, range: AgeRange, mask: &mut [bool]) -> PolarsResult<()> {
    let column = match df.column(Col::AgeYears.as_str()) {
        Ok(c) => c.cast(&DataType::Float64)?,
        Err(_) => {
            log::warn!("'{}' not present; age filter matches nothing", Col::AgeYears);
            mask.iter_mut().for_each(|k| *k = false);
            return Ok(());
        }
    };

    for (keep, age) in mask.iter_mut().zip(column.f64()?.into_iter()) {
        *keep &= age.is_some_and(|a| range.contains(a));
    }
    Ok(())
}
