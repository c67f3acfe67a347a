//! Order statistics shared by the cleaning, outlier and segmentation stages

use std::collections::HashMap;
use std::hash::Hash;

use polars::prelude::*;

/// Collect the non-null, non-NaN values of a numeric column, sorted ascending.
///
/// Infinite values are kept; they are ordinary extreme observations.
pub fn sorted_values(col: &Column) -> PolarsResult<Vec<f64>> {
    let float_col = col.cast(&DataType::Float64)?;
    let mut values: Vec<f64> = float_col
        .f64()?
        .into_iter()
        .flatten()
        .filter(|v| !v.is_nan())
        .collect();
    values.sort_by(f64::total_cmp);
    Ok(values)
}

/// Quantile of pre-sorted values using linear interpolation between the two
/// nearest ranks. Returns `None` for an empty slice.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let q = q.clamp(0.0, 1.0);
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;

    if lo == hi || frac == 0.0 {
        return Some(sorted[lo]);
    }
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Median of pre-sorted values
pub fn median_sorted(sorted: &[f64]) -> Option<f64> {
    quantile_sorted(sorted, 0.5)
}

/// Most frequent value. Ties go to the smallest value so the result does
/// not depend on row order.
pub fn mode<T, I>(values: I) -> Option<T>
where
    T: Eq + Hash + Ord + Clone,
    I: IntoIterator<Item = T>,
{
    let mut counts: HashMap<T, usize> = HashMap::new();
    for v in values {
        *counts.entry(v).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .max_by(|(va, ca), (vb, cb)| ca.cmp(cb).then_with(|| vb.cmp(va)))
        .map(|(v, _)| v)
}

/// Mean of the finite values, `None` when there are none
pub fn finite_mean<I: IntoIterator<Item = f64>>(values: I) -> Option<f64> {
    let (sum, n) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 {
        None
    } else {
        Some(sum / n as f64)
    }
}
