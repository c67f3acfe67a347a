//! Rare categorical level collapsing

use std::collections::{BTreeSet, HashMap};

use polars::prelude::*;
use serde::Serialize;

use super::error::PipelineResult;

/// Levels of one column that were merged into the replacement label
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollapsedLevels {
    pub column: String,
    pub levels: Vec<String>,
}

/// Replace levels of every string column whose frequency is strictly below
/// `threshold` with `label`.
///
/// Frequencies are taken over the non-null values of the column.
pub fn collapse_rare_categories(
    df: &DataFrame,
    threshold: f64,
    label: &str,
) -> PipelineResult<(DataFrame, Vec<CollapsedLevels>)> {
    let mut out = df.clone();
    let mut collapsed = Vec::new();

    let string_cols: Vec<PlSmallStr> = df
        .get_columns()
        .iter()
        .filter(|c| c.dtype() == &DataType::String)
        .map(|c| c.name().clone())
        .collect();

    for name in string_cols {
        let ca = df.column(name.as_str())?.str()?;
        let rare = rare_levels(ca, threshold);
        if rare.is_empty() {
            continue;
        }

        let replaced: StringChunked = ca
            .into_iter()
            .map(|v| v.map(|s| if rare.contains(s) { label } else { s }))
            .collect();
        out.with_column(replaced.with_name(name.clone()).into_series())?;

        log::debug!("Collapsed {} rare level(s) in '{}'", rare.len(), name);
        collapsed.push(CollapsedLevels {
            column: name.to_string(),
            levels: rare.into_iter().map(str::to_string).collect(),
        });
    }

    Ok((out, collapsed))
}

fn rare_levels(ca: &StringChunked, threshold: f64) -> BTreeSet<&str> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut total = 0usize;
    for v in ca.into_iter().flatten() {
        *counts.entry(v).or_insert(0) += 1;
        total += 1;
    }
    if total == 0 {
        return BTreeSet::new();
    }

    counts
        .into_iter()
        .filter(|(_, n)| (*n as f64 / total as f64) < threshold)
        .map(|(level, _)| level)
        .collect()
}
