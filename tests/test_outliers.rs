//! Unit tests for winsorization and income segmentation

use loanlens::pipeline::{
    assign_income_brackets, percentile_bounds, winsorize, Col, IncomeBracket, IncomeQuartiles,
    PipelineError,
};
use polars::prelude::*;

#[path = "common/mod.rs"]
mod common;

use common::*;

fn income_frame(values: Vec<f64>) -> DataFrame {
    df! { "AMT_INCOME_TOTAL" => values }.unwrap()
}

#[test]
fn test_percentile_bounds_interpolate_linearly() {
    let mut values = vec![100_000.0; 98];
    values.push(10_000_000.0);
    values.push(1.0);
    let df = income_frame(values);

    let (lower, upper) = percentile_bounds(&df, Col::IncomeTotal, 0.01, 0.99).unwrap();

    assert!((lower - 99_000.01).abs() < 1e-6, "lower = {}", lower);
    assert!((upper - 199_000.0).abs() < 1e-6, "upper = {}", upper);
}

#[test]
fn test_winsorize_clamps_extremes() {
    let mut values = vec![100_000.0; 98];
    values.push(10_000_000.0);
    values.push(1.0);
    let df = income_frame(values);

    let (out, bounds) = winsorize(&df, &[Col::IncomeTotal], 0.01, 0.99).unwrap();

    let clamped = f64_values(&out, "AMT_INCOME_TOTAL");
    assert!((clamped[98].unwrap() - 199_000.0).abs() < 1e-6);
    assert!((clamped[99].unwrap() - 99_000.01).abs() < 1e-6);
    assert_eq!(clamped[0], Some(100_000.0));
    assert_eq!(bounds.len(), 1);
    assert_eq!(bounds[0].clipped, 2);
}

#[test]
fn test_winsorize_keeps_values_within_bounds() {
    let df = create_large_raw_dataframe(500, 7);
    let df = df
        .lazy()
        .with_column(col("AMT_INCOME_TOTAL").fill_null(lit(150_000.0)))
        .collect()
        .unwrap();

    let (out, bounds) = winsorize(&df, &[Col::IncomeTotal, Col::Credit], 0.05, 0.95).unwrap();

    for b in &bounds {
        assert!(b.lower <= b.upper);
        for v in f64_values(&out, &b.column).into_iter().flatten() {
            assert!(v >= b.lower && v <= b.upper, "{} outside [{}, {}]", v, b.lower, b.upper);
        }
    }
    assert_eq!(out.height(), df.height());
}

#[test]
fn test_winsorize_integer_column_becomes_float() {
    let df = df! { "AMT_CREDIT" => [1i64, 2, 3, 4, 100] }.unwrap();
    let (out, _) = winsorize(&df, &[Col::Credit], 0.0, 0.75).unwrap();
    assert_eq!(out.column("AMT_CREDIT").unwrap().dtype(), &DataType::Float64);
    assert_eq!(f64_values(&out, "AMT_CREDIT")[4], Some(4.0));
}

#[test]
fn test_winsorize_all_null_column_is_degenerate() {
    let df = df! { "AMT_CREDIT" => [None::<f64>, None] }.unwrap();
    assert!(matches!(
        winsorize(&df, &[Col::Credit], 0.01, 0.99),
        Err(PipelineError::DegenerateStatistics { .. })
    ));
}

#[test]
fn test_quartile_brackets() {
    let df = income_frame(vec![1.0, 2.0, 3.0, 4.0, 5.0]);

    let (out, quartiles) = assign_income_brackets(&df).unwrap();

    assert_eq!(
        quartiles,
        IncomeQuartiles {
            q1: 2.0,
            q2: 3.0,
            q3: 4.0
        }
    );
    let labels: Vec<Option<String>> = str_values(&out, "INCOME_BRACKET");
    let expected = ["Low", "Low", "Mid", "Mid", "High"];
    for (got, want) in labels.iter().zip(expected) {
        assert_eq!(got.as_deref(), Some(want));
    }
}

#[test]
fn test_brackets_partition_every_row() {
    let df = create_large_raw_dataframe(400, 11)
        .lazy()
        .with_column(col("AMT_INCOME_TOTAL").fill_null(lit(120_000.0)))
        .collect()
        .unwrap();

    let (out, _) = assign_income_brackets(&df).unwrap();

    let labels = str_values(&out, "INCOME_BRACKET");
    assert_eq!(labels.len(), 400);
    for label in labels {
        let label = label.expect("every row gets a bracket");
        assert!(IncomeBracket::ALL.iter().any(|b| b.as_str() == label));
    }
}
