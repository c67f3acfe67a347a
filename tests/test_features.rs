//! Tests for feature engineering

use loanlens::pipeline::{engineer_features, PipelineError};
use polars::prelude::*;

#[path = "common/mod.rs"]
mod common;

use common::*;

fn single_applicant(days_birth: i64, days_employed: i64) -> DataFrame {
    df! {
        "DAYS_BIRTH" => [days_birth],
        "DAYS_EMPLOYED" => [days_employed],
        "AMT_INCOME_TOTAL" => [200000.0f64],
        "AMT_CREDIT" => [500000.0f64],
        "AMT_ANNUITY" => [25000.0f64],
    }
    .unwrap()
}

#[test]
fn test_age_and_tenure_from_day_counts() {
    let df = engineer_features(&single_applicant(-10958, -1825)).unwrap();

    let age = df.column("AGE_YEARS").unwrap().i64().unwrap().get(0);
    assert_eq!(age, Some(30), "10958 days is 30 whole years");

    let tenure = f64_values(&df, "EMPLOYMENT_YEARS")[0].unwrap();
    assert!(
        (tenure - 5.0).abs() < 0.01,
        "1825 days should be about 5 years, got {}",
        tenure
    );
}

#[test]
fn test_age_truncates_partial_years() {
    // 10950 / 365.25 = 29.98
    let df = engineer_features(&single_applicant(-10950, -1825)).unwrap();
    let age = df.column("AGE_YEARS").unwrap().i64().unwrap().get(0);
    assert_eq!(age, Some(29));
}

#[test]
fn test_not_employed_sentinel_clamps_to_zero() {
    let df = engineer_features(&single_applicant(-12000, 365243)).unwrap();
    assert_eq!(f64_values(&df, "EMPLOYMENT_YEARS")[0], Some(0.0));
}

#[test]
fn test_employment_years_always_within_bounds() {
    let df = engineer_features(&create_large_raw_dataframe(2000, 7)).unwrap();
    for tenure in f64_values(&df, "EMPLOYMENT_YEARS").into_iter().flatten() {
        assert!((0.0..=60.0).contains(&tenure), "tenure {} out of [0, 60]", tenure);
    }
}

#[test]
fn test_ratios() {
    let df = engineer_features(&single_applicant(-12000, -1000)).unwrap();
    assert_eq!(f64_values(&df, "DTI")[0], Some(0.125));
    assert_eq!(f64_values(&df, "LOAN_TO_INCOME")[0], Some(2.5));
    assert_eq!(f64_values(&df, "ANNUITY_TO_CREDIT")[0], Some(0.05));
}

#[test]
fn test_zero_income_gives_non_finite_ratios() {
    let df = df! {
        "DAYS_BIRTH" => [-12000i64, -13000],
        "DAYS_EMPLOYED" => [-1000i64, -2000],
        "AMT_INCOME_TOTAL" => [0.0f64, 100000.0],
        "AMT_CREDIT" => [300000.0f64, 0.0],
        "AMT_ANNUITY" => [15000.0f64, 0.0],
    }
    .unwrap();
    let out = engineer_features(&df).unwrap();

    let dti = f64_values(&out, "DTI");
    assert_eq!(dti[0], Some(f64::INFINITY));
    assert_eq!(dti[1], Some(0.0));

    // 0 / 0 is NaN, a value rather than a missing entry
    let atc = f64_values(&out, "ANNUITY_TO_CREDIT");
    assert!(atc[1].unwrap().is_nan());
    assert_eq!(out.column("ANNUITY_TO_CREDIT").unwrap().null_count(), 0);
}

#[test]
fn test_rows_not_dropped_or_reordered() {
    let raw = create_raw_dataframe();
    let out = engineer_features(&raw).unwrap();

    assert_eq!(out.height(), raw.height());
    assert!(out
        .column("SK_ID_CURR")
        .unwrap()
        .as_materialized_series()
        .equals(raw.column("SK_ID_CURR").unwrap().as_materialized_series()));
    assert_has_columns(
        &out,
        &["AGE_YEARS", "EMPLOYMENT_YEARS", "DTI", "LOAN_TO_INCOME", "ANNUITY_TO_CREDIT"],
    );
}

#[test]
fn test_null_employment_stays_null() {
    let raw = create_raw_dataframe();
    let out = engineer_features(&raw).unwrap();
    assert_eq!(f64_values(&out, "EMPLOYMENT_YEARS")[5], None);
}

#[test]
fn test_missing_required_column() {
    let df = df! {
        "DAYS_BIRTH" => [-12000i64],
        "AMT_INCOME_TOTAL" => [100000.0f64],
    }
    .unwrap();

    match engineer_features(&df) {
        Err(PipelineError::MissingColumns(cols)) => {
            assert!(cols.contains(&"DAYS_EMPLOYED".to_string()));
            assert!(cols.contains(&"AMT_CREDIT".to_string()));
            assert!(cols.contains(&"AMT_ANNUITY".to_string()));
            assert!(!cols.contains(&"DAYS_BIRTH".to_string()));
        }
        other => panic!("expected MissingColumns, got {:?}", other.map(|d| d.shape())),
    }
}
