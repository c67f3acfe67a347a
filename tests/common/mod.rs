//! Shared test utilities and fixture generators

#![allow(dead_code)]

use polars::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

/// Create a small raw application table with known characteristics
///
/// This DataFrame includes:
/// - every required raw column (day counts and monetary fields)
/// - `DAYS_EMPLOYED`: three `365243` "not employed" sentinels and one null
/// - `AMT_INCOME_TOTAL` / `AMT_ANNUITY`: one null each (imputed with median)
/// - `NAME_EDUCATION_TYPE`: one null (imputed with mode)
/// - `OWN_CAR_AGE`: 80% missing (dropped at the 60% threshold)
/// - `EXT_SOURCE_1`: 50% missing (kept and imputed)
pub fn create_raw_dataframe() -> DataFrame {
    df! {
        "SK_ID_CURR" => (100001i64..100021).collect::<Vec<_>>(),
        "TARGET" => [0i32, 1, 0, 0, 1, 0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 0, 0, 1, 0, 0],
        "DAYS_BIRTH" => [-10950i64, -12000, -15000, -9000, -20000, -18000, -11000, -13500, -16000, -22000,
                         -8000, -14000, -17000, -19500, -10000, -21000, -12500, -9500, -15500, -23000],
        "DAYS_EMPLOYED" => [Some(-1825i64), Some(-3000), Some(365243), Some(-500), Some(-7000), None, Some(-1200),
                            Some(-2500), Some(365243), Some(-4000), Some(-300), Some(-2000), Some(-6000), Some(-100),
                            Some(-900), Some(-8000), Some(-1500), Some(-700), Some(-3500), Some(365243)],
        "AMT_INCOME_TOTAL" => [Some(100000.0f64), Some(150000.0), Some(202500.0), Some(90000.0), Some(270000.0),
                               Some(135000.0), None, Some(225000.0), Some(112500.0), Some(450000.0),
                               Some(67500.0), Some(157500.0), Some(315000.0), Some(99000.0), Some(121500.0),
                               Some(1200000.0), Some(144000.0), Some(81000.0), Some(247500.0), Some(171000.0)],
        "AMT_CREDIT" => [406597.5f64, 1293502.5, 135000.0, 312682.5, 513531.0, 490495.5, 1560726.0, 1530000.0,
                         1019610.0, 405000.0, 652500.0, 148365.0, 300000.0, 1125000.0, 450000.0, 2250000.0,
                         270000.0, 180000.0, 808650.0, 675000.0],
        "AMT_ANNUITY" => [Some(24700.5f64), Some(35698.5), Some(6750.0), Some(29686.5), Some(21865.5),
                          Some(27517.5), Some(41301.0), Some(42075.0), Some(33826.5), None,
                          Some(21177.0), Some(10678.5), Some(15750.0), Some(32895.0), Some(22500.0),
                          Some(78696.0), Some(13500.0), Some(9000.0), Some(26086.5), Some(34596.0)],
        "AMT_GOODS_PRICE" => [351000.0f64, 1129500.0, 135000.0, 297000.0, 513000.0, 454500.0, 1395000.0, 1530000.0,
                              913500.0, 405000.0, 652500.0, 135000.0, 300000.0, 1125000.0, 450000.0, 2250000.0,
                              270000.0, 180000.0, 675000.0, 675000.0],
        "CODE_GENDER" => ["M", "F", "M", "F", "F", "M", "F", "F", "M", "F",
                          "F", "M", "F", "F", "M", "F", "F", "M", "F", "M"],
        "NAME_EDUCATION_TYPE" => [Some("Secondary / secondary special"), Some("Higher education"),
                                  Some("Secondary / secondary special"), Some("Secondary / secondary special"),
                                  Some("Higher education"), None, Some("Secondary / secondary special"),
                                  Some("Higher education"), Some("Secondary / secondary special"),
                                  Some("Higher education"), Some("Secondary / secondary special"),
                                  Some("Secondary / secondary special"), Some("Higher education"),
                                  Some("Secondary / secondary special"), Some("Higher education"),
                                  Some("Higher education"), Some("Secondary / secondary special"),
                                  Some("Secondary / secondary special"), Some("Higher education"),
                                  Some("Secondary / secondary special")],
        "NAME_FAMILY_STATUS" => ["Married", "Single / not married", "Married", "Civil marriage", "Married",
                                 "Married", "Single / not married", "Married", "Civil marriage", "Married",
                                 "Single / not married", "Married", "Married", "Civil marriage", "Married",
                                 "Married", "Single / not married", "Married", "Married", "Civil marriage"],
        "NAME_HOUSING_TYPE" => ["House / apartment", "House / apartment", "With parents", "House / apartment",
                                "House / apartment", "House / apartment", "With parents", "House / apartment",
                                "House / apartment", "House / apartment", "With parents", "House / apartment",
                                "House / apartment", "House / apartment", "House / apartment", "House / apartment",
                                "With parents", "House / apartment", "House / apartment", "House / apartment"],
        "CNT_CHILDREN" => [0i64, 1, 0, 2, 0, 1, 0, 0, 3, 0, 0, 1, 0, 0, 2, 0, 0, 1, 0, 0],
        "OWN_CAR_AGE" => [Some(5.0f64), None, None, None, Some(12.0), None, None, None, None, None,
                          None, None, Some(3.0), None, None, None, None, Some(20.0), None, None],
        "EXT_SOURCE_1" => [Some(0.08f64), None, Some(0.31), None, Some(0.77), None, Some(0.55), None, Some(0.12), None,
                           Some(0.64), None, Some(0.42), None, Some(0.9), None, Some(0.25), None, Some(0.5), None],
    }
    .unwrap()
}

/// Create a larger synthetic raw table for property-style tests
pub fn create_large_raw_dataframe(rows: usize, seed: u64) -> DataFrame {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    let mut rng = StdRng::seed_from_u64(seed);
    let genders = ["F", "M", "XNA"];
    let education = [
        "Secondary / secondary special",
        "Higher education",
        "Incomplete higher",
        "Lower secondary",
        "Academic degree",
    ];
    let family = ["Married", "Single / not married", "Civil marriage", "Separated", "Widow"];
    let housing = ["House / apartment", "With parents", "Municipal apartment", "Rented apartment"];

    let ids: Vec<i64> = (0..rows as i64).collect();
    let target: Vec<i32> = (0..rows).map(|_| i32::from(rng.gen_bool(0.08))).collect();
    let days_birth: Vec<i64> = (0..rows).map(|_| -rng.gen_range(7500..25000)).collect();
    let days_employed: Vec<Option<i64>> = (0..rows)
        .map(|_| match rng.gen_range(0..10) {
            0 => Some(365243),
            1 => None,
            _ => Some(-rng.gen_range(0..15000)),
        })
        .collect();
    let income: Vec<Option<f64>> = (0..rows)
        .map(|_| {
            if rng.gen_bool(0.02) {
                None
            } else {
                Some((rng.gen_range(25_000.0..600_000.0f64) / 100.0).round() * 100.0)
            }
        })
        .collect();
    let credit: Vec<f64> = (0..rows).map(|_| rng.gen_range(45_000.0..2_500_000.0)).collect();
    let annuity: Vec<Option<f64>> = (0..rows)
        .map(|_| {
            if rng.gen_bool(0.01) {
                None
            } else {
                Some(rng.gen_range(2_000.0..100_000.0))
            }
        })
        .collect();
    let pick = |rng: &mut StdRng, levels: &[&str], weights: &[u32]| -> String {
        let total: u32 = weights.iter().sum();
        let mut roll = rng.gen_range(0..total);
        for (level, w) in levels.iter().zip(weights) {
            if roll < *w {
                return level.to_string();
            }
            roll -= w;
        }
        levels[0].to_string()
    };
    let gender: Vec<String> = (0..rows).map(|_| pick(&mut rng, &genders, &[650, 349, 1])).collect();
    let edu: Vec<Option<String>> = (0..rows)
        .map(|_| {
            if rng.gen_bool(0.05) {
                None
            } else {
                Some(pick(&mut rng, &education, &[700, 240, 33, 24, 3]))
            }
        })
        .collect();
    let fam: Vec<String> = (0..rows).map(|_| pick(&mut rng, &family, &[640, 150, 100, 60, 50])).collect();
    let house: Vec<String> = (0..rows).map(|_| pick(&mut rng, &housing, &[880, 50, 40, 30])).collect();
    let sparse: Vec<Option<f64>> = (0..rows)
        .map(|_| if rng.gen_bool(0.7) { None } else { Some(rng.gen::<f64>()) })
        .collect();

    df! {
        "SK_ID_CURR" => ids,
        "TARGET" => target,
        "DAYS_BIRTH" => days_birth,
        "DAYS_EMPLOYED" => days_employed,
        "AMT_INCOME_TOTAL" => income,
        "AMT_CREDIT" => credit,
        "AMT_ANNUITY" => annuity,
        "CODE_GENDER" => gender,
        "NAME_EDUCATION_TYPE" => edu,
        "NAME_FAMILY_STATUS" => fam,
        "NAME_HOUSING_TYPE" => house,
        "COMMONAREA_AVG" => sparse,
    }
    .unwrap()
}

/// Create a temporary directory with a test CSV file
pub fn create_temp_csv(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("application_train.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    CsvWriter::new(&mut file).finish(df).unwrap();

    (temp_dir, csv_path)
}

/// Create a temporary directory with a test Parquet file
pub fn create_temp_parquet(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let parquet_path = temp_dir.path().join("application_train.parquet");

    let file = std::fs::File::create(&parquet_path).unwrap();
    ParquetWriter::new(file).finish(df).unwrap();

    (temp_dir, parquet_path)
}

/// Float values of a column (nulls as `None`)
pub fn f64_values(df: &DataFrame, name: &str) -> Vec<Option<f64>> {
    df.column(name)
        .unwrap()
        .cast(&DataType::Float64)
        .unwrap()
        .f64()
        .unwrap()
        .into_iter()
        .collect()
}

/// String values of a column (nulls as `None`)
pub fn str_values(df: &DataFrame, name: &str) -> Vec<Option<String>> {
    df.column(name)
        .unwrap()
        .str()
        .unwrap()
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect()
}

/// Assert that a DataFrame contains specific columns
pub fn assert_has_columns(df: &DataFrame, expected_cols: &[&str]) {
    let actual_cols: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();
    for col in expected_cols {
        assert!(
            actual_cols.contains(&col.to_string()),
            "Missing expected column: '{}'. Actual columns: {:?}",
            col,
            actual_cols
        );
    }
}

/// Assert that a DataFrame does NOT contain specific columns
pub fn assert_missing_columns(df: &DataFrame, unexpected_cols: &[&str]) {
    let actual_cols: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();
    for col in unexpected_cols {
        assert!(
            !actual_cols.contains(&col.to_string()),
            "Unexpected column still present: '{}'",
            col
        );
    }
}
