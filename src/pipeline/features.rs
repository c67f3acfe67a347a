//! Feature engineering: ages, employment tenure and affordability ratios

use polars::prelude::*;

use super::error::PipelineResult;
use super::loader::validate_required_columns;
use super::schema::Col;

/// Days per year used to convert day-count fields
pub const DAYS_PER_YEAR: f64 = 365.25;

/// Upper bound on employment tenure; larger values come from sentinel codes
pub const MAX_EMPLOYMENT_YEARS: f64 = 60.0;

/// Augment the table with `AGE_YEARS`, `EMPLOYMENT_YEARS`, `DTI`,
/// `LOAN_TO_INCOME` and `ANNUITY_TO_CREDIT`.
///
/// Rows are neither dropped nor reordered. Null inputs give null outputs,
/// which the cleaning stage imputes. Zero denominators give non-finite
/// ratios, which are kept as-is.
pub fn engineer_features(df: &DataFrame) -> PipelineResult<DataFrame> {
    validate_required_columns(df)?;

    let days_birth = float_values(df, Col::DaysBirth)?;
    let days_employed = float_values(df, Col::DaysEmployed)?;
    let income = float_values(df, Col::IncomeTotal)?;
    let credit = float_values(df, Col::Credit)?;
    let annuity = float_values(df, Col::Annuity)?;

    let age: Int64Chunked = days_birth
        .into_iter()
        .map(|d| d.map(age_from_days))
        .collect();

    let employment: Float64Chunked = days_employed
        .into_iter()
        .map(|d| d.map(employment_years_from_days))
        .collect();

    let mut out = df.clone();
    out.with_column(age.with_name(Col::AgeYears.into()).into_series())?;
    out.with_column(employment.with_name(Col::EmploymentYears.into()).into_series())?;
    out.with_column((&annuity / &income).with_name(Col::DebtToIncome.into()).into_series())?;
    out.with_column((&credit / &income).with_name(Col::LoanToIncome.into()).into_series())?;
    out.with_column((&annuity / &credit).with_name(Col::AnnuityToCredit.into()).into_series())?;

    log::info!(
        "Engineered {} feature(s) over {} rows",
        Col::ENGINEERED.len(),
        out.height()
    );
    Ok(out)
}

/// Whole years of age from a negative day count, truncated toward zero
pub fn age_from_days(days_birth: f64) -> i64 {
    -((days_birth / DAYS_PER_YEAR).trunc() as i64)
}

/// Employment tenure in years, clamped to `[0, MAX_EMPLOYMENT_YEARS]`
pub fn employment_years_from_days(days_employed: f64) -> f64 {
    (-(days_employed / DAYS_PER_YEAR)).clamp(0.0, MAX_EMPLOYMENT_YEARS)
}

fn float_values(df: &DataFrame, col: Col) -> PipelineResult<Float64Chunked> {
    let column = df.column(col.as_str())?.cast(&DataType::Float64)?;
    Ok(column.f64()?.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_age_truncates_toward_zero() {
        assert_eq!(age_from_days(-10950.0), 29);
        assert_eq!(age_from_days(-10958.0), 30);
        assert_eq!(age_from_days(-365.0), 0);
    }

    #[test]
    fn test_employment_sentinel_clamps_to_zero() {
        assert_eq!(employment_years_from_days(365243.0), 0.0);
    }

    #[test]
    fn test_employment_upper_clamp() {
        assert_eq!(employment_years_from_days(-40000.0), MAX_EMPLOYMENT_YEARS);
    }

    #[test]
    fn test_employment_regular_value() {
        let years = employment_years_from_days(-1826.25);
        assert!((years - 5.0).abs() < 1e-12);
    }
}
