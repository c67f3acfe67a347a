//! Aggregate indicators over a canonical or filtered table
//!
//! Every aggregate skips null and non-finite values (ratios with a zero
//! denominator). A KPI whose input column is absent, or has no usable
//! value, is `None`.

use std::collections::HashMap;

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;
use polars::prelude::*;
use serde::Serialize;

use crate::pipeline::stats::{finite_mean, median_sorted, sorted_values};
use crate::pipeline::Col;

/// Credit amount above which a loan counts as high-credit
pub const HIGH_CREDIT_AMOUNT: f64 = 1_000_000.0;

/// Headline indicators of a table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewKpis {
    pub total_applicants: usize,
    pub default_rate_pct: Option<f64>,
    pub repaid_rate_pct: Option<f64>,
    pub total_features: usize,
    pub avg_missing_pct: f64,
    pub numeric_features: usize,
    pub categorical_features: usize,
    pub median_age: Option<f64>,
    pub median_income: Option<f64>,
    pub avg_credit: Option<f64>,
}

impl OverviewKpis {
    pub fn compute(df: &DataFrame) -> Self {
        let total_applicants = df
            .column(Col::ApplicationId.as_str())
            .ok()
            .and_then(|c| c.n_unique().ok())
            .unwrap_or(df.height());

        let default_rate_pct = mean_of(df, Col::Target).map(|m| m * 100.0);

        let avg_missing_pct = if df.width() == 0 || df.height() == 0 {
            0.0
        } else {
            let height = df.height() as f64;
            df.get_columns()
                .iter()
                .map(|c| c.null_count() as f64 / height)
                .sum::<f64>()
                / df.width() as f64
                * 100.0
        };

        let numeric_features = df
            .get_columns()
            .iter()
            .filter(|c| c.dtype().is_primitive_numeric())
            .count();
        let categorical_features = df
            .get_columns()
            .iter()
            .filter(|c| c.dtype() == &DataType::String)
            .count();

        Self {
            total_applicants,
            default_rate_pct,
            repaid_rate_pct: default_rate_pct.map(|r| 100.0 - r),
            total_features: df.width(),
            avg_missing_pct,
            numeric_features,
            categorical_features,
            median_age: median_of(df, Col::AgeYears),
            median_income: median_of(df, Col::IncomeTotal),
            avg_credit: mean_of(df, Col::Credit),
        }
    }
}

/// Household and employment indicators
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DemographicKpis {
    pub female_pct: Option<f64>,
    pub male_pct: Option<f64>,
    pub avg_age_defaulters: Option<f64>,
    pub avg_age_repayers: Option<f64>,
    pub with_children_pct: Option<f64>,
    pub avg_family_size: Option<f64>,
    pub higher_education_pct: Option<f64>,
    pub living_with_parents_pct: Option<f64>,
    pub currently_employed_pct: Option<f64>,
    pub avg_employment_years: Option<f64>,
}

impl DemographicKpis {
    pub fn compute(df: &DataFrame) -> Self {
        Self {
            female_pct: share_equal(df, Col::Gender, "F"),
            male_pct: share_equal(df, Col::Gender, "M"),
            avg_age_defaulters: mean_by_outcome(df, Col::AgeYears, true),
            avg_age_repayers: mean_by_outcome(df, Col::AgeYears, false),
            with_children_pct: share_where(df, Col::Children, |v| v > 0.0),
            avg_family_size: mean_of(df, Col::FamilyMembers),
            higher_education_pct: share_equal(df, Col::Education, "Higher education"),
            living_with_parents_pct: share_equal(df, Col::Housing, "With parents"),
            currently_employed_pct: share_where(df, Col::EmploymentYears, |v| v > 0.0),
            avg_employment_years: mean_of(df, Col::EmploymentYears),
        }
    }
}

/// Affordability indicators
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancialKpis {
    pub avg_income: Option<f64>,
    pub median_income: Option<f64>,
    pub avg_credit: Option<f64>,
    pub avg_annuity: Option<f64>,
    pub avg_goods_price: Option<f64>,
    pub avg_dti_pct: Option<f64>,
    pub avg_loan_to_income_pct: Option<f64>,
    /// Mean income of repayers minus mean income of defaulters
    pub income_gap: Option<f64>,
    /// Mean credit of repayers minus mean credit of defaulters
    pub credit_gap: Option<f64>,
    pub high_credit_pct: Option<f64>,
}

impl FinancialKpis {
    pub fn compute(df: &DataFrame) -> Self {
        let gap = |col| match (mean_by_outcome(df, col, false), mean_by_outcome(df, col, true)) {
            (Some(repaid), Some(defaulted)) => Some(repaid - defaulted),
            _ => None,
        };

        Self {
            avg_income: mean_of(df, Col::IncomeTotal),
            median_income: median_of(df, Col::IncomeTotal),
            avg_credit: mean_of(df, Col::Credit),
            avg_annuity: mean_of(df, Col::Annuity),
            avg_goods_price: mean_of(df, Col::GoodsPrice),
            avg_dti_pct: mean_of(df, Col::DebtToIncome).map(|m| m * 100.0),
            avg_loan_to_income_pct: mean_of(df, Col::LoanToIncome).map(|m| m * 100.0),
            income_gap: gap(Col::IncomeTotal),
            credit_gap: gap(Col::Credit),
            high_credit_pct: share_where(df, Col::Credit, |v| v > HIGH_CREDIT_AMOUNT),
        }
    }
}

/// Default rate of one level of a categorical column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentRate {
    pub level: String,
    pub applicants: usize,
    pub default_rate_pct: f64,
}

/// Default rate per level of `col`, highest rate first.
///
/// Rows with a null level or null target are skipped. Returns an empty list
/// when either column is absent.
pub fn default_rate_by(df: &DataFrame, col: Col) -> Vec<SegmentRate> {
    let (Some(levels), Some(targets)) = (string_values(df, col), float_values(df, Col::Target)) else {
        return Vec::new();
    };

    let mut groups: HashMap<String, (usize, f64)> = HashMap::new();
    for (level, target) in levels.into_iter().zip(targets) {
        if let (Some(level), Some(target)) = (level, target) {
            let entry = groups.entry(level).or_insert((0, 0.0));
            entry.0 += 1;
            entry.1 += target;
        }
    }

    let mut rates: Vec<SegmentRate> = groups
        .into_iter()
        .map(|(level, (n, defaults))| SegmentRate {
            level,
            applicants: n,
            default_rate_pct: defaults / n as f64 * 100.0,
        })
        .collect();
    rates.sort_by(|a, b| {
        b.default_rate_pct
            .total_cmp(&a.default_rate_pct)
            .then_with(|| a.level.cmp(&b.level))
    });
    rates
}

/// Print the KPI cards as tables
pub fn display_kpis(overview: &OverviewKpis, financial: &FinancialKpis) {
    println!();
    println!(
        "    {} {}",
        style("📊").cyan(),
        style("KEY INDICATORS").white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());
    println!();

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        Cell::new("Indicator").add_attribute(Attribute::Bold),
        Cell::new("Value").add_attribute(Attribute::Bold),
    ]);

    table.add_row(vec![
        Cell::new("👥 Total Applicants"),
        Cell::new(overview.total_applicants).add_attribute(Attribute::Bold),
    ]);
    table.add_row(vec![
        Cell::new("⚠️  Default Rate"),
        Cell::new(fmt_pct(overview.default_rate_pct)).fg(Color::Red),
    ]);
    table.add_row(vec![
        Cell::new("✅ Repaid Rate"),
        Cell::new(fmt_pct(overview.repaid_rate_pct)).fg(Color::Green),
    ]);
    table.add_row(vec![
        Cell::new("🧮 Features (numeric / categorical)"),
        Cell::new(format!(
            "{} ({} / {})",
            overview.total_features, overview.numeric_features, overview.categorical_features
        )),
    ]);
    table.add_row(vec![
        Cell::new("🕳️  Avg Missing"),
        Cell::new(format!("{:.2}%", overview.avg_missing_pct)),
    ]);
    table.add_row(vec![
        Cell::new("🎂 Median Age"),
        Cell::new(fmt_num(overview.median_age, " years")),
    ]);
    table.add_row(vec![
        Cell::new("💰 Median / Avg Income"),
        Cell::new(format!(
            "{} / {}",
            fmt_num(financial.median_income, ""),
            fmt_num(financial.avg_income, "")
        )),
    ]);
    table.add_row(vec![
        Cell::new("🏦 Avg Credit"),
        Cell::new(fmt_num(financial.avg_credit, "")),
    ]);
    table.add_row(vec![
        Cell::new("📆 Avg Annuity"),
        Cell::new(fmt_num(financial.avg_annuity, "")),
    ]);
    table.add_row(vec![
        Cell::new("⚖️  Avg DTI / Loan-to-Income"),
        Cell::new(format!(
            "{} / {}",
            fmt_pct(financial.avg_dti_pct),
            fmt_pct(financial.avg_loan_to_income_pct)
        )),
    ]);
    table.add_row(vec![
        Cell::new("📈 High-Credit Loans"),
        Cell::new(fmt_pct(financial.high_credit_pct)),
    ]);

    for line in table.to_string().lines() {
        println!("    {}", line);
    }
}

/// Print default rates for one segmenting column
pub fn display_segment_rates(title: &str, rates: &[SegmentRate]) {
    if rates.is_empty() {
        return;
    }
    println!();
    println!("    {} {}", style("◆").cyan(), style(title).white().bold());

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        Cell::new("Level").add_attribute(Attribute::Bold),
        Cell::new("Applicants").add_attribute(Attribute::Bold),
        Cell::new("Default Rate").add_attribute(Attribute::Bold),
    ]);
    for r in rates {
        table.add_row(vec![
            Cell::new(&r.level),
            Cell::new(r.applicants),
            Cell::new(format!("{:.2}%", r.default_rate_pct)),
        ]);
    }
    for line in table.to_string().lines() {
        println!("    {}", line);
    }
}

fn fmt_pct(v: Option<f64>) -> String {
    v.map(|x| format!("{:.2}%", x)).unwrap_or_else(|| "n/a".to_string())
}

fn fmt_num(v: Option<f64>, unit: &str) -> String {
    v.map(|x| format!("{:.2}{}", x, unit))
        .unwrap_or_else(|| "n/a".to_string())
}

fn float_values(df: &DataFrame, col: Col) -> Option<Vec<Option<f64>>> {
    let column = df.column(col.as_str()).ok()?.cast(&DataType::Float64).ok()?;
    Some(column.f64().ok()?.into_iter().collect())
}

fn string_values(df: &DataFrame, col: Col) -> Option<Vec<Option<String>>> {
    let column = df.column(col.as_str()).ok()?.cast(&DataType::String).ok()?;
    Some(
        column
            .str()
            .ok()?
            .into_iter()
            .map(|v| v.map(str::to_string))
            .collect(),
    )
}

fn mean_of(df: &DataFrame, col: Col) -> Option<f64> {
    finite_mean(float_values(df, col)?.into_iter().flatten())
}

fn median_of(df: &DataFrame, col: Col) -> Option<f64> {
    let column = df.column(col.as_str()).ok()?;
    let sorted: Vec<f64> = sorted_values(column)
        .ok()?
        .into_iter()
        .filter(|v| v.is_finite())
        .collect();
    median_sorted(&sorted)
}

fn mean_by_outcome(df: &DataFrame, col: Col, defaulted: bool) -> Option<f64> {
    let values = float_values(df, col)?;
    let targets = float_values(df, Col::Target)?;
    let wanted = if defaulted { 1.0 } else { 0.0 };
    finite_mean(
        values
            .into_iter()
            .zip(targets)
            .filter_map(|(v, t)| if t == Some(wanted) { v } else { None }),
    )
}

fn share_where(df: &DataFrame, col: Col, pred: impl Fn(f64) -> bool) -> Option<f64> {
    let values: Vec<f64> = float_values(df, col)?.into_iter().flatten().collect();
    if values.is_empty() {
        return None;
    }
    let hits = values.iter().filter(|v| pred(**v)).count();
    Some(hits as f64 / values.len() as f64 * 100.0)
}

fn share_equal(df: &DataFrame, col: Col, level: &str) -> Option<f64> {
    let values: Vec<String> = string_values(df, col)?.into_iter().flatten().collect();
    if values.is_empty() {
        return None;
    }
    let hits = values.iter().filter(|v| v.as_str() == level).count();
    Some(hits as f64 / values.len() as f64 * 100.0)
}
