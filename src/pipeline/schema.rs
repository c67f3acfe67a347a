//! Column catalog for the loan-application dataset
//!
//! Stages never address columns through free-form strings. Every column a
//! stage reads or writes is a [`Col`] variant; columns outside the catalog
//! pass through the pipeline untouched.

use std::fmt;

/// Known columns of the raw and canonical datasets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Col {
    // Raw columns
    ApplicationId,
    Target,
    DaysBirth,
    DaysEmployed,
    IncomeTotal,
    Credit,
    Annuity,
    GoodsPrice,
    Gender,
    Education,
    FamilyStatus,
    Housing,
    ContractType,
    Children,
    FamilyMembers,
    // Derived by the pipeline
    AgeYears,
    EmploymentYears,
    DebtToIncome,
    LoanToIncome,
    AnnuityToCredit,
    IncomeBracket,
    // Derived by the filter engine on every call, never by the pipeline
    FixedIncomeBracket,
}

impl Col {
    /// Raw columns every input table must carry
    pub const REQUIRED: [Col; 5] = [
        Col::DaysBirth,
        Col::DaysEmployed,
        Col::IncomeTotal,
        Col::Credit,
        Col::Annuity,
    ];

    /// Columns added by feature engineering, in insertion order
    pub const ENGINEERED: [Col; 5] = [
        Col::AgeYears,
        Col::EmploymentYears,
        Col::DebtToIncome,
        Col::LoanToIncome,
        Col::AnnuityToCredit,
    ];

    /// Categorical columns that the filter engine offers as multi-selects
    pub const FILTERABLE: [Col; 4] = [
        Col::Gender,
        Col::Education,
        Col::FamilyStatus,
        Col::Housing,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Col::ApplicationId => "SK_ID_CURR",
            Col::Target => "TARGET",
            Col::DaysBirth => "DAYS_BIRTH",
            Col::DaysEmployed => "DAYS_EMPLOYED",
            Col::IncomeTotal => "AMT_INCOME_TOTAL",
            Col::Credit => "AMT_CREDIT",
            Col::Annuity => "AMT_ANNUITY",
            Col::GoodsPrice => "AMT_GOODS_PRICE",
            Col::Gender => "CODE_GENDER",
            Col::Education => "NAME_EDUCATION_TYPE",
            Col::FamilyStatus => "NAME_FAMILY_STATUS",
            Col::Housing => "NAME_HOUSING_TYPE",
            Col::ContractType => "NAME_CONTRACT_TYPE",
            Col::Children => "CNT_CHILDREN",
            Col::FamilyMembers => "CNT_FAM_MEMBERS",
            Col::AgeYears => "AGE_YEARS",
            Col::EmploymentYears => "EMPLOYMENT_YEARS",
            Col::DebtToIncome => "DTI",
            Col::LoanToIncome => "LOAN_TO_INCOME",
            Col::AnnuityToCredit => "ANNUITY_TO_CREDIT",
            Col::IncomeBracket => "INCOME_BRACKET",
            Col::FixedIncomeBracket => "FIXED_INCOME_BRACKET",
        }
    }
}

impl fmt::Display for Col {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Col> for polars::prelude::PlSmallStr {
    fn from(col: Col) -> Self {
        polars::prelude::PlSmallStr::from_static(col.as_str())
    }
}
