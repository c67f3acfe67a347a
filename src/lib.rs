//! LoanLens: Loan Application Data Preparation Library
//!
//! A library for turning a raw loan-application table into an analysis-ready
//! dataset (feature engineering, cleaning, winsorization, income
//! segmentation) and filtering it interactively with persistent state.

pub mod cli;
pub mod filter;
pub mod pipeline;
pub mod report;
pub mod utils;
