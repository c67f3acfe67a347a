//! Report module - summarizing preprocessing results and key indicators

pub mod export;
pub mod kpi;
pub mod summary;

pub use export::*;
pub use kpi::*;
pub use summary::*;
