//! Terminal helpers shared by the pipeline and the CLI

pub mod progress;
pub mod styling;

pub use progress::*;
pub use styling::*;
