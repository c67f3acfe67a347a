//! CLI module - argument parsing, prompts and the interactive explorer

mod args;
pub mod explore;
pub mod output;
mod prompts;

pub use args::{Cli, Commands};
pub use explore::run_explore;
pub use output::save_dataset;
pub use prompts::*;
