//! Filter module - interactive, stateful filtering of the canonical dataset

pub mod brackets;
pub mod engine;
pub mod selection;
pub mod state;

pub use brackets::*;
pub use engine::*;
pub use selection::*;
pub use state::*;
