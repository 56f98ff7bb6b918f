//! CLI module - argument parsing and interactive prompts

mod args;
mod prompts;

pub use args::{Cli, Preset, DELTA_CATEGORIES};
pub use prompts::*;
