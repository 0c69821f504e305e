//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the statbot binary.

mod check;
mod commands;
mod console;
mod run;

pub use check::check_config;
pub use commands::{Cli, Commands};
pub use console::run_console;
pub use run::run_bot;
