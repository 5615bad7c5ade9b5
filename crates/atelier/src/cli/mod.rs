//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the atelier binary.

mod commands;
mod handlers;

pub use commands::Cli;
pub use handlers::run_command;
