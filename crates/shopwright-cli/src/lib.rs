//! Shopwright CLI library
//!
//! Argument parsing, configuration layering and report output for the
//! `shopwright` binary.

#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

mod commands;
mod error;
pub mod output;
pub mod runner;

pub use commands::{ApiArgs, Cli, Commands, UiArgs};
pub use error::{CliError, CliResult};
