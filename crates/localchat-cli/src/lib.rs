//! Command-line entry point for the localchat server.

#![deny(unsafe_code)]

pub mod error;
pub mod logging;
pub mod parser;

pub use error::CliError;
pub use logging::init_tracing;
pub use parser::Cli;
