//! CLI argument parsing and host-boundary payload validation

pub mod cli;
pub mod payload;

pub use cli::{Cli, Command};
