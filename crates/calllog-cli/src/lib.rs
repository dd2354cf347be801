//! Call-log CLI library.
//!
//! This crate provides the CLI interface for call-log grouping.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands};
pub use config::Config;
