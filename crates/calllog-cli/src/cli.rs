//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::compare::CompareArgs;
use crate::commands::group::GroupArgs;

/// Call-log grouping tool.
///
/// Reads call history as JSON Lines (most recent call first) and shows how it
/// collapses into rows under Today / Yesterday / Older headers.
#[derive(Debug, Parser)]
#[command(name = "calllog", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Group call records into rows and day sections.
    Group(GroupArgs),

    /// Check whether two numbers or SIP addresses denote the same party.
    Compare(CompareArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_group_flags() {
        let cli = Cli::try_parse_from([
            "calllog",
            "-v",
            "group",
            "--input",
            "calls.jsonl",
            "--flat",
            "--json",
            "--now",
            "2024-03-10T12:00:00Z",
        ])
        .unwrap();

        assert!(cli.verbose);
        let Some(Commands::Group(args)) = cli.command else {
            panic!("expected group command");
        };
        assert_eq!(args.input, Some(PathBuf::from("calls.jsonl")));
        assert!(args.flat);
        assert!(args.json);
        assert_eq!(args.now.as_deref(), Some("2024-03-10T12:00:00Z"));
    }

    #[test]
    fn parses_compare_arguments() {
        let cli = Cli::try_parse_from(["calllog", "compare", "555-1234", "5551234"]).unwrap();
        let Some(Commands::Compare(args)) = cli.command else {
            panic!("expected compare command");
        };
        assert_eq!(args.a, "555-1234");
        assert_eq!(args.b, "5551234");
        assert!(!args.json);
    }
}
