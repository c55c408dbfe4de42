//! CLI - Command-line argument parsing
//!
//! Keeps argument parsing separate from execution logic.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// SiteGenie CLI
#[derive(Parser, Debug)]
#[command(name = "sitegenie")]
#[command(about = "SiteGenie - construction-only chat assistant", long_about = None)]
#[command(version = env!("SITEGENIE_VERSION"))]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// Chat history database (overrides $DATABASE_PATH and the config file)
    #[arg(long, global = true, value_name = "PATH")]
    pub database: Option<PathBuf>,

    /// Settings file (default: ~/.config/sitegenie/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Hosted model name (overrides $SITEGENIE_MODEL)
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand (if not provided, starts the interactive chat)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Interactive chat (default)
    Chat,

    /// Ask a single question and print the reply
    Ask {
        /// The question; multiple words are joined with spaces
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },

    /// Print the saved conversation
    History {
        /// Output JSON only
        #[arg(long)]
        json: bool,
    },

    /// Delete the saved conversation
    Clear,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_means_chat() {
        let cli = Cli::try_parse_from(["sitegenie"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn test_ask_joins_words() {
        let cli = Cli::try_parse_from(["sitegenie", "ask", "cement", "for", "slabs"]).unwrap();
        match cli.command {
            Some(Commands::Ask { query }) => assert_eq!(query.join(" "), "cement for slabs"),
            other => panic!("expected ask, got {:?}", other),
        }
    }

    #[test]
    fn test_ask_requires_query() {
        assert!(Cli::try_parse_from(["sitegenie", "ask"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "sitegenie",
            "history",
            "--json",
            "--database",
            "/tmp/h.db",
            "-v",
        ])
        .unwrap();
        assert_eq!(cli.command, Some(Commands::History { json: true }));
        assert_eq!(cli.database, Some(PathBuf::from("/tmp/h.db")));
        assert!(cli.verbose);
    }

    #[test]
    fn test_clear_and_chat() {
        let cli = Cli::try_parse_from(["sitegenie", "clear"]).unwrap();
        assert_eq!(cli.command, Some(Commands::Clear));
        let cli = Cli::try_parse_from(["sitegenie", "chat", "--model", "gemini-2.5-flash"]).unwrap();
        assert_eq!(cli.command, Some(Commands::Chat));
        assert_eq!(cli.model.as_deref(), Some("gemini-2.5-flash"));
    }
}
