//! CLI argument definitions.

use clap::{Parser, Subcommand};

/// Top-level CLI parser for `taskspark`.
#[derive(Debug, Parser)]
#[command(name = "taskspark", version, about = "Task list with AI-suggested subtasks")]
pub struct Cli {
    /// The command to execute. Defaults to an interactive session.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start an interactive task session.
    Session,
    /// Ask for subtask suggestions for one task and print them.
    Suggest {
        /// Task description.
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use clap::Parser;

    #[test]
    fn no_subcommand_means_session() {
        let cli = Cli::parse_from(["taskspark"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn parses_session_subcommand() {
        let cli = Cli::parse_from(["taskspark", "session"]);
        assert!(matches!(cli.command, Some(Command::Session)));
    }

    #[test]
    fn parses_suggest_words() {
        let cli = Cli::parse_from(["taskspark", "suggest", "Bake", "bread"]);
        let Some(Command::Suggest { text }) = cli.command else {
            panic!("expected suggest");
        };
        assert_eq!(text, vec!["Bake", "bread"]);
    }

    #[test]
    fn suggest_requires_text() {
        assert!(Cli::try_parse_from(["taskspark", "suggest"]).is_err());
    }
}
