//! CLI command definitions for the `dsaguru` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod ask;
pub mod quota;
pub mod welcome;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Quota-gated DSA tutor.
#[derive(Parser)]
#[command(name = "dsaguru", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Only log errors (command results are still printed).
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    /// Keep quota counters in memory instead of the SQLite database.
    #[arg(long, global = true)]
    pub ephemeral: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show how many questions a user has left today.
    Quota {
        /// User id to look up.
        #[arg(short, long, env = "DSAGURU_USER")]
        user: String,
    },

    /// Ask the tutor a question.
    Ask {
        /// User id the question is charged to.
        #[arg(short, long, env = "DSAGURU_USER")]
        user: String,

        /// The question text.
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },

    /// Print the greeting shown when a chat opens.
    Welcome,

    /// Start the REST API server.
    Serve {
        /// Port to listen on.
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to.
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_ask_joins_words() {
        let cli = Cli::try_parse_from([
            "dsaguru", "--ephemeral", "ask", "-u", "alice", "what", "is", "a", "heap",
        ])
        .unwrap();
        assert!(cli.ephemeral);
        match cli.command {
            Commands::Ask { user, question } => {
                assert_eq!(user, "alice");
                assert_eq!(question.join(" "), "what is a heap");
            }
            _ => panic!("expected Ask"),
        }
    }

    #[test]
    fn test_serve_defaults() {
        let cli = Cli::try_parse_from(["dsaguru", "serve"]).unwrap();
        match cli.command {
            Commands::Serve { port, host } => {
                assert_eq!(port, 3000);
                assert_eq!(host, "127.0.0.1");
            }
            _ => panic!("expected Serve"),
        }
    }

    #[test]
    fn test_ask_requires_question() {
        assert!(Cli::try_parse_from(["dsaguru", "ask", "-u", "alice"]).is_err());
    }

    #[test]
    fn test_quiet_only_affects_logging() {
        let cmd = Cli::command();
        let quiet = cmd
            .get_arguments()
            .find(|a| a.get_id() == "quiet")
            .unwrap();
        let help = quiet.get_help().unwrap().to_string();
        assert!(help.contains("Only log errors"));

        let cli = Cli::try_parse_from(["dsaguru", "--quiet", "welcome"]).unwrap();
        assert!(cli.quiet);
        assert_eq!(dsaguru_observe::verbosity_filter(cli.verbose, cli.quiet), "error");
    }
}
