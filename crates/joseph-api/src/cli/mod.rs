//! CLI command definitions and dispatch for the `joseph` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod ask;
pub mod conversation;
pub mod topics;

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use uuid::Uuid;

/// Topic-aware business forecasting assistant.
#[derive(Parser)]
#[command(name = "joseph", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the REST API server.
    Serve {
        /// Port to listen on (defaults to `[server] port` in config.toml).
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (defaults to `[server] host` in config.toml).
        #[arg(long)]
        host: Option<String>,
    },

    /// List the supported topics.
    Topics,

    /// List stored conversations.
    #[command(alias = "ls")]
    Conversations {
        /// Only show conversations with this topic.
        #[arg(long)]
        topic: Option<String>,

        /// Maximum number of conversations to show.
        #[arg(long, default_value = "20")]
        limit: i64,
    },

    /// Print every turn of a conversation.
    History {
        /// Conversation ID.
        conversation_id: Uuid,
    },

    /// Send one message and print the reply.
    Ask {
        /// Topic token for a new conversation (e.g. `pricing-strategy`).
        #[arg(long, required_unless_present = "conversation")]
        topic: Option<String>,

        /// Continue an existing conversation.
        #[arg(long)]
        conversation: Option<Uuid>,

        /// The message to send.
        message: String,
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
    fn test_ask_requires_topic_or_conversation() {
        assert!(Cli::try_parse_from(["joseph", "ask", "hello"]).is_err());

        let cli = Cli::try_parse_from(["joseph", "ask", "--topic", "general", "hello"]).unwrap();
        match cli.command {
            Commands::Ask { topic, message, .. } => {
                assert_eq!(topic.as_deref(), Some("general"));
                assert_eq!(message, "hello");
            }
            _ => panic!("expected ask"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["joseph", "topics", "--json", "-vv"]).unwrap();
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
    }
}
