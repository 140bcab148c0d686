//! CLI command definitions for the `ease` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod chat;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// A safe space to talk -- supportive chat sessions, text or voice.
#[derive(Parser)]
#[command(name = "ease", version, about, long_about = None)]
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

    /// Path to the config file.
    #[arg(long, global = true, default_value = "ease.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the REST API server.
    Serve {
        /// Port to listen on.
        #[arg(short, long, default_value = "8710", env = "EASE_PORT")]
        port: u16,

        /// Host to bind to.
        #[arg(long, default_value = "127.0.0.1", env = "EASE_HOST")]
        host: String,
    },

    /// List recorded session history.
    History {
        /// Identity whose history to list.
        #[arg(short, long, default_value = "friend@ease.local")]
        user: String,
    },

    /// Start an interactive chat session in the terminal.
    Chat {
        /// Identity to greet you by (usually an email).
        #[arg(short, long, default_value = "friend@ease.local")]
        user: String,

        /// Use the deterministic scripted responder instead of the
        /// randomized pool.
        #[arg(long)]
        scripted: bool,
    },
}
