//! CLI module for Clientbook
//!
//! Provides command-line interface parsing for the clientbook-server binary.
//! Uses clap for argument parsing and owo-colors for colored terminal output.

pub mod init;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Clientbook - customer records behind token authentication
#[derive(Parser, Debug)]
#[command(
    name = "clientbook-server",
    version,
    about = "Clientbook - customer records API with token authentication",
    long_about = "A CRUD backend for customer records. Accounts register and log in with\n\
                  email and password, receive a signed bearer token, and keep one active\n\
                  session at a time.\n\n\
                  Run without arguments to start the server, or use 'init' to scaffold a config.",
    after_help = "EXAMPLES:\n    \
                  clientbook-server init                      # Write clientbook.toml and .env.example\n    \
                  clientbook-server                           # Start the server (requires clientbook.toml)\n    \
                  clientbook-server config --validate         # Check the config and its secrets\n    \
                  clientbook-server --config my.toml          # Use a custom config file"
)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "clientbook.toml", global = true)]
    pub config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scaffold clientbook.toml and .env.example
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Overwrite existing files
        #[arg(short, long)]
        force: bool,

        /// Host address for the server
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port for the server
        #[arg(long, default_value = "8080")]
        port: u16,
    },

    /// Show configuration information
    Config {
        /// Validate the configuration file, including referenced env vars
        #[arg(long)]
        validate: bool,
    },
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
