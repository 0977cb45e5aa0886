//! Command-line interface for gridmatch.

use clap::{Parser, Subcommand};

/// Gridmatch - in-memory turn-based game session server
#[derive(Parser, Debug)]
#[command(name = "gridmatch")]
#[command(about = "Turn-based game session server with an HTTP API", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP game server
    Serve {
        /// Port to bind to
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Requests allowed per client per rate-limit window
        #[arg(long, default_value = "100")]
        rate_limit: u32,

        /// Rate-limit window length in seconds
        #[arg(long, default_value = "60")]
        rate_window_secs: u64,
    },
}
