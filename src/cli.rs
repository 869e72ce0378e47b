//! Command-line interface for the reelist server.

use clap::{Parser, Subcommand};

/// Reelist - movie favorites API server
#[derive(Parser)]
#[command(name = "reelist")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API server (default)
    Serve,

    /// Write a default config.toml if none exists
    InitConfig,
}
