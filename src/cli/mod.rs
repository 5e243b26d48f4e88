//! CLI module for the account service

pub mod serve;

use clap::{Parser, Subcommand};

/// User account service with validated, hashed credentials
#[derive(Parser)]
#[command(name = "account-lifecycle")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API server
    Serve(serve::ServeArgs),
}
