//! Command-line interface definitions.

pub mod chat;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "parlor", version, about = "Streaming chat relay for hosted models")]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the relay server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value_t = 3000)]
        port: u16,

        /// Host address to bind
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },

    /// Chat from the terminal against a running server
    Chat {
        /// Base URL of the server
        #[arg(short, long, default_value = "http://127.0.0.1:3000")]
        url: String,
    },
}
