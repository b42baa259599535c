//! CLI argument parsing for planstore

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ps")]
#[command(author, version, about = "Inspect the ApexPlanner key-value store", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override the store directory
    #[arg(short, long)]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List all keys
    Keys,

    /// Print the raw value of a key
    Cat {
        /// Key to display
        #[arg(required = true)]
        key: String,
    },

    /// Write a raw value to a key
    Set {
        /// Key to write
        #[arg(required = true)]
        key: String,

        /// JSON value
        #[arg(required = true)]
        value: String,
    },

    /// Remove a key
    Rm {
        /// Key to remove
        #[arg(required = true)]
        key: String,
    },

    /// Show store statistics
    Stats,
}
