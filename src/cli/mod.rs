//! CLI module - Command-line interface for the content explorer
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use clap::{Parser, Subcommand};

use crate::domain::KindFilter;

/// Content Explorer - search, image generation and per-user history
#[derive(Parser)]
#[command(name = "content-explorer")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API until Ctrl+C
    #[command(alias = "daemon")]
    Serve,

    /// Create default config file
    #[command(alias = "--init")]
    Init,

    /// Run a web search without saving it
    #[command(alias = "s")]
    Search {
        /// Search query
        #[arg(required = true)]
        query: Vec<String>,
    },

    /// Generate images for a prompt without saving them
    Image {
        /// Prompt text; empty uses the configured default
        prompt: Vec<String>,
    },

    /// Show a user's dashboard history
    #[command(alias = "h")]
    History {
        /// Email of the owning user
        email: String,
        /// all, search or image
        #[arg(long = "type", value_enum, default_value = "all")]
        kind: KindArg,
        #[arg(long, default_value_t = 1)]
        page: u64,
        /// Case-insensitive filter on query or prompt text
        #[arg(long)]
        q: Option<String>,
    },

    /// Delete a user's entries with an empty query or prompt
    Cleanup {
        /// Email of the owning user
        email: String,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
pub enum KindArg {
    All,
    Search,
    Image,
}

impl From<KindArg> for KindFilter {
    fn from(arg: KindArg) -> Self {
        match arg {
            KindArg::All => Self::All,
            KindArg::Search => Self::Search,
            KindArg::Image => Self::Image,
        }
    }
}

pub use commands::*;
