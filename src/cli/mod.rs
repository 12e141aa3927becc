//! CLI interface using clap.
//!
//! Provides command-line arguments and subcommands for the tool.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::application::OutputFormat;

/// subs-export - Export YouTube subscriptions and extract channel IDs.
#[derive(Parser, Debug)]
#[command(name = "subs-export")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging (use multiple times for more verbosity).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output format: list, json, or table.
    #[arg(short, long, default_value = "list", global = true)]
    pub format: String,

    /// Settings file (defaults to ~/.subs-export/settings.toml).
    #[arg(long, global = true)]
    pub settings: Option<PathBuf>,

    /// Credentials JSON file (overrides the settings file).
    #[arg(long, global = true)]
    pub credentials: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch all subscriptions, save a snapshot, and extract channel IDs.
    Sync {
        /// Snapshot file to write.
        #[arg(short, long)]
        snapshot: Option<PathBuf>,

        /// Items requested per page (1-50).
        #[arg(long)]
        page_size: Option<u32>,

        /// Write channel IDs to this file instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Extract channel IDs from an existing snapshot.
    Extract {
        /// Snapshot file to read.
        #[arg(short, long)]
        snapshot: Option<PathBuf>,

        /// Write channel IDs to this file instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Resolve credentials and report their kind and source.
    CheckConfig,

    /// Show the settings, credentials and snapshot paths in use.
    Paths,

    /// Create a default settings file.
    Init,
}

impl Cli {
    /// Parse the output format argument.
    pub fn output_format(&self) -> Result<OutputFormat, String> {
        self.format.parse()
    }
}
