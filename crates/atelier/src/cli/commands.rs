//! CLI command definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Atelier - content-addressed asset store with derived image variants
#[derive(Parser, Debug)]
#[command(name = "atelier")]
#[command(about = "Content-addressed asset store with derived image variants", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (defaults to bundled, home and ./atelier.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ingest a local file or a remote URL
    Ingest {
        /// Local path or http(s) URL
        source: String,

        /// Decode as an image and record its metadata
        #[arg(long)]
        image: bool,

        /// Display name (defaults to the file name or hash)
        #[arg(long)]
        name: Option<String>,

        /// Transport to store the asset in
        #[arg(long)]
        transport: Option<String>,
    },

    /// Generate a named variant of an image
    Thumb {
        /// Image id
        id: String,

        /// Variant name
        variant: String,

        /// Maximum width
        #[arg(long)]
        width: u32,

        /// Maximum height
        #[arg(long)]
        height: u32,

        /// Resize to exactly width x height instead of fitting
        #[arg(long)]
        exact: bool,
    },

    /// Print the URL of an asset or one of its variants
    Url {
        /// Asset id
        id: String,

        /// Registered variant name
        #[arg(long)]
        variant: Option<String>,
    },

    /// Print the sanitised record of an asset
    Show {
        /// Asset id
        id: String,

        /// Comma-separated fields to include instead of the default projection
        #[arg(long, value_delimiter = ',')]
        fields: Vec<String>,
    },

    /// Remove an asset, its variants and its record
    Remove {
        /// Asset id
        id: String,
    },
}
