use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "loopcast")]
#[command(author, version, about = "Personalized linear HLS channels from looping VOD assets")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the manifest service
    Start {
        /// Host to bind to
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },

    /// Measure a VOD asset at its origin and add it to the catalog
    Ingest {
        /// URL of the asset's master manifest
        #[arg(required = true)]
        master_url: String,

        /// Catalog name (defaults to the master URL's directory name)
        #[arg(long)]
        name: Option<String>,
    },

    /// Append an asset to the channel schedule
    Schedule {
        /// Asset id from `loopcast ingest`
        #[arg(required = true)]
        asset_id: String,

        /// When the entry stops being relevant, in epoch milliseconds.
        /// Omit to make this the open-ended now-playing entry.
        #[arg(long)]
        end_epoch_ms: Option<i64>,
    },

    /// List the catalog and schedule
    Catalog,

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
