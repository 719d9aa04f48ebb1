use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// AERON recovery generator
#[derive(Debug, Parser)]
#[command(name = "aeron", about = "Recovery option generation for disrupted flights")]
pub struct Args {
    /// Path to configuration file; providers come from the environment when it does not exist
    #[arg(short, long, default_value = "aeron.toml", env = "AERON_CONFIG")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate recovery options for a disruption read from a JSON file
    Generate(GenerateArgs),

    /// Show the category a disruption type and reason map to
    Classify {
        /// Disruption type, e.g. `Technical`
        #[arg(long = "type")]
        disruption_type: String,

        /// Free-text disruption reason
        #[arg(long, default_value = "")]
        reason: String,
    },

    /// List configured providers and the current selection
    Providers,

    /// Probe the current provider
    Health,

    /// Show usage statistics, or recent log entries for one provider
    Stats {
        /// Provider whose log entries to show
        #[arg(long)]
        provider: Option<String>,

        /// Number of log entries to show
        #[arg(long, default_value_t = 50)]
        limit: usize,
    },

    /// Switch the current provider and show the resulting selection
    Switch {
        /// Provider name, e.g. `anthropic`
        name: String,
    },
}

#[derive(Debug, clap::Args)]
pub struct GenerateArgs {
    /// Disruption record in JSON
    #[arg(long)]
    pub disruption: PathBuf,

    /// Number of options to generate
    #[arg(long)]
    pub count: Option<usize>,

    /// Generate one option per model call
    #[arg(long)]
    pub incremental: bool,

    /// Category code, e.g. `CREW_ISSUE`; derived from the disruption when omitted
    #[arg(long)]
    pub category: Option<String>,

    /// Provider to use instead of the configured default
    #[arg(long)]
    pub provider: Option<String>,
}
