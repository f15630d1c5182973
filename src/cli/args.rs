//! Command line argument parsing for the fathom CLI using clap.

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Fathom - in-memory documentation search with link analysis
#[derive(Parser, Debug, Clone)]
#[command(name = "fathom")]
#[command(about = "In-memory documentation search with link analysis and spelling fallback")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct FathomArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl FathomArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1,
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Index a manifests file and run one query against it
    Search(SearchArgs),

    /// Answer JSON-lines requests from stdin on stdout
    Serve(ServeArgs),
}

/// Options shared by every command that builds an index.
#[derive(Args, Debug, Clone, Default)]
pub struct EngineArgs {
    /// Engine configuration file (JSON)
    #[arg(short, long, value_name = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Reference dictionary for spelling suggestions
    #[arg(short, long, value_name = "DICTIONARY_FILE")]
    pub dictionary: Option<PathBuf>,

    /// Dictionary lines are "word frequency" pairs instead of bare words
    #[arg(long, requires = "dictionary")]
    pub frequency_dictionary: bool,

    /// Term correlations file (JSON array of {from, to, weight, directional})
    #[arg(long, value_name = "CORRELATIONS_FILE")]
    pub correlations: Option<PathBuf>,
}

/// Arguments for a one-shot search
#[derive(Parser, Debug, Clone)]
pub struct SearchArgs {
    /// Manifests file (JSON array of manifests)
    #[arg(value_name = "MANIFESTS_FILE")]
    pub manifests: PathBuf,

    /// Query string
    #[arg(value_name = "QUERY")]
    pub query: String,

    /// Restrict results to a search property (repeatable)
    #[arg(short, long = "property", value_name = "PROPERTY")]
    pub properties: Vec<String>,

    /// Blend link authority into the ranking
    #[arg(short, long)]
    pub link_analysis: bool,

    #[command(flatten)]
    pub engine: EngineArgs,
}

/// Arguments for the request loop
#[derive(Parser, Debug, Clone)]
pub struct ServeArgs {
    /// Manifests file to index before reading requests
    #[arg(short, long, value_name = "MANIFESTS_FILE")]
    pub manifests: Option<PathBuf>,

    #[command(flatten)]
    pub engine: EngineArgs,
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}
