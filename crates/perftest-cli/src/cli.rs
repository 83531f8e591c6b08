//! Command-line interface definitions and parsing

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use perftest_core::DocumentFormat;

#[derive(Parser)]
#[command(name = "perftest-defs")]
#[command(about = "Generate and check messaging performance test definitions")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render the topic persistence definition
    TopicPersistence {
        /// TOML file with scenario parameters
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Number of consuming clients to generate
        #[arg(long)]
        consumers: Option<usize>,
        /// Maximum duration for producers and consumers in milliseconds
        #[arg(long)]
        duration_ms: Option<u64>,
        /// Destination address
        #[arg(long)]
        topic: Option<String>,
        /// Number generated clients from this index
        #[arg(long)]
        first_index: Option<u64>,
        /// Output encoding
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Expand a JSON template into indexed copies
    Replicate {
        /// JSON file holding the template
        #[arg(short, long)]
        template: PathBuf,
        /// Number of copies
        #[arg(short = 'n', long, allow_negative_numbers = true)]
        count: i64,
        /// Token replaced by the copy index
        #[arg(short, long, default_value = perftest_core::DEFAULT_PLACEHOLDER)]
        placeholder: String,
        /// Index of the first copy
        #[arg(long, default_value_t = 0)]
        first_index: u64,
    },
    /// Load a definition and report problems
    Validate {
        /// Definition file (.json or .toml)
        file: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Toml,
}

impl From<OutputFormat> for DocumentFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Json => DocumentFormat::Json,
            OutputFormat::Toml => DocumentFormat::Toml,
        }
    }
}
