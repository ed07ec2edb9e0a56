//! CLI interface for the job signal ranker

use crate::config::OutputFormat;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

/// Embedding provider name that selects the model-free hashing embedder
pub const HASHING_EMBEDDING: &str = "hashing";

#[derive(Parser)]
#[command(name = "job-signal")]
#[command(about = "Deduplicate scraped job signals and rank them against a candidate profile")]
#[command(long_about = "Deduplicate job postings gathered from search results, then rank \
them for a candidate using embedding similarity, location, recency and skill overlap")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Remove duplicate raw signals or structured jobs
    Dedupe {
        /// Input file (JSON array or JSON Lines)
        #[arg(short, long)]
        input: PathBuf,

        /// Record kind stored in the input file
        #[arg(short, long, value_enum, default_value_t = RecordKind::Raw)]
        kind: RecordKind,

        /// Write the unique records to this JSON file
        #[arg(short, long)]
        save: Option<PathBuf>,
    },

    /// Rank structured jobs for a candidate profile
    Rank {
        /// Structured jobs file (JSON array or JSON Lines)
        #[arg(short, long)]
        jobs: PathBuf,

        /// Candidate profile file (JSON object)
        #[arg(short, long)]
        profile: PathBuf,

        /// Preferred location; repeat for several
        #[arg(short, long = "location")]
        locations: Vec<String>,

        /// Only keep jobs from this source; repeat for several
        #[arg(long = "source")]
        sources: Vec<String>,

        /// Only keep jobs posted within this many days
        #[arg(long)]
        days: Option<u32>,

        /// Keep jobs flagged as invalid
        #[arg(long)]
        include_invalid: bool,

        /// Embedding model id, or "hashing" for model-free embeddings
        #[arg(short, long)]
        embedding: Option<String>,

        /// Number of ranked jobs to show
        #[arg(short, long)]
        top: Option<usize>,

        /// Output format
        #[arg(short, long, value_enum)]
        output: Option<FormatArg>,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Show score breakdowns and job details
        #[arg(short, long)]
        detailed: bool,
    },

    /// Model management commands
    Models {
        #[command(subcommand)]
        action: ModelAction,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RecordKind {
    /// Raw search-result signals
    Raw,
    /// Structured jobs
    Jobs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Console,
    Json,
    #[value(alias = "md")]
    Markdown,
    Csv,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Console => OutputFormat::Console,
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Markdown => OutputFormat::Markdown,
            FormatArg::Csv => OutputFormat::Csv,
        }
    }
}

#[derive(Subcommand)]
pub enum ModelAction {
    /// List available embedding models
    List,

    /// Download an embedding model
    Download {
        /// Model id or Hugging Face repo id
        model: String,
    },

    /// Show model information
    Info {
        /// Model id
        model: String,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file path
    Path,
}

/// Validate file extension
pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err(format!(
            "File has no extension. Allowed: {}",
            allowed_extensions.join(", ")
        )),
    }
}
