//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod check;
mod clean;
mod extract;
mod init;
mod models;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Settings;
use crate::pipeline::PipelineOptions;

#[derive(Parser)]
#[command(name = "sift")]
#[command(about = "Submittal product extraction pipeline")]
#[command(version)]
pub struct Cli {
    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Extract product schedules from submittal PDFs
    Extract {
        /// PDF files to process
        pdfs: Vec<PathBuf>,
        /// Output directory for reports (overrides config)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
        /// Page range (e.g., "1", "1-5", "1,3,5-10"). Default: all pages
        #[arg(short, long)]
        pages: Option<String>,
        /// Number of concurrent vision requests (default: 2)
        #[arg(short, long, default_value = "2")]
        workers: usize,
        /// Limit pages sent to the model per document (0 = unlimited)
        #[arg(short, long, default_value = "0")]
        limit: usize,
        /// Render resolution (overrides config)
        #[arg(long)]
        dpi: Option<u32>,
        /// Header crop percent (overrides config)
        #[arg(long)]
        crop_percent: Option<u32>,
        /// Vision model name (overrides environment)
        #[arg(long)]
        model: Option<String>,
        /// Vision API endpoint (overrides environment)
        #[arg(long)]
        endpoint: Option<String>,
        /// Manufacturer rules JSON file (overrides config)
        #[arg(short, long)]
        rules: Option<PathBuf>,
        /// Skip the report cleaning pass
        #[arg(long)]
        no_clean: bool,
        /// Run only the text pre-filter and show page dispositions
        #[arg(long)]
        dry_run: bool,
    },

    /// Re-run the cleaning pass on existing report CSVs
    Clean {
        /// Report files to clean in place
        files: Vec<PathBuf>,
    },

    /// Check that required tools and the vision backend are available
    Check,

    /// Show vision model configuration and available models
    Models,

    /// Write a skeleton config and example rules file
    Init {
        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },
}

/// Run the CLI.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Extract {
            pdfs,
            output_dir,
            pages,
            workers,
            limit,
            dpi,
            crop_percent,
            model,
            endpoint,
            rules,
            no_clean,
            dry_run,
        } => {
            let pipeline = PipelineOptions {
                output_dir: output_dir
                    .unwrap_or_else(|| settings.output.directory.clone()),
                pages,
                workers,
                limit,
                dry_run,
                progress: !dry_run,
            };
            let overrides = extract::ExtractOverrides {
                dpi,
                crop_percent,
                model,
                endpoint,
                rules,
                no_clean,
            };
            extract::cmd_extract(&settings, &pdfs, pipeline, overrides).await
        }
        Commands::Clean { files } => clean::cmd_clean(&files),
        Commands::Check => check::cmd_check(&settings).await,
        Commands::Models => models::cmd_models(&settings).await,
        Commands::Init { force } => init::cmd_init(force),
    }
}
