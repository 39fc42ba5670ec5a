//! CLI for the imgdl batch image downloader.

mod args;
mod commands;
mod report;

use anyhow::Result;
use clap::{Parser, Subcommand};
use imgdl_core::config;
use std::path::PathBuf;

pub use args::BatchArgs;
use commands::{run_config, run_sheet, run_urls};

/// Top-level CLI for imgdl.
#[derive(Debug, Parser)]
#[command(name = "imgdl")]
#[command(about = "imgdl: fetch, convert and rename images in batches", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download images from a list of URLs.
    Urls {
        /// Direct HTTP/HTTPS image URLs.
        urls: Vec<String>,
        /// File with one URL per line ("-" reads stdin).
        #[arg(long, short = 'f', value_name = "PATH")]
        file: Option<PathBuf>,
        #[command(flatten)]
        batch: BatchArgs,
    },

    /// Download images listed in a spreadsheet ("Title" and "Original Image URL" columns).
    Sheet {
        /// Path to an .xlsx, .xls or .ods file.
        path: PathBuf,
        /// Worksheet to read (default: the first one).
        #[arg(long, value_name = "NAME")]
        sheet: Option<String>,
        #[command(flatten)]
        batch: BatchArgs,
    },

    /// Show the config file location and the effective configuration.
    Config,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Urls { urls, file, batch } => {
                run_urls(&cfg, urls, file.as_deref(), &batch).await?
            }
            CliCommand::Sheet { path, sheet, batch } => {
                run_sheet(&cfg, &path, sheet.as_deref(), &batch).await?
            }
            CliCommand::Config => run_config(&cfg)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
