//! Flags shared by every batch-running subcommand.

use clap::Args;
use imgdl_core::config::ImgdlConfig;
use imgdl_core::TransformOptions;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Default, Args)]
pub struct BatchArgs {
    /// Convert every image to WebP.
    #[arg(long)]
    pub webp: bool,
    /// Recompress (quality 80); JPEG and PNG only unless combined with --webp.
    #[arg(long)]
    pub optimize: bool,
    /// Prepended to every stored filename.
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    pub prefix: String,
    /// Appended to every stored filename (before the extension).
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    pub suffix: String,
    /// Storage directory (overrides `storage_dir` from config).
    #[arg(long, short = 'o', value_name = "DIR")]
    pub out: Option<PathBuf>,
    /// Items processed concurrently (overrides `workers` from config).
    #[arg(long, short = 'j', value_name = "N")]
    pub jobs: Option<usize>,
    /// Stop starting new items after this many seconds.
    #[arg(long, value_name = "SECS")]
    pub deadline_secs: Option<u64>,
    /// Print results as JSON (`{"results": [...]}`) instead of a table.
    #[arg(long)]
    pub json: bool,
}

impl BatchArgs {
    pub fn transform_options(&self) -> TransformOptions {
        TransformOptions {
            convert_to_webp: self.webp,
            optimize: self.optimize,
            prefix: self.prefix.clone(),
            suffix: self.suffix.clone(),
        }
    }

    /// `cfg` with the command-line overrides applied.
    pub fn apply_to(&self, cfg: &ImgdlConfig) -> ImgdlConfig {
        let mut cfg = cfg.clone();
        if let Some(out) = &self.out {
            cfg.storage_dir = Some(out.clone());
        }
        if let Some(jobs) = self.jobs {
            cfg.workers = jobs.max(1);
        }
        cfg
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_secs.map(Duration::from_secs)
    }
}
