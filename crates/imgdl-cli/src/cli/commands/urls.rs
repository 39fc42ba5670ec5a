//! `imgdl urls` – direct URL-list mode.

use anyhow::{Context, Result};
use imgdl_core::config::ImgdlConfig;
use imgdl_core::input::records_from_url_list;
use imgdl_core::InputRecord;
use std::io::Read;
use std::path::Path;

use super::run_batch;
use crate::cli::BatchArgs;

pub async fn run_urls(
    cfg: &ImgdlConfig,
    urls: Vec<String>,
    file: Option<&Path>,
    args: &BatchArgs,
) -> Result<()> {
    let records = collect_url_records(urls, file)?;
    run_batch(cfg, records, args).await
}

/// Positional URLs first, then the lines of `file` (or stdin for "-").
pub fn collect_url_records(urls: Vec<String>, file: Option<&Path>) -> Result<Vec<InputRecord>> {
    let mut text = urls.join("\n");
    if let Some(path) = file {
        let listed = if path == Path::new("-") {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("read URL list from stdin")?;
            buf
        } else {
            std::fs::read_to_string(path)
                .with_context(|| format!("read URL list {}", path.display()))?
        };
        text.push('\n');
        text.push_str(&listed);
    }
    Ok(records_from_url_list(&text))
}
