//! Runs a prepared list of records through the core pipeline.
//!
//! The pipeline is blocking (curl + worker threads), so it runs on
//! `spawn_blocking` while this task prints progress and listens for Ctrl-C.

use anyhow::{bail, Context, Result};
use imgdl_core::batch::{process_records, BatchContext, CancelToken};
use imgdl_core::config::ImgdlConfig;
use imgdl_core::{BatchProgress, InputRecord};
use std::time::Instant;

use crate::cli::report;
use crate::cli::BatchArgs;

/// Progress events buffered between the workers and the printer.
const PROGRESS_CHANNEL_CAPACITY: usize = 64;

pub async fn run_batch(
    cfg: &ImgdlConfig,
    records: Vec<InputRecord>,
    args: &BatchArgs,
) -> Result<()> {
    if records.is_empty() {
        bail!("no image URLs to process");
    }
    let cfg = args.apply_to(cfg);
    let options = args.transform_options();

    let cancel = CancelToken::new();
    let (progress_tx, mut progress_rx) =
        tokio::sync::mpsc::channel::<BatchProgress>(PROGRESS_CHANNEL_CAPACITY);
    let mut ctx = BatchContext::from_config(&cfg)
        .with_cancel(cancel.clone())
        .with_progress(progress_tx);
    if let Some(limit) = args.deadline() {
        ctx = ctx.with_deadline(Instant::now() + limit);
    }
    tracing::info!(
        items = records.len(),
        root = %cfg.storage_root().display(),
        workers = ctx.workers(),
        "running batch"
    );

    let progress_handle = tokio::spawn(async move {
        while let Some(p) = progress_rx.recv().await {
            report::print_progress(&p);
        }
    });

    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupted; no new items will be started");
            eprintln!("interrupted: waiting for in-flight images to finish");
            cancel.cancel();
        }
    });

    let results = tokio::task::spawn_blocking(move || process_records(&records, &options, &ctx))
        .await
        .context("batch worker failed")?;

    interrupt.abort();
    let _ = progress_handle.await;

    report::print_results(&results, args.json)
}
