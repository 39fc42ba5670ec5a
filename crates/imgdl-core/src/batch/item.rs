//! One record through Fetch → Transform → Name → Write.
//!
//! The first failing stage short-circuits to a `Failure`; later stages never
//! run, so a failed item performs no storage write.

use crate::error::ItemError;
use crate::naming::{self, NamingPolicy};
use crate::transform;
use crate::types::{InputRecord, OutcomeRecord, TransformOptions};

use super::BatchContext;

/// Processes one record. Never fails; every error becomes a `Failure`.
pub fn process_item(
    index: usize,
    record: &InputRecord,
    options: &TransformOptions,
    ctx: &BatchContext,
) -> OutcomeRecord {
    let span = tracing::info_span!("item", index, url = %record.url);
    let _enter = span.enter();

    match run_stages(record, options, ctx) {
        Ok(file) => {
            tracing::info!(file = %file, "stored");
            OutcomeRecord::success(&record.url, file)
        }
        Err(e) => {
            tracing::warn!("item failed: {}", e);
            OutcomeRecord::failure(&record.url, e.to_string())
        }
    }
}

fn run_stages(
    record: &InputRecord,
    options: &TransformOptions,
    ctx: &BatchContext,
) -> Result<String, ItemError> {
    let raw = ctx.fetcher().fetch(&record.url)?;

    let source_extension = naming::resolve_extension(&record.url, None);
    let out = transform::transform(
        raw,
        options.convert_to_webp,
        options.optimize,
        &source_extension,
    )?;

    let name = NamingPolicy::new(&options.prefix, &options.suffix)
        .with_fallback(ctx.fallback_naming())
        .file_name(
            record.title_override.as_deref(),
            &record.url,
            Some(out.extension.as_str()),
            &out.bytes,
        );
    tracing::debug!(name = %name.file_name(), len = out.bytes.len(), "named");

    Ok(ctx.store().store(&name, &out.bytes)?)
}
