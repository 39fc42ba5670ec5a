//! `imgdl sheet <path>` – spreadsheet mode.

use anyhow::{Context, Result};
use calamine::{open_workbook_auto, Data, Reader};
use imgdl_core::config::ImgdlConfig;
use imgdl_core::input::records_from_rows;
use imgdl_core::InputRecord;
use std::path::Path;

use super::run_batch;
use crate::cli::BatchArgs;

pub async fn run_sheet(
    cfg: &ImgdlConfig,
    path: &Path,
    sheet: Option<&str>,
    args: &BatchArgs,
) -> Result<()> {
    let records = read_sheet(path, sheet)?;
    tracing::info!(path = %path.display(), rows = records.len(), "spreadsheet loaded");
    run_batch(cfg, records, args).await
}

/// First row is the header; rows without a URL are dropped.
pub fn read_sheet(path: &Path, sheet: Option<&str>) -> Result<Vec<InputRecord>> {
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("open spreadsheet {}", path.display()))?;
    let name = match sheet {
        Some(name) => name.to_string(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .context("spreadsheet has no worksheets")?,
    };
    let range = workbook
        .worksheet_range(&name)
        .with_context(|| format!("read worksheet {name:?}"))?;

    let mut rows = range
        .rows()
        .map(|row| row.iter().map(cell_text).collect::<Vec<String>>());
    let Some(header) = rows.next() else {
        return Ok(Vec::new());
    };
    Ok(records_from_rows(header.as_slice(), rows))
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}
