//! Building `InputRecord`s from the two input shapes: a newline-separated URL
//! list and tabular rows with a header.

use crate::types::InputRecord;

/// Header of the title column (matched case-insensitively, trimmed).
pub const TITLE_COLUMN: &str = "title";
/// Header of the URL column (matched case-insensitively, trimmed).
pub const URL_COLUMN: &str = "original image url";

/// One record per non-blank line; surrounding whitespace is trimmed.
pub fn records_from_url_list(text: &str) -> Vec<InputRecord> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(InputRecord::new)
        .collect()
}

/// Positions of the recognised columns in a header row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableColumns {
    pub title: Option<usize>,
    pub url: Option<usize>,
}

impl TableColumns {
    /// First header cell matching each column name wins.
    pub fn locate<S: AsRef<str>>(header: &[S]) -> Self {
        let find = |name: &str| {
            header
                .iter()
                .position(|h| h.as_ref().trim().eq_ignore_ascii_case(name))
        };
        Self {
            title: find(TITLE_COLUMN),
            url: find(URL_COLUMN),
        }
    }
}

/// Converts data rows into records. Rows without a URL value are dropped;
/// a blank title cell means no title override. Without a URL column nothing
/// is produced.
pub fn records_from_rows<S, R>(header: &[S], rows: impl IntoIterator<Item = R>) -> Vec<InputRecord>
where
    S: AsRef<str>,
    R: AsRef<[S]>,
{
    let columns = TableColumns::locate(header);
    let Some(url_col) = columns.url else {
        tracing::warn!("no \"{}\" column in header", URL_COLUMN);
        return Vec::new();
    };

    let cell = |row: &[S], col: usize| {
        row.get(col)
            .map(|c| c.as_ref().trim())
            .filter(|c| !c.is_empty())
            .map(str::to_string)
    };

    let mut dropped = 0usize;
    let records: Vec<InputRecord> = rows
        .into_iter()
        .filter_map(|row| {
            let row = row.as_ref();
            let Some(url) = cell(row, url_col) else {
                dropped += 1;
                return None;
            };
            Some(InputRecord {
                url,
                title_override: columns.title.and_then(|c| cell(row, c)),
            })
        })
        .collect();
    if dropped > 0 {
        tracing::debug!(dropped, "rows without a URL skipped");
    }
    records
}
