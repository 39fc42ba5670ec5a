//! Batch runner.
//!
//! Runs every input record through the item processor on a fixed-size pool of
//! worker threads. Workers pull `(index)` entries from a shared queue and send
//! `(index, outcome)` back; outcomes land in a pre-sized slot vector, so the
//! result order always matches the input order whatever the completion order.
//! `workers = 1` reproduces strictly sequential processing.

mod cancel;
mod item;

use crate::config::ImgdlConfig;
use crate::fetch::{CurlFetcher, Fetcher};
use crate::naming::FallbackNaming;
use crate::storage::ImageStore;
use crate::types::{BatchProgress, InputRecord, OutcomeRecord, TransformOptions};
use std::collections::VecDeque;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{mpsc, Arc, Mutex};
use std::time::Instant;
use tokio::sync::mpsc::error::TrySendError;

pub use cancel::CancelToken;
pub use item::process_item;

/// Error message of items that were never started because the batch was
/// cancelled or ran past its deadline.
pub const CANCELLED_MESSAGE: &str = "batch cancelled before item started";

/// Default worker pool size.
pub const DEFAULT_WORKERS: usize = 4;

/// Everything shared (read-only) by the workers of one batch.
#[derive(Clone)]
pub struct BatchContext {
    fetcher: Arc<dyn Fetcher>,
    store: ImageStore,
    fallback_naming: FallbackNaming,
    workers: usize,
    cancel: CancelToken,
    deadline: Option<Instant>,
    progress_tx: Option<tokio::sync::mpsc::Sender<BatchProgress>>,
}

impl BatchContext {
    pub fn new(fetcher: Arc<dyn Fetcher>, store: ImageStore) -> Self {
        Self {
            fetcher,
            store,
            fallback_naming: FallbackNaming::default(),
            workers: DEFAULT_WORKERS,
            cancel: CancelToken::new(),
            deadline: None,
            progress_tx: None,
        }
    }

    /// Curl fetcher, storage root, pool size and naming rules from config.
    pub fn from_config(cfg: &ImgdlConfig) -> Self {
        let fetcher = Arc::new(CurlFetcher::new(cfg.fetch_settings()));
        let store = ImageStore::new(cfg.storage_root()).with_collision(cfg.collision);
        Self::new(fetcher, store)
            .with_workers(cfg.workers)
            .with_fallback_naming(cfg.fallback_naming)
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn with_fallback_naming(mut self, fallback: FallbackNaming) -> Self {
        self.fallback_naming = fallback;
        self
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// No new item is started at or after `deadline`.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Receives one `BatchProgress` per settled item (dropped when the channel is full).
    pub fn with_progress(mut self, tx: tokio::sync::mpsc::Sender<BatchProgress>) -> Self {
        self.progress_tx = Some(tx);
        self
    }

    pub fn fetcher(&self) -> &dyn Fetcher {
        self.fetcher.as_ref()
    }

    pub fn store(&self) -> &ImageStore {
        &self.store
    }

    pub fn fallback_naming(&self) -> FallbackNaming {
        self.fallback_naming
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    fn should_stop(&self) -> bool {
        self.cancel.is_cancelled() || self.deadline.is_some_and(|d| Instant::now() >= d)
    }
}

/// Direct URL-list mode: one record per URL, no titles.
pub fn process_urls(
    urls: &[String],
    options: &TransformOptions,
    ctx: &BatchContext,
) -> Vec<OutcomeRecord> {
    let records: Vec<InputRecord> = urls.iter().map(InputRecord::new).collect();
    process_records(&records, options, ctx)
}

/// Processes `records` and returns exactly one outcome per record, in input
/// order. Never fails as a whole; an empty input touches no storage.
pub fn process_records(
    records: &[InputRecord],
    options: &TransformOptions,
    ctx: &BatchContext,
) -> Vec<OutcomeRecord> {
    let total = records.len();
    if total == 0 {
        return Vec::new();
    }
    let started = Instant::now();
    let num_workers = ctx.workers.min(total);
    tracing::info!(total, workers = num_workers, ?options, "batch started");

    let work: Mutex<VecDeque<usize>> = Mutex::new((0..total).collect());
    let mut slots: Vec<Option<OutcomeRecord>> = vec![None; total];
    let mut progress_dropped = 0usize;

    std::thread::scope(|scope| {
        let (tx, rx) = mpsc::channel::<(usize, OutcomeRecord)>();
        for _ in 0..num_workers {
            let tx = tx.clone();
            let work = &work;
            scope.spawn(move || loop {
                if ctx.should_stop() {
                    break;
                }
                let next = match work.lock() {
                    Ok(mut q) => q.pop_front(),
                    Err(poisoned) => poisoned.into_inner().pop_front(),
                };
                let Some(index) = next else {
                    break;
                };
                let record = &records[index];
                let outcome = catch_unwind(AssertUnwindSafe(|| {
                    process_item(index, record, options, ctx)
                }))
                .unwrap_or_else(|_| {
                    tracing::error!(index, url = %record.url, "item processing panicked");
                    OutcomeRecord::failure(&record.url, "item processing panicked")
                });
                if tx.send((index, outcome)).is_err() {
                    break;
                }
            });
        }
        drop(tx);

        let mut settled = 0usize;
        for (index, outcome) in rx {
            settled += 1;
            if let Some(progress) = &ctx.progress_tx {
                let event = BatchProgress {
                    index,
                    settled,
                    total,
                    outcome: outcome.clone(),
                };
                // Progress never blocks the batch; a slow consumer loses events.
                if let Err(TrySendError::Full(_)) = progress.try_send(event) {
                    progress_dropped += 1;
                    tracing::debug!(index, settled, "progress channel full, event dropped");
                }
            }
            slots[index] = Some(outcome);
        }
    });

    let mut cancelled = 0usize;
    let results: Vec<OutcomeRecord> = slots
        .into_iter()
        .zip(records)
        .map(|(slot, record)| {
            slot.unwrap_or_else(|| {
                cancelled += 1;
                OutcomeRecord::failure(&record.url, CANCELLED_MESSAGE)
            })
        })
        .collect();

    let succeeded = results.iter().filter(|o| o.is_success()).count();
    tracing::info!(
        total,
        succeeded,
        failed = total - succeeded,
        cancelled,
        progress_dropped,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "batch finished"
    );
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use std::collections::HashMap;
    use std::time::Duration;

    /// Serves canned bodies; unknown URLs are HTTP 404. Optional per-URL delay.
    struct CannedFetcher {
        bodies: HashMap<String, Vec<u8>>,
        delays: HashMap<String, Duration>,
    }

    impl CannedFetcher {
        fn new(entries: &[(&str, &str)]) -> Self {
            Self {
                bodies: entries
                    .iter()
                    .map(|(u, b)| (u.to_string(), b.as_bytes().to_vec()))
                    .collect(),
                delays: HashMap::new(),
            }
        }

        fn delay(mut self, url: &str, d: Duration) -> Self {
            self.delays.insert(url.to_string(), d);
            self
        }
    }

    impl Fetcher for CannedFetcher {
        fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
            if url.contains("panic") {
                panic!("fetcher blew up");
            }
            if let Some(d) = self.delays.get(url) {
                std::thread::sleep(*d);
            }
            self.bodies
                .get(url)
                .cloned()
                .ok_or(FetchError::Http { status: 404 })
        }
    }

    fn ctx(fetcher: CannedFetcher, root: &std::path::Path) -> BatchContext {
        BatchContext::new(Arc::new(fetcher), ImageStore::new(root))
    }

    fn urls(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_input_yields_empty_output_and_no_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("downloads");
        let ctx = ctx(CannedFetcher::new(&[]), &root);
        let out = process_urls(&[], &TransformOptions::default(), &ctx);
        assert!(out.is_empty());
        assert!(!root.exists());
    }

    #[test]
    fn failure_in_the_middle_is_isolated() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = CannedFetcher::new(&[("https://x/a.gif", "A"), ("https://x/c.gif", "C")]);
        let ctx = ctx(fetcher, dir.path()).with_workers(1);
        let out = process_urls(
            &urls(&["https://x/a.gif", "https://x/missing.gif", "https://x/c.gif"]),
            &TransformOptions::default(),
            &ctx,
        );
        assert_eq!(out.len(), 3);
        assert!(out[0].is_success());
        assert_eq!(out[1], OutcomeRecord::failure("https://x/missing.gif", "fetch: HTTP 404"));
        assert!(out[2].is_success());
        for o in &out {
            assert!(o.file().is_some() != o.error().is_some());
        }
        let stored = std::fs::read(dir.path().join(out[2].file().unwrap())).unwrap();
        assert_eq!(stored, b"C");
    }

    #[test]
    fn order_is_preserved_under_concurrency() {
        let dir = tempfile::tempdir().unwrap();
        let entries: Vec<(String, String)> = (0..12)
            .map(|i| (format!("https://x/{i}.gif"), i.to_string()))
            .collect();
        let refs: Vec<(&str, &str)> = entries
            .iter()
            .map(|(u, b)| (u.as_str(), b.as_str()))
            .collect();
        let fetcher = CannedFetcher::new(&refs)
            .delay("https://x/0.gif", Duration::from_millis(150))
            .delay("https://x/1.gif", Duration::from_millis(80));
        let ctx = ctx(fetcher, dir.path()).with_workers(4);
        let records: Vec<InputRecord> = (0..12)
            .map(|i| InputRecord::with_title(format!("https://x/{i}.gif"), format!("Item {i}")))
            .collect();
        let out = process_records(&records, &TransformOptions::default(), &ctx);
        assert_eq!(out.len(), 12);
        for (i, o) in out.iter().enumerate() {
            assert_eq!(o.url(), format!("https://x/{i}.gif"));
            assert_eq!(o.file(), Some(format!("item-{i}.gif").as_str()));
        }
    }

    #[test]
    fn panicking_item_becomes_failure() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = CannedFetcher::new(&[("https://x/ok.gif", "ok")]);
        let ctx = ctx(fetcher, dir.path()).with_workers(1);
        let out = process_urls(
            &urls(&["https://x/panic.gif", "https://x/ok.gif"]),
            &TransformOptions::default(),
            &ctx,
        );
        assert_eq!(out[0].error(), Some("item processing panicked"));
        assert!(out[1].is_success());
    }

    #[test]
    fn cancelled_batch_reports_unstarted_items() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = CannedFetcher::new(&[("https://x/a.gif", "A")]);
        let token = CancelToken::new();
        token.cancel();
        let ctx = ctx(fetcher, dir.path()).with_cancel(token);
        let out = process_urls(
            &urls(&["https://x/a.gif", "https://x/b.gif"]),
            &TransformOptions::default(),
            &ctx,
        );
        assert_eq!(
            out,
            vec![
                OutcomeRecord::failure("https://x/a.gif", CANCELLED_MESSAGE),
                OutcomeRecord::failure("https://x/b.gif", CANCELLED_MESSAGE),
            ]
        );
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn deadline_lets_in_flight_item_settle() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = CannedFetcher::new(&[("https://x/a.gif", "A"), ("https://x/b.gif", "B")])
            .delay("https://x/a.gif", Duration::from_millis(200));
        let ctx = ctx(fetcher, dir.path())
            .with_workers(1)
            .with_deadline(Instant::now() + Duration::from_millis(50));
        let out = process_urls(
            &urls(&["https://x/a.gif", "https://x/b.gif"]),
            &TransformOptions::default(),
            &ctx,
        );
        assert!(out[0].is_success());
        assert_eq!(out[1].error(), Some(CANCELLED_MESSAGE));
    }

    #[test]
    fn full_progress_channel_does_not_stall_batch() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = CannedFetcher::new(&[
            ("https://x/a.gif", "A"),
            ("https://x/b.gif", "B"),
            ("https://x/c.gif", "C"),
        ]);
        let (tx, mut rx) = tokio::sync::mpsc::channel(1);
        let ctx = ctx(fetcher, dir.path()).with_workers(1).with_progress(tx);
        let out = process_urls(
            &urls(&["https://x/a.gif", "https://x/b.gif", "https://x/c.gif"]),
            &TransformOptions::default(),
            &ctx,
        );
        drop(ctx);
        assert_eq!(out.len(), 3);
        assert!(out.iter().all(|o| o.is_success()));
        let first = rx.try_recv().unwrap();
        assert_eq!(first.settled, 1);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn progress_reports_every_item() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = CannedFetcher::new(&[("https://x/a.gif", "A")]);
        let (tx, mut rx) = tokio::sync::mpsc::channel(8);
        let ctx = ctx(fetcher, dir.path()).with_workers(2).with_progress(tx);
        let out = process_urls(
            &urls(&["https://x/a.gif", "https://x/b.gif"]),
            &TransformOptions::default(),
            &ctx,
        );
        drop(ctx);
        let mut seen = Vec::new();
        while let Ok(p) = rx.try_recv() {
            assert_eq!(p.total, 2);
            assert_eq!(p.outcome, out[p.index]);
            seen.push(p.settled);
        }
        seen.sort();
        assert_eq!(seen, vec![1, 2]);
    }
}
