pub mod config;
pub mod logging;

pub mod batch;
pub mod error;
pub mod fetch;
pub mod input;
pub mod naming;
pub mod storage;
pub mod transform;
pub mod types;

pub use batch::{process_records, process_urls, BatchContext};
pub use types::{BatchProgress, InputRecord, OutcomeRecord, TransformOptions};
