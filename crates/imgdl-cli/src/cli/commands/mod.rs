//! CLI command handlers. Each command is in its own file.

mod batch;
mod config;
mod sheet;
mod urls;

pub use batch::run_batch;
pub use config::run_config;
pub use sheet::run_sheet;
pub use urls::run_urls;
