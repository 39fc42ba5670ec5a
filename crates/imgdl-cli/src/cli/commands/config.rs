//! `imgdl config` – show where configuration and logs live.

use anyhow::Result;
use imgdl_core::config::{self, ImgdlConfig};
use imgdl_core::logging;

pub fn run_config(cfg: &ImgdlConfig) -> Result<()> {
    println!("config file: {}", config::config_path()?.display());
    if let Ok(log) = logging::log_path() {
        println!("log file:    {}", log.display());
    }
    println!("storage:     {}", cfg.storage_root().display());
    println!();
    print!("{}", config::to_toml(cfg)?);
    Ok(())
}
