//! Printing batch results.

use anyhow::Result;
use imgdl_core::{BatchProgress, OutcomeRecord};

/// One line per settled item, on stderr so stdout stays machine-readable.
pub fn print_progress(p: &BatchProgress) {
    let status = if p.outcome.is_success() { "ok" } else { "error" };
    eprintln!("[{}/{}] {:<5} {}", p.settled, p.total, status, p.outcome.url());
}

pub fn print_results(results: &[OutcomeRecord], json: bool) -> Result<()> {
    if json {
        let body = serde_json::json!({ "results": results });
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    println!("{:<8} {:<40} {}", "STATUS", "FILE / ERROR", "URL");
    for r in results {
        let (status, detail) = match r {
            OutcomeRecord::Success { file, .. } => ("success", file.as_str()),
            OutcomeRecord::Failure { error, .. } => ("error", error.as_str()),
        };
        println!("{:<8} {:<40} {}", status, detail, r.url());
    }
    let ok = results.iter().filter(|r| r.is_success()).count();
    println!("{} of {} image(s) stored", ok, results.len());
    Ok(())
}
