//! Print the sales summary of `data.csv` as JSON.
//!
//! ```bash
//! cargo run --release
//! ```
//!
//! Diagnostics go to stderr; set `RUST_LOG` to change verbosity (default: info).

use sales_summary::SalesSummarizer;
use std::process::ExitCode;

fn run() -> sales_summary::Result<()> {
    let summarizer = SalesSummarizer::builder().build()?;
    let summary = summarizer.summarize()?;
    println!("{}", summary.to_json_pretty()?);
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
