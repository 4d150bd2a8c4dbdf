//! Command-line entry point: rank the catalogue against one lost-item report.
//!
//! ```text
//! echo '{"name":"AirPods","category":"Electronics","date_lost":"2026-02-10"}' \
//!     | lostfound config.yaml
//! ```
//!
//! Reads a JSON report on stdin, stores it, and prints the report together
//! with its matches as JSON on stdout. Logs go to stderr; set `RUST_LOG` to
//! adjust verbosity.

use std::io::Read;

use anyhow::Context;
use lostfound::{report_lost_item, LostFoundConfig, LostReportInput};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .json()
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => LostFoundConfig::load_from_file(&path)
            .with_context(|| format!("loading config from {path}"))?,
        None => LostFoundConfig::default(),
    };

    let output = run(&config, std::io::stdin().lock())?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Parse one report from `reader`, store it and rank the catalogue.
fn run(config: &LostFoundConfig, mut reader: impl Read) -> anyhow::Result<serde_json::Value> {
    let store = config.open_store()?;
    let matcher = config.build_matcher()?;

    let mut raw = String::new();
    reader
        .read_to_string(&mut raw)
        .context("reading report from stdin")?;
    let input: LostReportInput =
        serde_json::from_str(&raw).context("parsing lost report JSON")?;

    let (report, matches) = report_lost_item(&store, &matcher, input)?;
    store.flush()?;

    Ok(serde_json::json!({
        "report": report,
        "matches": matches,
    }))
}
