//! Wave completion gate evaluation

use anyhow::Result;
use colored::Colorize;
use std::path::Path;
use std::time::Duration;

use crate::gate::{evaluate_wave, GateConfig};
use crate::store::DirStore;

pub fn execute(
    store_dir: &Path,
    wave: u32,
    skip_verification: bool,
    timeout_seconds: Option<u64>,
) -> Result<i32> {
    let mut config = GateConfig::default().skip_verification(skip_verification);
    if let Some(seconds) = timeout_seconds {
        let timeout: Duration = crate::gate::parse_timeout(seconds)?;
        config = config.verification_timeout(timeout);
    }

    let store = DirStore::new(store_dir);
    let report = evaluate_wave(&store, wave, &config)?;
    super::emit(&report)?;

    if report.passed {
        eprintln!(
            "{} Wave {wave} complete ({} checks passed, {} warnings)",
            "✓".green().bold(),
            report.summary.pass,
            report.summary.warn
        );
        Ok(0)
    } else {
        match &report.message {
            Some(message) => eprintln!("{} {message}", "✗".red().bold()),
            None => eprintln!(
                "{} Wave {wave} gate failed ({} failures, {} warnings)",
                "✗".red().bold(),
                report.summary.fail,
                report.summary.warn
            ),
        }
        Ok(1)
    }
}
