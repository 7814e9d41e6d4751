//! Run regions in independent operating system processes.
//!
//! Regions share no state, so each one runs as its own
//! child process and no channel is needed between them. A
//! region that fails is reported, and the others carry on.

use std::process::{Command, ExitStatus};

use anyhow::{anyhow, Context};
use rayon::prelude::*;
use tracing::{error, info};

/// How one region's process ended.
#[derive(Debug)]
pub struct RegionOutcome {
    pub region: String,
    pub result: anyhow::Result<()>,
}

impl RegionOutcome {
    pub fn succeeded(&self) -> bool {
        self.result.is_ok()
    }
}

/// Run `command(region)` for every region, with at most
/// `jobs` processes alive at once. Outcomes are returned in
/// the order of `regions`.
pub fn run_regions<F>(regions: &[String], jobs: usize, command: F) -> anyhow::Result<Vec<RegionOutcome>>
where
    F: Fn(&str) -> Command + Sync + Send,
{
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs.max(1))
        .build()
        .context("building process pool")?;

    Ok(pool.install(|| {
        regions
            .par_iter()
            .map(|region| {
                let result = run_region(region, command(region));
                match &result {
                    Ok(()) => info!(region = %region, "region finished"),
                    Err(e) => error!(region = %region, "region failed: {:#}", e),
                }
                RegionOutcome {
                    region: region.clone(),
                    result,
                }
            })
            .collect()
    }))
}

fn run_region(region: &str, mut command: Command) -> anyhow::Result<()> {
    info!(region, ?command, "starting region");
    let status = command
        .status()
        .with_context(|| format!("launching worker for {}", region))?;
    check_status(status)
}

fn check_status(status: ExitStatus) -> anyhow::Result<()> {
    if status.success() {
        Ok(())
    } else {
        match status.code() {
            Some(code) => Err(anyhow!("worker exited with status {}", code)),
            None => Err(anyhow!("worker terminated by signal")),
        }
    }
}
