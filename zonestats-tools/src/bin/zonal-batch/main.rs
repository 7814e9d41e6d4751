use std::path::PathBuf;
use std::process::Command;

use clap::*;

use anyhow::{bail, Context};
use tracing::info;
use zonestats_tools::cli::init_logging;
use zonestats_tools::pool::run_regions;
use zonestats_tools::{*, Result};

// Main function
zonestats_tools::sync_main!(run());

fn run() -> Result<()> {
    // Parse command line
    let args = parse_cmd_line();
    init_logging(args.verbosity);

    let worker = match &args.worker {
        Some(path) => path.clone(),
        None => std::env::current_exe()
            .context("locating the zonal-stats executable")?
            .with_file_name(format!("zonal-stats{}", std::env::consts::EXE_SUFFIX)),
    };
    info!(regions = args.regions.len(), jobs = args.jobs, worker = %worker.display(), "starting batch");

    let outcomes = run_regions(&args.regions, args.jobs, |region| {
        let mut cmd = Command::new(&worker);
        cmd.arg(region).arg("--no-progress").args(&args.passthrough);
        cmd
    })?;

    let failed: Vec<_> = outcomes.iter().filter(|o| !o.succeeded()).collect();
    for outcome in &failed {
        if let Err(e) = &outcome.result {
            eprintln!("{}: {:#}", outcome.region, e);
        }
    }
    if !failed.is_empty() {
        bail!("{} of {} regions failed", failed.len(), outcomes.len());
    }
    Ok(())
}

struct Args {
    regions: Vec<String>,
    jobs: usize,
    worker: Option<PathBuf>,
    passthrough: Vec<String>,
    verbosity: u64,
}

fn parse_cmd_line() -> Args {
    let matches = args_parser!("zonal-batch")
        .about("Run zonal-stats for many regions, one process per region.")
        .arg(
            arg!("regions")
                .required(true)
                .multiple(true)
                .help("ISO codes of the regions"),
        )
        .arg(
            opt!("jobs")
                .short("j")
                .help("Regions processed at once (default: number of CPUs)"),
        )
        .arg(opt!("worker").help("Path of the zonal-stats executable"))
        .arg(opt!("data dir").short("d").help("Passed on to zonal-stats"))
        .arg(opt!("years").short("y").help("Passed on to zonal-stats"))
        .arg(opt!("naming").help("Passed on to zonal-stats"))
        .arg(opt!("block size").short("b").help("Passed on to zonal-stats"))
        .arg(opt!("threads").help("Passed on to zonal-stats"))
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .multiple(true)
                .help("Increase logging verbosity"),
        )
        .get_matches();

    let regions = values_t!(matches, "regions", String).unwrap_or_else(|e| e.exit());
    let jobs = value_t!(matches, "jobs", usize).unwrap_or_else(|_| rayon::current_num_threads());
    let verbosity = matches.occurrences_of("verbose");

    let mut passthrough = vec![];
    for (name, flag) in &[
        ("data dir", "--data-dir"),
        ("years", "--years"),
        ("naming", "--naming"),
        ("block size", "--block-size"),
        ("threads", "--threads"),
    ] {
        if let Some(value) = matches.value_of(name) {
            passthrough.push(flag.to_string());
            passthrough.push(value.to_string());
        }
    }
    for _ in 0..verbosity {
        passthrough.push("-v".into());
    }

    Args {
        regions,
        jobs,
        worker: value_t!(matches, "worker", PathBuf).ok(),
        passthrough,
        verbosity,
    }
}
