use std::path::PathBuf;

use clap::*;

use anyhow::Context;
use tracing::info;
use zonestats::engine::{GdalSource, RegionConfig, ZonalStatsEngine};
use zonestats::naming::DEFAULT_YEARS;
use zonestats::geometry::RasterDims;
use zonestats_tools::cli::args::{parse_block_size, parse_years};
use zonestats_tools::{cli::init_logging, utils::*, *, Result, Tracker};

// Main function
zonestats_tools::sync_main!(run());

fn run() -> Result<()> {
    // Parse command line
    let args = parse_cmd_line();
    init_logging(args.verbosity);

    let mut config = RegionConfig::new(args.region.as_str());
    config.data_root = args.data_dir;
    config.years = args.years;
    config.naming = load_naming(args.naming.as_deref())?;
    config.block_size = args.block_size;
    config.threads = args.threads;

    let engine = ZonalStatsEngine::new(config, GdalSource)
        .with_context(|| format!("configuring region {}", args.region))?;
    info!(region = engine.layout().iso(), years = ?engine.years(), "processing region");

    let tracker = Tracker::new(args.progress);
    let output = engine
        .run(&tracker)
        .with_context(|| format!("processing region {}", engine.layout().iso()))?;
    drop(tracker);

    print_json(&RegionSummary::new(engine.layout().iso(), &output))?;
    Ok(())
}

struct Args {
    region: String,
    data_dir: PathBuf,
    years: Vec<u16>,
    naming: Option<PathBuf>,
    block_size: Option<RasterDims>,
    threads: Option<usize>,
    progress: bool,
    verbosity: u64,
}

fn parse_cmd_line() -> Args {
    use clap::Error;
    use clap::ErrorKind::InvalidValue;
    let matches = args_parser!("zonal-stats")
        .about("Per-zone urban population of one region, for every configured year.")
        .arg(
            arg!("region")
                .required(true)
                .help("ISO code of the region (e.g. NPL)"),
        )
        .arg(
            opt!("data dir")
                .short("d")
                .help("Root of the per-region input directories (default: datain)"),
        )
        .arg(opt!("years").short("y").help("Comma separated years (default: 2000,2012,2014)"))
        .arg(opt!("naming").help("JSON table of year to urban-mask filename template"))
        .arg(
            opt!("block size")
                .short("b")
                .help("Tile size as WxH or N (default: native block of the population raster)"),
        )
        .arg(
            opt!("threads")
                .short("j")
                .help("Worker threads for the sweep (default: sequential)"),
        )
        .arg(flag!("no progress").help("Do not show a progress bar"))
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .multiple(true)
                .help("Increase logging verbosity"),
        )
        .get_matches();

    let region = value_t!(matches, "region", String).unwrap_or_else(|e| e.exit());
    let data_dir = value_t!(matches, "data dir", PathBuf).unwrap_or_else(|_| "datain".into());

    let years = match matches.value_of("years") {
        Some(s) => parse_years(s)
            .unwrap_or_else(|e| Error::with_description(&format!("{:#}", e), InvalidValue).exit()),
        None => DEFAULT_YEARS.to_vec(),
    };
    let block_size = matches.value_of("block size").map(|s| {
        parse_block_size(s)
            .unwrap_or_else(|e| Error::with_description(&format!("{:#}", e), InvalidValue).exit())
    });
    let threads = if matches.is_present("threads") {
        Some(value_t!(matches, "threads", usize).unwrap_or_else(|e| e.exit()))
    } else {
        None
    };

    Args {
        region,
        data_dir,
        years,
        naming: value_t!(matches, "naming", PathBuf).ok(),
        block_size,
        threads,
        progress: !matches.is_present("no progress"),
        verbosity: matches.occurrences_of("verbose"),
    }
}
