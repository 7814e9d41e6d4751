pub use clap::{App, Arg};
pub use inflector::Inflector;

use anyhow::{anyhow, bail, Context};
use zonestats::geometry::RasterDims;

#[macro_export]
macro_rules! args_parser {
    ($name:expr) => {{
        $crate::cli::args::App::new($name)
            .version(clap::crate_version!())
            .author(clap::crate_authors!())
    }};
}

#[macro_export]
macro_rules! arg {
    ($name:expr) => {{
        use inflector::Inflector;
        $crate::cli::args::Arg::with_name($name).value_name(&$name.to_screaming_snake_case())
    }};
}

#[macro_export]
macro_rules! opt {
    ($name:expr) => {{
        use inflector::Inflector;
        $crate::cli::args::Arg::with_name($name)
            .long(&$name.to_kebab_case())
            .value_name(&$name.to_screaming_snake_case())
    }};
}

/// A switch without a value.
#[macro_export]
macro_rules! flag {
    ($name:expr) => {{
        use inflector::Inflector;
        $crate::cli::args::Arg::with_name($name).long(&$name.to_kebab_case())
    }};
}

/// Parse a comma separated list of years, e.g. `2000,2012`.
pub fn parse_years(s: &str) -> anyhow::Result<Vec<u16>> {
    let years = s
        .split(',')
        .map(str::trim)
        .filter(|y| !y.is_empty())
        .map(|y| y.parse().with_context(|| format!("invalid year {:?}", y)))
        .collect::<anyhow::Result<Vec<u16>>>()?;
    if years.is_empty() {
        bail!("no years given");
    }
    Ok(years)
}

/// Parse a tile size `WxH`, or a single `N` for a square.
pub fn parse_block_size(s: &str) -> anyhow::Result<RasterDims> {
    let parse = |v: &str| -> anyhow::Result<usize> {
        v.trim()
            .parse()
            .with_context(|| format!("invalid tile size {:?}", s))
    };
    let mut parts = s.splitn(2, |c| c == 'x' || c == 'X');
    let width = parse(parts.next().ok_or_else(|| anyhow!("empty tile size"))?)?;
    let height = match parts.next() {
        Some(h) => parse(h)?,
        None => width,
    };
    Ok((width, height))
}
