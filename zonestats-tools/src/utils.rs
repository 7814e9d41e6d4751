//! Helpers shared by the command line tools.

use std::path::Path;

use anyhow::Context;
use serde_derive::Serialize;
use zonestats::engine::RegionOutput;
use zonestats::naming::DatasetNaming;

use crate::Result;

/// The naming table from `path`, or the built-in one.
pub fn load_naming(path: Option<&Path>) -> Result<DatasetNaming> {
    match path {
        Some(path) => DatasetNaming::from_json_file(path)
            .with_context(|| format!("loading naming table {}", path.display())),
        None => Ok(DatasetNaming::default()),
    }
}

pub fn print_json<T: serde::Serialize>(json: &T) -> Result<()> {
    let writer = std::io::BufWriter::new(std::io::stdout());
    Ok(serde_json::to_writer(writer, json)?)
}

/// Summary of a processed region, as printed on stdout.
#[derive(Debug, Serialize)]
pub struct RegionSummary {
    pub region: String,
    pub years: Vec<YearSummary>,
    pub series: String,
}

#[derive(Debug, Serialize)]
pub struct YearSummary {
    pub year: u16,
    pub table: String,
}

impl RegionSummary {
    pub fn new(region: &str, output: &RegionOutput) -> Self {
        RegionSummary {
            region: region.to_string(),
            years: output
                .years
                .iter()
                .map(|(year, path)| YearSummary {
                    year: *year,
                    table: path.display().to_string(),
                })
                .collect(),
            series: output.series.display().to_string(),
        }
    }
}
