//! Stack per-year tables into one long-format series.

use std::path::{Path, PathBuf};

use serde_derive::{Deserialize, Serialize};

use crate::error::IoContext;
use crate::table::{write_atomic, ZonalStatsTable};
use crate::{Error, Result, ZoneId};

/// One `(zone, year)` row of the combined series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesRecord {
    pub zone_id: ZoneId,
    pub year: u16,
    pub population_sum: f64,
    pub urban_pixel_count: u64,
}

/// Rows of all years, in the order the years were stacked
/// and by zone within a year.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct YearSeries {
    rows: Vec<SeriesRecord>,
}

impl YearSeries {
    /// Append the rows of one year's table.
    pub fn push_year(&mut self, year: u16, table: &ZonalStatsTable) {
        self.rows.extend(table.iter().map(|r| SeriesRecord {
            zone_id: r.zone_id,
            year,
            population_sum: r.population_sum,
            urban_pixel_count: r.urban_pixel_count,
        }));
    }

    pub fn rows(&self) -> &[SeriesRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn write_csv(&self, path: &Path) -> Result<()> {
        write_atomic(path, |file| {
            let mut wtr = csv::Writer::from_writer(file);
            for row in &self.rows {
                wtr.serialize(row)
                    .io_context(|| format!("writing {}", path.display()))?;
            }
            if self.rows.is_empty() {
                wtr.write_record(&["zone_id", "year", "population_sum", "urban_pixel_count"])
                    .io_context(|| format!("writing {}", path.display()))?;
            }
            wtr.flush()
                .io_context(|| format!("writing {}", path.display()))?;
            Ok(())
        })
    }

    pub fn read_csv(path: &Path) -> Result<Self> {
        let mut rdr =
            csv::Reader::from_path(path).io_context(|| format!("opening {}", path.display()))?;
        let rows = rdr
            .deserialize()
            .collect::<std::result::Result<Vec<SeriesRecord>, _>>()
            .io_context(|| format!("reading {}", path.display()))?;
        Ok(YearSeries { rows })
    }
}

/// Read every `(year, table path)` in turn and stack them.
/// A missing table fails with [`Error::MissingInput`]
/// rather than being skipped.
pub fn concat_years(tables: &[(u16, PathBuf)]) -> Result<YearSeries> {
    for (year, path) in tables {
        if !path.is_file() {
            return Err(Error::MissingInput {
                year: *year,
                path: path.clone(),
            });
        }
    }

    let mut series = YearSeries::default();
    for (year, path) in tables {
        series.push_year(*year, &ZonalStatsTable::read_csv(path)?);
    }
    Ok(series)
}
