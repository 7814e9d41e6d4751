//! Finalized per-zone tables and their CSV form.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde_derive::{Deserialize, Serialize};

use crate::error::IoContext;
use crate::{Result, ZoneId};

/// Statistics of one zone for one year. Field names double
/// as the CSV header.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneStatsRecord {
    pub zone_id: ZoneId,
    pub population_sum: f64,
    pub urban_pixel_count: u64,
}

/// Per-zone statistics of one year, ordered by zone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ZonalStatsTable {
    records: BTreeMap<ZoneId, ZoneStatsRecord>,
}

impl ZonalStatsTable {
    /// Build from records; a later record for the same zone
    /// replaces an earlier one.
    pub fn from_records<I: IntoIterator<Item = ZoneStatsRecord>>(records: I) -> Self {
        ZonalStatsTable {
            records: records.into_iter().map(|r| (r.zone_id, r)).collect(),
        }
    }

    pub fn get(&self, zone: ZoneId) -> Option<&ZoneStatsRecord> {
        self.records.get(&zone)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in ascending zone order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &ZoneStatsRecord> + '_ {
        self.records.values()
    }

    pub fn write_to<W: Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        for record in self.iter() {
            wtr.serialize(record).io_context(|| "writing zonal stats")?;
        }
        if self.is_empty() {
            // serde writes the header lazily with the first row
            wtr.write_record(&["zone_id", "population_sum", "urban_pixel_count"])
                .io_context(|| "writing zonal stats")?;
        }
        wtr.flush().io_context(|| "writing zonal stats")?;
        Ok(())
    }

    /// Persist as CSV. The file is written next to `path`
    /// and renamed into place, so a failed write never
    /// leaves a truncated table behind.
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        write_atomic(path, |file| self.write_to(file))
    }

    pub fn read_csv(path: &Path) -> Result<Self> {
        let mut rdr =
            csv::Reader::from_path(path).io_context(|| format!("opening {}", path.display()))?;
        let records = rdr
            .deserialize()
            .collect::<std::result::Result<Vec<ZoneStatsRecord>, _>>()
            .io_context(|| format!("reading {}", path.display()))?;
        Ok(ZonalStatsTable::from_records(records))
    }
}

impl<'a> IntoIterator for &'a ZonalStatsTable {
    type Item = &'a ZoneStatsRecord;
    type IntoIter = std::collections::btree_map::Values<'a, ZoneId, ZoneStatsRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.values()
    }
}

/// Write through a temporary sibling file and rename it
/// over `path` once `write` succeeds.
pub(crate) fn write_atomic<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut std::io::BufWriter<fs::File>) -> Result<()>,
{
    let tmp = temp_sibling(path);
    let res = (|| {
        let file = fs::File::create(&tmp).io_context(|| format!("creating {}", tmp.display()))?;
        let mut buf = std::io::BufWriter::with_capacity(0x100000, file);
        write(&mut buf)?;
        buf.flush()
            .io_context(|| format!("writing {}", tmp.display()))?;
        fs::rename(&tmp, path).io_context(|| format!("renaming to {}", path.display()))
    })();
    if res.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    res
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".partial");
    path.with_file_name(name)
}
