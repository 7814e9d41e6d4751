//! File naming of a region's inputs and outputs.
//!
//! The urban mask of each year comes from a different
//! historical dataset, with its own naming convention. The
//! mapping from year to filename template is data
//! ([`DatasetNaming`]), not code: a year with no template is
//! a configuration error.
//!
//! Templates expand `{iso}` to the lower case region code,
//! `{ISO}` to the upper case one and `{year}` to the year.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde_derive::{Deserialize, Serialize};

use crate::error::IoContext;
use crate::{Error, Result};

/// The years processed when none are configured.
pub const DEFAULT_YEARS: [u16; 3] = [2000, 2012, 2014];

/// Year to urban-mask filename template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DatasetNaming {
    urban: BTreeMap<u16, String>,
}

impl Default for DatasetNaming {
    fn default() -> Self {
        let urban = vec![
            (2000, "{iso}_grid_100m_ghsl_esa_{year}.tif"),
            (2012, "{iso}_grid_100m_ghsl_guf_{year}.tif"),
            (2014, "{iso}_grid_100m_guf_ghsl_{year}.tif"),
        ];
        DatasetNaming {
            urban: urban
                .into_iter()
                .map(|(y, t)| (y, String::from(t)))
                .collect(),
        }
    }
}

impl DatasetNaming {
    pub fn from_templates<I, S>(templates: I) -> Self
    where
        I: IntoIterator<Item = (u16, S)>,
        S: Into<String>,
    {
        DatasetNaming {
            urban: templates.into_iter().map(|(y, t)| (y, t.into())).collect(),
        }
    }

    /// Load a table from a JSON object mapping years to
    /// templates, e.g. `{"2000": "{iso}_esa_{year}.tif"}`.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)
            .io_context(|| format!("opening naming table {}", path.display()))?;
        serde_json::from_reader(std::io::BufReader::new(file))
            .map_err(|e| Error::config(format!("naming table {}: {}", path.display(), e)))
    }

    pub fn years(&self) -> impl Iterator<Item = u16> + '_ {
        self.urban.keys().copied()
    }

    /// Urban-mask filename for `iso` and `year`.
    pub fn urban_mask(&self, iso: &str, year: u16) -> Result<String> {
        self.urban
            .get(&year)
            .map(|template| expand(template, iso, year))
            .ok_or_else(|| {
                Error::config(format!("no urban mask dataset configured for year {}", year))
            })
    }
}

fn expand(template: &str, iso: &str, year: u16) -> String {
    template
        .replace("{iso}", &iso.to_lowercase())
        .replace("{ISO}", &iso.to_uppercase())
        .replace("{year}", &year.to_string())
}

/// Input rasters of one year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearInputs {
    pub population: PathBuf,
    pub urban: PathBuf,
    pub zones: PathBuf,
}

/// Directory layout of one region under a data root:
///
/// ```text
/// <root>/<ISO>/<iso>_grid_100m_ccidadminl1.tif
/// <root>/<ISO>/ppp/<iso>_ppp_wpgp_<year>.tif
/// <root>/<ISO>/urban/<urban mask template>
/// <root>/<ISO>/<ISO>_BS_PIX_POP_<year>.csv
/// <root>/<ISO>/<ISO>_BS_PIX_POP_SERIES.csv
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionLayout {
    iso: String,
    dir: PathBuf,
}

impl RegionLayout {
    pub fn new<P: AsRef<Path>>(data_root: P, iso: &str) -> Result<Self> {
        if iso.is_empty() || !iso.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(Error::config(format!("invalid region code {:?}", iso)));
        }
        let iso = iso.to_uppercase();
        Ok(RegionLayout {
            dir: data_root.as_ref().join(&iso),
            iso,
        })
    }

    /// Upper case region code.
    pub fn iso(&self) -> &str {
        &self.iso
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn lower(&self) -> String {
        self.iso.to_lowercase()
    }

    /// Admin-zone raster, shared by all years.
    pub fn zones(&self) -> PathBuf {
        self.dir
            .join(format!("{}_grid_100m_ccidadminl1.tif", self.lower()))
    }

    pub fn population(&self, year: u16) -> PathBuf {
        self.dir
            .join("ppp")
            .join(format!("{}_ppp_wpgp_{}.tif", self.lower(), year))
    }

    pub fn urban(&self, naming: &DatasetNaming, year: u16) -> Result<PathBuf> {
        Ok(self.dir.join("urban").join(naming.urban_mask(&self.iso, year)?))
    }

    pub fn inputs(&self, naming: &DatasetNaming, year: u16) -> Result<YearInputs> {
        Ok(YearInputs {
            population: self.population(year),
            urban: self.urban(naming, year)?,
            zones: self.zones(),
        })
    }

    /// Per-year output table.
    pub fn year_table(&self, year: u16) -> PathBuf {
        self.dir
            .join(format!("{}_BS_PIX_POP_{}.csv", self.iso, year))
    }

    /// Combined long-format output.
    pub fn series_table(&self) -> PathBuf {
        self.dir
            .join(format!("{}_BS_PIX_POP_SERIES.csv", self.iso))
    }
}
