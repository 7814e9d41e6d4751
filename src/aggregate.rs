//! Per-tile aggregation of population and urban pixels by
//! zone.

use ndarray::{Array2, Zip};

use crate::bins::{is_nodata, Bins};
use crate::mask::mask_population_in_place;
use crate::stats::ExactSum;
use crate::ZoneId;

/// The co-located windows of the three input rasters for
/// one tile. All arrays have the same shape.
#[derive(Debug, Clone)]
pub struct TileData {
    pub population: Array2<f64>,
    pub urban: Array2<f64>,
    pub zones: Array2<f64>,
}

/// Per-zone values of one tile. Each list is sorted by zone
/// and holds a zone at most once.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TileResult {
    /// Sum of masked population for each zone present in the
    /// tile. Only positive zone codes are kept.
    pub population: Vec<(ZoneId, ExactSum)>,
    /// Count of pixels with urban value `1`, for each zone
    /// that has any. Zone `0` is kept.
    pub urban: Vec<(ZoneId, u64)>,
}

impl TileResult {
    pub fn is_empty(&self) -> bool {
        self.population.is_empty() && self.urban.is_empty()
    }
}

/// Computes [`TileResult`]s given the nodata sentinels of
/// the population and zone rasters.
#[derive(Debug, Clone, Copy, Default)]
pub struct TileAggregator {
    population_nodata: Option<f64>,
    zone_nodata: Option<f64>,
}

/// Zone codes are integral; fractional codes are truncated.
/// Nodata and codes that do not fit a [`ZoneId`] are skipped.
#[inline]
fn zone_code(val: f64, nodata: Option<f64>) -> Option<f64> {
    if is_nodata(val, nodata) {
        return None;
    }
    let code = val.trunc();
    // `ZoneId::MAX as f64` rounds up to 2^63
    if code < ZoneId::MIN as f64 || code >= ZoneId::MAX as f64 {
        return None;
    }
    Some(code)
}

impl TileAggregator {
    pub fn new(population_nodata: Option<f64>, zone_nodata: Option<f64>) -> Self {
        TileAggregator {
            population_nodata,
            zone_nodata,
        }
    }

    /// Distinct zone codes present in a window, nodata
    /// excluded.
    pub fn zone_bins(&self, zones: &Array2<f64>) -> Bins {
        let nodata = self.zone_nodata;
        Bins::from_values(zones.iter().filter_map(|&z| zone_code(z, nodata)), None)
    }

    /// Mask and aggregate one tile.
    pub fn aggregate(&self, data: TileData) -> TileResult {
        let TileData {
            mut population,
            urban,
            zones,
        } = data;
        mask_population_in_place(&mut population, &urban);

        let bins = self.zone_bins(&zones);
        if bins.is_placeholder() {
            return TileResult::default();
        }

        TileResult {
            population: self.population_sums(&population, &zones, &bins),
            urban: self.urban_counts(&urban, &zones, &bins),
        }
    }

    /// Sum of `population` grouped by the co-located zone.
    /// Expects population already masked.
    pub fn population_sums(
        &self,
        population: &Array2<f64>,
        zones: &Array2<f64>,
        bins: &Bins,
    ) -> Vec<(ZoneId, ExactSum)> {
        let mut sums = vec![ExactSum::default(); bins.len()];
        Zip::from(population).and(zones).for_each(|&p, &z| {
            if !p.is_finite() || is_nodata(p, self.population_nodata) {
                return;
            }
            if let Some(bin) = zone_code(z, self.zone_nodata).and_then(|z| bins.bin_for(z)) {
                sums[bin] += p;
            }
        });

        bins.edges()
            .iter()
            .zip(sums)
            .map(|(&zone, sum)| (zone as ZoneId, sum))
            .filter(|&(zone, _)| zone > 0)
            .collect()
    }

    /// Count of pixels with `urban == 1` grouped by the
    /// co-located zone.
    pub fn urban_counts(
        &self,
        urban: &Array2<f64>,
        zones: &Array2<f64>,
        bins: &Bins,
    ) -> Vec<(ZoneId, u64)> {
        let mut counts = vec![0u64; bins.len()];
        Zip::from(urban).and(zones).for_each(|&u, &z| {
            if u != 1. {
                return;
            }
            if let Some(bin) = zone_code(z, self.zone_nodata).and_then(|z| bins.bin_for(z)) {
                counts[bin] += 1;
            }
        });

        bins.edges()
            .iter()
            .zip(counts)
            .filter(|&(_, count)| count > 0)
            .map(|(&zone, count)| (zone as ZoneId, count))
            .collect()
    }
}
