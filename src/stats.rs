//! Accumulate per-zone population sums and urban pixel
//! counts incrementally, one tile at a time.
//!
//! Accumulation is done by add-assigning (using `+=`)
//! either a single value or a whole partial accumulator,
//! so that the same types serve a sequential sweep and a
//! parallel fold-and-reduce.

use std::collections::BTreeMap;
use std::ops::AddAssign;

use crate::aggregate::TileResult;
use crate::table::{ZonalStatsTable, ZoneStatsRecord};
use crate::ZoneId;

/// An exact sum of `f64` values.
///
/// The running total is kept as a list of non-overlapping
/// partials of increasing magnitude (Shewchuk's algorithm),
/// so no precision is lost while adding. [`value`] rounds
/// once, to the nearest `f64` of the exact total. The result
/// therefore does not depend on the order in which values
/// or partial sums are added, which keeps tables identical
/// across tile sizes.
///
/// Only finite values may be added.
///
/// [`value`]: ExactSum::value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExactSum {
    partials: Vec<f64>,
}

impl AddAssign<f64> for ExactSum {
    fn add_assign(&mut self, other: f64) {
        debug_assert!(other.is_finite(), "adding non-finite value {}", other);
        let mut x = other;
        let mut i = 0;
        for j in 0..self.partials.len() {
            let mut y = self.partials[j];
            if x.abs() < y.abs() {
                std::mem::swap(&mut x, &mut y);
            }
            let hi = x + y;
            let lo = y - (hi - x);
            if lo != 0. {
                self.partials[i] = lo;
                i += 1;
            }
            x = hi;
        }
        self.partials.truncate(i);
        self.partials.push(x);
    }
}

impl AddAssign<&ExactSum> for ExactSum {
    fn add_assign(&mut self, other: &ExactSum) {
        for &p in &other.partials {
            *self += p;
        }
    }
}

impl ExactSum {
    /// The total, correctly rounded to `f64`.
    pub fn value(&self) -> f64 {
        let p = &self.partials;
        let mut n = p.len();
        if n == 0 {
            return 0.;
        }

        n -= 1;
        let mut hi = p[n];
        let mut lo = 0.;
        while n > 0 {
            let x = hi;
            n -= 1;
            let y = p[n];
            hi = x + y;
            lo = y - (hi - x);
            if lo != 0. {
                break;
            }
        }

        // Round half-even across the remaining partials:
        // the sign of the next partial breaks the tie.
        if n > 0 && ((lo < 0. && p[n - 1] < 0.) || (lo > 0. && p[n - 1] > 0.)) {
            let y = lo * 2.;
            let x = hi + y;
            if y == x - hi {
                hi = x;
            }
        }
        hi
    }
}

/// Running per-zone totals for one year's sweep.
///
/// Holds two mappings keyed by zone: the sum of masked
/// population and the count of urban pixels. Zone `0` is
/// kept while accumulating; [`finalize`] drops every zone
/// below `1`.
///
/// [`finalize`]: Accumulator::finalize
#[derive(Debug, Clone, Default)]
pub struct Accumulator {
    population: BTreeMap<ZoneId, ExactSum>,
    urban: BTreeMap<ZoneId, u64>,
    tiles: usize,
}

impl Accumulator {
    pub fn new() -> Self {
        Default::default()
    }

    /// Merge one tile's per-zone values into the running
    /// totals.
    pub fn add_tile_result(&mut self, result: &TileResult) {
        for (zone, sum) in &result.population {
            *self.population.entry(*zone).or_default() += sum;
        }
        for &(zone, count) in &result.urban {
            *self.urban.entry(zone).or_insert(0) += count;
        }
        self.tiles += 1;
    }

    /// Number of tiles merged so far.
    pub fn tiles(&self) -> usize {
        self.tiles
    }

    pub fn population_sum(&self, zone: ZoneId) -> Option<f64> {
        self.population.get(&zone).map(ExactSum::value)
    }

    pub fn urban_count(&self, zone: ZoneId) -> Option<u64> {
        self.urban.get(&zone).copied()
    }

    /// Join both mappings on zone into the final table.
    /// Zones missing from either side get `0` for it, and
    /// zones below `1` are dropped.
    pub fn finalize(self) -> ZonalStatsTable {
        let Accumulator {
            population, urban, ..
        } = self;

        let mut records: BTreeMap<ZoneId, ZoneStatsRecord> = population
            .into_iter()
            .map(|(zone_id, sum)| {
                (
                    zone_id,
                    ZoneStatsRecord {
                        zone_id,
                        population_sum: sum.value(),
                        urban_pixel_count: 0,
                    },
                )
            })
            .collect();

        for (zone_id, count) in urban {
            records
                .entry(zone_id)
                .or_insert(ZoneStatsRecord {
                    zone_id,
                    population_sum: 0.,
                    urban_pixel_count: 0,
                })
                .urban_pixel_count = count;
        }

        // zone codes below 1 are water or outside any admin unit
        let records = records.split_off(&1);
        ZonalStatsTable::from_records(records.into_iter().map(|(_, r)| r))
    }
}

impl AddAssign<&TileResult> for Accumulator {
    fn add_assign(&mut self, other: &TileResult) {
        self.add_tile_result(other);
    }
}

impl AddAssign for Accumulator {
    fn add_assign(&mut self, other: Accumulator) {
        for (zone, sum) in &other.population {
            *self.population.entry(*zone).or_default() += sum;
        }
        for (zone, count) in other.urban {
            *self.urban.entry(zone).or_insert(0) += count;
        }
        self.tiles += other.tiles;
    }
}
