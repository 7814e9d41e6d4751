//! Drive the tile sweep of a region, year by year.
//!
//! Each year goes through the phases of [`YearPhase`]:
//! the population, urban and zone rasters are opened, swept
//! tile by tile into an [`Accumulator`], finalized into a
//! [`ZonalStatsTable`] and written out. Once all years are
//! persisted they are stacked into the combined series.
//!
//! Tiles follow the native block grid of the population
//! raster. The other two rasters are read over the same
//! windows, so at most one block of each raster is held in
//! memory per worker.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::aggregate::{TileAggregator, TileData, TileResult};
use crate::geometry::{RasterDims, Tile};
use crate::naming::{DatasetNaming, RegionLayout, YearInputs, DEFAULT_YEARS};
use crate::reader::WindowReader;
use crate::series::{concat_years, YearSeries};
use crate::stats::Accumulator;
use crate::table::ZonalStatsTable;
use crate::tiling::TileConfig;
use crate::{Error, Result};

/// The three co-registered rasters of one year.
pub struct RasterSet<R> {
    population: R,
    urban: R,
    zones: R,
}

impl<R: WindowReader> RasterSet<R> {
    /// Fails if the rasters differ in size.
    pub fn new(population: R, urban: R, zones: R) -> Result<Self> {
        let dims = population.dims();
        for (name, other) in &[("urban mask", urban.dims()), ("admin zones", zones.dims())] {
            if *other != dims {
                return Err(Error::config(format!(
                    "{} raster is {}x{} but population raster is {}x{}",
                    name, other.0, other.1, dims.0, dims.1
                )));
            }
        }
        Ok(RasterSet {
            population,
            urban,
            zones,
        })
    }

    pub fn dims(&self) -> RasterDims {
        self.population.dims()
    }

    /// Tiling along the population raster's native blocks,
    /// unless `block` overrides it.
    pub fn tile_config(&self, block: Option<RasterDims>) -> Result<TileConfig> {
        let cfg = TileConfig::for_reader(&self.population)?;
        match block {
            Some(block) => cfg.with_block_size(block),
            None => Ok(cfg),
        }
    }

    pub fn aggregator(&self) -> TileAggregator {
        TileAggregator::new(self.population.nodata(), self.zones.nodata())
    }

    /// Read the co-located windows of all three rasters.
    pub fn read_tile(&self, tile: Tile) -> Result<TileData> {
        Ok(TileData {
            urban: self.urban.read_window(tile)?,
            population: self.population.read_window(tile)?,
            zones: self.zones.read_window(tile)?,
        })
    }

    pub fn process_tile(&self, tile: Tile, aggregator: &TileAggregator) -> Result<TileResult> {
        Ok(aggregator.aggregate(self.read_tile(tile)?))
    }
}

/// Sweep all tiles of `cfg` in order on the current
/// thread.
pub fn sweep<R, F>(rasters: &RasterSet<R>, cfg: &TileConfig, mut on_tile: F) -> Result<Accumulator>
where
    R: WindowReader,
    F: FnMut(Tile),
{
    let aggregator = rasters.aggregator();
    let mut acc = Accumulator::new();
    for tile in cfg {
        acc += &rasters.process_tile(tile, &aggregator)?;
        on_tile(tile);
    }
    Ok(acc)
}

/// Sweep the tiles of `cfg` on the rayon thread pool. Each
/// worker opens its own rasters with `open` and folds into a
/// private [`Accumulator`]; the partial accumulators are
/// merged once at the end.
///
/// This function is only available with the "use-rayon" feature.
#[cfg(feature = "use-rayon")]
pub fn par_sweep<R, O, F>(cfg: &TileConfig, open: O, on_tile: F) -> Result<Accumulator>
where
    R: WindowReader,
    O: Fn() -> Result<RasterSet<R>> + Sync + Send,
    F: Fn(Tile) + Sync + Send,
{
    use rayon::prelude::*;

    cfg.par_iter()
        .map_init(
            || open().map(|rasters| {
                let aggregator = rasters.aggregator();
                (rasters, aggregator)
            }),
            |init, tile| {
                let (rasters, aggregator) = init
                    .as_ref()
                    .map_err(|e| Error::io("opening rasters for worker", e.to_string()))?;
                let result = rasters.process_tile(tile, aggregator)?;
                on_tile(tile);
                Ok::<_, Error>(result)
            },
        )
        .try_fold(Accumulator::new, |mut acc, result| {
            acc += &result?;
            Ok::<_, Error>(acc)
        })
        .try_reduce(Accumulator::new, |mut acc_1, acc_2| {
            acc_1 += acc_2;
            Ok(acc_1)
        })
}

/// Opens rasters by path. Abstracts the storage so the
/// engine can run on GDAL datasets or in-memory grids.
pub trait RasterSource: Sync {
    type Reader: WindowReader;

    fn open(&self, path: &Path) -> Result<Self::Reader>;

    fn open_year(&self, inputs: &YearInputs) -> Result<RasterSet<Self::Reader>> {
        RasterSet::new(
            self.open(&inputs.population)?,
            self.open(&inputs.urban)?,
            self.open(&inputs.zones)?,
        )
    }
}

/// Opens rasters from disk with GDAL.
#[cfg(feature = "gdal")]
#[derive(Debug, Clone, Copy, Default)]
pub struct GdalSource;

#[cfg(feature = "gdal")]
impl RasterSource for GdalSource {
    type Reader = crate::reader::RasterHandle;

    fn open(&self, path: &Path) -> Result<Self::Reader> {
        crate::reader::RasterHandle::open(path)
    }
}

/// Phase of one year's processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YearPhase {
    Idle,
    Sweeping { tiles: usize },
    Finalized { zones: usize },
    Persisted,
}

/// Receives progress of the sweep. Both methods default to
/// doing nothing.
pub trait SweepObserver: Sync {
    fn phase(&self, _year: u16, _phase: YearPhase) {}
    fn tile_done(&self, _year: u16) {}
}

impl SweepObserver for () {}

/// What to process for a region.
#[derive(Debug, Clone)]
pub struct RegionConfig {
    /// Region (country) code, e.g. `NPL`.
    pub iso: String,
    /// Directory holding one sub-directory per region.
    pub data_root: PathBuf,
    pub years: Vec<u16>,
    pub naming: DatasetNaming,
    /// Tile size override; defaults to the population
    /// raster's block size.
    pub block_size: Option<RasterDims>,
    /// Number of sweep threads. `None` sweeps on the calling
    /// thread.
    pub threads: Option<usize>,
}

impl RegionConfig {
    pub fn new<S: Into<String>>(iso: S) -> Self {
        RegionConfig {
            iso: iso.into(),
            data_root: PathBuf::from("datain"),
            years: DEFAULT_YEARS.to_vec(),
            naming: DatasetNaming::default(),
            block_size: None,
            threads: None,
        }
    }
}

/// Output locations of a processed region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionOutput {
    pub years: Vec<(u16, PathBuf)>,
    pub series: PathBuf,
}

/// Computes the zonal statistics of one region.
pub struct ZonalStatsEngine<S> {
    source: S,
    layout: RegionLayout,
    naming: DatasetNaming,
    years: Vec<u16>,
    block_size: Option<RasterDims>,
    threads: Option<usize>,
}

impl<S: RasterSource> ZonalStatsEngine<S> {
    /// Validate `config`: every year must have a dataset
    /// naming and the tile size, if given, must be non-zero.
    pub fn new(config: RegionConfig, source: S) -> Result<Self> {
        let layout = RegionLayout::new(&config.data_root, &config.iso)?;
        if config.years.is_empty() {
            return Err(Error::config("no years configured"));
        }
        for &year in &config.years {
            config.naming.urban_mask(layout.iso(), year)?;
        }
        if let Some(block) = config.block_size {
            TileConfig::new((0, 0), block)?;
        }
        if config.threads == Some(0) {
            return Err(Error::config("thread count must be at least 1"));
        }

        Ok(ZonalStatsEngine {
            source,
            layout,
            naming: config.naming,
            years: config.years,
            block_size: config.block_size,
            threads: config.threads,
        })
    }

    pub fn layout(&self) -> &RegionLayout {
        &self.layout
    }

    pub fn years(&self) -> &[u16] {
        &self.years
    }

    /// Sweep one year and return its finalized table without
    /// persisting it.
    pub fn compute_year(&self, year: u16, observer: &dyn SweepObserver) -> Result<ZonalStatsTable> {
        observer.phase(year, YearPhase::Idle);
        let inputs = self.layout.inputs(&self.naming, year)?;
        debug!(?inputs, year, "opening rasters");

        let rasters = self.source.open_year(&inputs)?;
        let cfg = rasters.tile_config(self.block_size)?;
        if cfg.is_empty() {
            warn!(year, "rasters are empty; no tiles to sweep");
        }

        info!(
            region = self.layout.iso(),
            year,
            tiles = cfg.len(),
            block = ?cfg.block_size(),
            "sweeping"
        );
        observer.phase(year, YearPhase::Sweeping { tiles: cfg.len() });
        let acc = self.sweep(&inputs, rasters, &cfg, |_| observer.tile_done(year))?;
        debug!(year, tiles = acc.tiles(), "sweep complete");

        let table = acc.finalize();
        observer.phase(year, YearPhase::Finalized { zones: table.len() });
        Ok(table)
    }

    #[cfg(feature = "use-rayon")]
    fn sweep<F>(
        &self,
        inputs: &YearInputs,
        rasters: RasterSet<S::Reader>,
        cfg: &TileConfig,
        on_tile: F,
    ) -> Result<Accumulator>
    where
        F: Fn(Tile) + Sync + Send,
    {
        let threads = match self.threads {
            Some(threads) => threads,
            None => return sweep(&rasters, cfg, on_tile),
        };
        // Workers open their own readers
        drop(rasters);

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(|e| Error::config(format!("building thread pool: {}", e)))?;
        pool.install(|| par_sweep(cfg, || self.source.open_year(inputs), on_tile))
    }

    #[cfg(not(feature = "use-rayon"))]
    fn sweep<F>(
        &self,
        _inputs: &YearInputs,
        rasters: RasterSet<S::Reader>,
        cfg: &TileConfig,
        on_tile: F,
    ) -> Result<Accumulator>
    where
        F: Fn(Tile) + Sync + Send,
    {
        if self.threads.is_some() {
            warn!("built without the use-rayon feature; sweeping on one thread");
        }
        sweep(&rasters, cfg, on_tile)
    }

    /// Sweep one year and write its table. Returns the table
    /// path.
    pub fn run_year(&self, year: u16, observer: &dyn SweepObserver) -> Result<PathBuf> {
        let table = self.compute_year(year, observer)?;
        let path = self.layout.year_table(year);
        table.write_csv(&path)?;
        observer.phase(year, YearPhase::Persisted);
        info!(year, zones = table.len(), path = %path.display(), "wrote year table");
        Ok(path)
    }

    /// Process every configured year, then write the combined
    /// series. Stops at the first failing year; tables
    /// already written stay valid.
    pub fn run(&self, observer: &dyn SweepObserver) -> Result<RegionOutput> {
        let mut years = Vec::with_capacity(self.years.len());
        for &year in &self.years {
            years.push((year, self.run_year(year, observer)?));
        }

        let series = self.concat()?;
        let path = self.layout.series_table();
        series.write_csv(&path)?;
        info!(rows = series.len(), path = %path.display(), "wrote combined series");

        Ok(RegionOutput {
            years,
            series: path,
        })
    }

    /// Stack the persisted per-year tables.
    pub fn concat(&self) -> Result<YearSeries> {
        let tables: Vec<_> = self
            .years
            .iter()
            .map(|&year| (year, self.layout.year_table(year)))
            .collect();
        concat_years(&tables)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::MemRaster;
    use crate::ZoneId;
    use rand::{rngs::StdRng, Rng, SeedableRng};
    use std::collections::BTreeMap;
    use std::sync::Mutex;
    use tempdir::TempDir;

    const ZONES: [[u8; 4]; 4] = [[1, 1, 2, 2], [1, 1, 2, 2], [3, 3, 0, 0], [3, 3, 0, 0]];
    const URBAN: [[u8; 4]; 4] = [[1, 1, 1, 1], [1, 1, 1, 1], [0, 0, 0, 0], [0, 0, 0, 0]];

    fn scenario() -> RasterSet<MemRaster> {
        RasterSet::new(
            MemRaster::from_rows(&[[10u8; 4]; 4]).unwrap(),
            MemRaster::from_rows(&URBAN).unwrap(),
            MemRaster::from_rows(&ZONES).unwrap(),
        )
        .unwrap()
    }

    fn table_for(rasters: &RasterSet<MemRaster>, block: RasterDims) -> ZonalStatsTable {
        let cfg = rasters.tile_config(Some(block)).unwrap();
        sweep(rasters, &cfg, |_| {}).unwrap().finalize()
    }

    fn rows(table: &ZonalStatsTable) -> Vec<(ZoneId, f64, u64)> {
        table
            .iter()
            .map(|r| (r.zone_id, r.population_sum, r.urban_pixel_count))
            .collect()
    }

    #[test]
    fn four_by_four_scenario() {
        let table = table_for(&scenario(), (2, 2));
        assert_eq!(
            rows(&table),
            vec![(1, 40., 4), (2, 40., 4), (3, 0., 0)]
        );
    }

    #[test]
    fn tile_size_does_not_change_scenario() {
        let rasters = scenario();
        let expected = table_for(&rasters, (4, 4));
        for &block in &[(2, 2), (1, 1), (3, 3), (4, 1), (1, 4), (3, 2)] {
            assert_eq!(table_for(&rasters, block), expected, "block {:?}", block);
        }
        // native block: one row per tile
        let native = sweep(&rasters, &rasters.tile_config(None).unwrap(), |_| {})
            .unwrap()
            .finalize();
        assert_eq!(native, expected);
    }

    #[test]
    fn mismatched_rasters_rejected() {
        let res = RasterSet::new(
            MemRaster::from_rows(&[[1u8; 4]; 4]).unwrap(),
            MemRaster::from_rows(&[[1u8; 3]; 4]).unwrap(),
            MemRaster::from_rows(&[[1u8; 4]; 4]).unwrap(),
        );
        assert!(matches!(res, Err(Error::Configuration(_))));
    }

    /// Random rasters with nodata in every input.
    fn random_rasters(rng: &mut StdRng, width: usize, height: usize) -> RasterSet<MemRaster> {
        let mut population = vec![vec![0f64; width]; height];
        let mut urban = vec![vec![0f64; width]; height];
        let mut zones = vec![vec![0f64; width]; height];
        for y in 0..height {
            for x in 0..width {
                population[y][x] = if rng.gen_ratio(1, 20) {
                    -99999.
                } else {
                    rng.gen::<f32>() as f64 * 250.
                };
                urban[y][x] = match rng.gen_range(0..10) {
                    0..=4 => 0.,
                    5..=8 => 1.,
                    _ => 255.,
                };
                zones[y][x] = if rng.gen_ratio(1, 15) {
                    65535.
                } else {
                    rng.gen_range(0..12) as f64
                };
            }
        }
        RasterSet::new(
            MemRaster::from_rows(&population).unwrap().with_nodata(Some(-99999.)),
            MemRaster::from_rows(&urban).unwrap().with_nodata(Some(255.)),
            MemRaster::from_rows(&zones).unwrap().with_nodata(Some(65535.)),
        )
        .unwrap()
    }

    /// Direct single-pass aggregation over the whole grid.
    fn direct(rasters: &RasterSet<MemRaster>) -> BTreeMap<ZoneId, (f64, u64)> {
        let full = rasters.read_tile(Tile::full(rasters.dims())).unwrap();
        let mut sums: BTreeMap<ZoneId, Vec<f64>> = BTreeMap::new();
        let mut counts: BTreeMap<ZoneId, u64> = BTreeMap::new();
        for ((&p, &u), &z) in full
            .population
            .iter()
            .zip(full.urban.iter())
            .zip(full.zones.iter())
        {
            if z == 65535. {
                continue;
            }
            let zone = z as ZoneId;
            let values = sums.entry(zone).or_default();
            if p != -99999. {
                values.push(if u == 0. { 0. } else { p });
            }
            if u == 1. {
                *counts.entry(zone).or_default() += 1;
            }
        }

        let mut out = BTreeMap::new();
        for (zone, values) in sums {
            let mut sum = crate::stats::ExactSum::default();
            for v in values {
                sum += v;
            }
            out.insert(zone, (sum.value(), 0));
        }
        for (zone, count) in counts {
            out.entry(zone).or_insert((0., 0)).1 = count;
        }
        out.split_off(&1)
    }

    #[test]
    fn tiled_equals_direct() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for &(width, height) in &[(17, 9), (64, 33), (5, 40)] {
            let rasters = random_rasters(&mut rng, width, height);
            let expected = direct(&rasters);
            for &block in &[(1, 1), (4, 4), (7, 3), (width, 1), (width, height), (16, 256)] {
                let table = table_for(&rasters, block);
                let got: BTreeMap<_, _> = table
                    .iter()
                    .map(|r| (r.zone_id, (r.population_sum, r.urban_pixel_count)))
                    .collect();
                assert_eq!(got, expected, "{}x{} / block {:?}", width, height, block);
            }
        }
    }

    #[test]
    fn bit_identical_across_tile_sizes() {
        let mut rng = StdRng::seed_from_u64(42);
        let rasters = random_rasters(&mut rng, 50, 50);
        let reference: Vec<u64> = table_for(&rasters, (50, 50))
            .iter()
            .map(|r| r.population_sum.to_bits())
            .collect();
        for &block in &[(1, 1), (3, 7), (13, 2), (50, 1)] {
            let bits: Vec<u64> = table_for(&rasters, block)
                .iter()
                .map(|r| r.population_sum.to_bits())
                .collect();
            assert_eq!(bits, reference);
        }
    }

    #[test]
    fn zone_zero_never_in_table() {
        let rasters = RasterSet::new(
            MemRaster::from_rows(&[[3u8; 3]; 2]).unwrap(),
            MemRaster::from_rows(&[[1u8; 3]; 2]).unwrap(),
            MemRaster::from_rows(&[[0u8; 3]; 2]).unwrap(),
        )
        .unwrap();
        assert!(table_for(&rasters, (2, 1)).is_empty());
    }

    #[test]
    fn negative_zones_never_in_table() {
        let rasters = RasterSet::new(
            MemRaster::from_rows(&[[10i16, 10]]).unwrap(),
            MemRaster::from_rows(&[[1i16, 1]]).unwrap(),
            MemRaster::from_rows(&[[-5i16, 1]]).unwrap(),
        )
        .unwrap();
        for &block in &[(1, 1), (2, 1)] {
            let table = table_for(&rasters, block);
            assert!(table.iter().all(|r| r.zone_id >= 1));
            assert_eq!(rows(&table), vec![(1, 10., 1)]);
        }
    }

    #[test]
    fn degenerate_tiles_do_not_disturb_totals() {
        // left half is all nodata zones, right half has no
        // urban pixels
        let zones = [[9u8, 9, 1, 2], [9, 9, 1, 2]];
        let urban = [[1u8, 1, 0, 0], [1, 1, 0, 0]];
        let rasters = RasterSet::new(
            MemRaster::from_rows(&[[7u8; 4]; 2]).unwrap(),
            MemRaster::from_rows(&urban).unwrap(),
            MemRaster::from_rows(&zones).unwrap().with_nodata(Some(9.)),
        )
        .unwrap();
        let table = table_for(&rasters, (2, 2));
        assert_eq!(rows(&table), vec![(1, 0., 0), (2, 0., 0)]);
    }

    #[cfg(feature = "use-rayon")]
    #[test]
    fn parallel_sweep_matches_sequential() {
        let mut rng = StdRng::seed_from_u64(7);
        let rasters = random_rasters(&mut rng, 40, 30);
        let cfg = rasters.tile_config(Some((6, 5))).unwrap();
        let expected = sweep(&rasters, &cfg, |_| {}).unwrap().finalize();

        let tiles = Mutex::new(0);
        let acc = par_sweep(
            &cfg,
            || {
                Ok(RasterSet {
                    population: rasters.population.clone(),
                    urban: rasters.urban.clone(),
                    zones: rasters.zones.clone(),
                })
            },
            |_| *tiles.lock().unwrap() += 1,
        )
        .unwrap();
        assert_eq!(acc.tiles(), cfg.len());
        assert_eq!(*tiles.lock().unwrap(), cfg.len());
        assert_eq!(acc.finalize(), expected);
    }

    /// In-memory rasters keyed by path.
    struct MemSource(BTreeMap<PathBuf, MemRaster>);

    impl RasterSource for MemSource {
        type Reader = MemRaster;

        fn open(&self, path: &Path) -> Result<MemRaster> {
            self.0
                .get(path)
                .cloned()
                .ok_or_else(|| Error::io(format!("opening raster {}", path.display()), "not found"))
        }
    }

    fn mem_region(root: &Path, years: &[u16]) -> MemSource {
        let layout = RegionLayout::new(root, "tst").unwrap();
        let naming = DatasetNaming::default();
        let mut rasters = BTreeMap::new();
        rasters.insert(layout.zones(), MemRaster::from_rows(&ZONES).unwrap());
        for (i, &year) in years.iter().enumerate() {
            let pop = 10 + i as u8;
            rasters.insert(
                layout.population(year),
                MemRaster::from_rows(&[[pop; 4]; 4]).unwrap(),
            );
            rasters.insert(
                layout.urban(&naming, year).unwrap(),
                MemRaster::from_rows(&URBAN).unwrap(),
            );
        }
        MemSource(rasters)
    }

    #[derive(Default)]
    struct Phases(Mutex<Vec<(u16, YearPhase)>>, Mutex<usize>);
    impl SweepObserver for Phases {
        fn phase(&self, year: u16, phase: YearPhase) {
            self.0.lock().unwrap().push((year, phase));
        }
        fn tile_done(&self, _year: u16) {
            *self.1.lock().unwrap() += 1;
        }
    }

    #[test]
    fn engine_runs_all_years() {
        let tmp_dir = TempDir::new("zonestats_engine").unwrap();
        let root = tmp_dir.path();
        std::fs::create_dir_all(root.join("TST")).unwrap();

        let mut config = RegionConfig::new("tst");
        config.data_root = root.to_path_buf();
        config.block_size = Some((2, 2));
        let source = mem_region(root, &config.years);
        let engine = ZonalStatsEngine::new(config, source).unwrap();

        let observer = Phases::default();
        let output = engine.run(&observer).unwrap();

        assert_eq!(output.years.len(), 3);
        assert_eq!(output.years[1], (2012, root.join("TST/TST_BS_PIX_POP_2012.csv")));
        let table = ZonalStatsTable::read_csv(&output.years[1].1).unwrap();
        assert_eq!(rows(&table), vec![(1, 44., 4), (2, 44., 4), (3, 0., 0)]);

        let series = YearSeries::read_csv(&output.series).unwrap();
        assert_eq!(series.len(), 9);

        let phases = observer.0.lock().unwrap();
        assert_eq!(
            &phases[..4],
            &[
                (2000, YearPhase::Idle),
                (2000, YearPhase::Sweeping { tiles: 4 }),
                (2000, YearPhase::Finalized { zones: 3 }),
                (2000, YearPhase::Persisted),
            ]
        );
        assert_eq!(*observer.1.lock().unwrap(), 12);
    }

    #[cfg(feature = "use-rayon")]
    #[test]
    fn engine_threads_match_sequential() {
        let tmp_dir = TempDir::new("zonestats_engine_par").unwrap();
        let root = tmp_dir.path();

        let mut config = RegionConfig::new("tst");
        config.data_root = root.to_path_buf();
        config.years = vec![2000];
        config.block_size = Some((1, 3));
        let sequential = ZonalStatsEngine::new(config.clone(), mem_region(root, &[2000]))
            .unwrap()
            .compute_year(2000, &())
            .unwrap();

        config.threads = Some(3);
        let parallel = ZonalStatsEngine::new(config, mem_region(root, &[2000]))
            .unwrap()
            .compute_year(2000, &())
            .unwrap();
        assert_eq!(parallel, sequential);
    }

    #[test]
    fn engine_rejects_bad_configuration() {
        let mut config = RegionConfig::new("tst");
        config.years = vec![2000, 2005];
        assert!(matches!(
            ZonalStatsEngine::new(config, MemSource(BTreeMap::new())),
            Err(Error::Configuration(_))
        ));

        let mut config = RegionConfig::new("tst");
        config.block_size = Some((0, 16));
        assert!(matches!(
            ZonalStatsEngine::new(config, MemSource(BTreeMap::new())),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn failed_year_keeps_earlier_tables() {
        let tmp_dir = TempDir::new("zonestats_engine_fail").unwrap();
        let root = tmp_dir.path();
        std::fs::create_dir_all(root.join("TST")).unwrap();

        let mut config = RegionConfig::new("tst");
        config.data_root = root.to_path_buf();
        // 2014 rasters are never registered
        let source = mem_region(root, &[2000, 2012]);
        let engine = ZonalStatsEngine::new(config, source).unwrap();

        assert!(matches!(engine.run(&()), Err(Error::Io { .. })));
        let layout = engine.layout();
        assert!(layout.year_table(2000).exists());
        assert!(layout.year_table(2012).exists());
        assert!(!layout.year_table(2014).exists());
        assert!(!layout.series_table().exists());
    }
}
