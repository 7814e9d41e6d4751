//! Per-zone urban population statistics from co-registered
//! rasters.
//!
//! The inputs for each year are three single-band rasters
//! of identical extent: a population density grid, a
//! binary urban mask and an administrative zone grid. The
//! rasters are swept in blocks (see [`tiling`]) so that
//! memory stays bounded by one block per raster, and the
//! per-block partial results are merged into a per-zone
//! table (see [`stats`]).
//!
//! The [`engine`] drives this for every configured year of
//! a region, and [`series`] stacks the per-year tables into
//! one long-format series.

pub mod aggregate;
pub mod bins;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod mask;
pub mod naming;
pub mod prelude;
pub mod reader;
pub mod series;
pub mod stats;
pub mod table;
pub mod tiling;

pub use error::{Error, Result};

/// Identifier of an administrative zone. Zone `0` marks
/// water or pixels outside any admin unit.
pub type ZoneId = i64;
