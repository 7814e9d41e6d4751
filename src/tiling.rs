//! Sweep rasters in memory-efficient tiles.
//!
//! Large rasters are sub-divided internally into
//! rectangular blocks of a specific size, and reading along
//! block boundaries avoids decoding a block more than once.
//! A [`TileConfig`] describes a raster of a given size cut
//! into tiles of one block each:
//!
//! - Tiles are laid out row-major: the outer loop runs over
//! block rows and the inner loop over block columns.
//!
//! - The last tile along each axis is clipped to the raster
//! edge, so no tile has zero area and no two tiles overlap.
//!
//! - The union of all tiles is exactly the raster extent.
//!
//! The iteration is lazy and restartable: iterating the
//! same configuration twice yields the same tiles in the
//! same order.

use crate::geometry::{RasterDims, Tile};

/// Tiling of a raster of size `width x height` into blocks
/// of `block_width x block_height`. Construct with
/// [`TileConfig::new`] or [`TileConfig::for_reader`].
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct TileConfig {
    width: usize,
    height: usize,

    block_width: usize,
    block_height: usize,
}

mod builder;
mod iters;

#[cfg(feature = "use-rayon")]
mod par_iters;

#[inline]
fn div_ceil(num: usize, m: usize) -> usize {
    (num + m - 1) / m
}

/// Length of the tile starting at `offset` along an axis of
/// length `total`.
#[inline]
fn clipped(offset: usize, block: usize, total: usize) -> usize {
    if offset + block < total {
        block
    } else {
        total - offset
    }
}

impl TileConfig {
    /// Number of tiles along each axis, as `(cols, rows)`.
    pub fn grid_dims(&self) -> RasterDims {
        (
            div_ceil(self.width, self.block_width),
            div_ceil(self.height, self.block_height),
        )
    }

    /// Total number of tiles in a sweep.
    pub fn len(&self) -> usize {
        let (cols, rows) = self.grid_dims();
        cols * rows
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The `idx`-th tile of the sweep in row-major order.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is not less than [`len`].
    ///
    /// [`len`]: TileConfig::len
    pub fn tile(&self, idx: usize) -> Tile {
        let (cols, _) = self.grid_dims();
        assert!(idx < self.len(), "tile index out of range");

        let x = (idx % cols) * self.block_width;
        let y = (idx / cols) * self.block_height;
        Tile::new(
            (x, y),
            (
                clipped(x, self.block_width, self.width),
                clipped(y, self.block_height, self.height),
            ),
        )
    }
}
