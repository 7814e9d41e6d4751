/// Raster dimensions as `(columns, rows)`, the order used
/// by GDAL.
pub type RasterDims = (usize, usize);

/// Pixel offset as `(x, y)`.
pub type RasterOffset = (isize, isize);

/// A rectangular window of a raster.
///
/// `origin` is the `(x, y)` pixel of the top-left corner
/// and `size` is `(cols, rows)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tile {
    pub origin: (usize, usize),
    pub size: RasterDims,
}

impl Tile {
    pub fn new(origin: (usize, usize), size: RasterDims) -> Self {
        Tile { origin, size }
    }

    /// Window spanning a whole raster.
    pub fn full(dims: RasterDims) -> Self {
        Tile::new((0, 0), dims)
    }

    #[inline]
    pub fn area(&self) -> usize {
        self.size.0 * self.size.1
    }

    /// Offset in the form expected by GDAL reads.
    #[inline]
    pub fn offset(&self) -> RasterOffset {
        (self.origin.0 as isize, self.origin.1 as isize)
    }

    /// Whether the window lies fully inside a raster of the
    /// given dimensions.
    pub fn fits_within(&self, dims: RasterDims) -> bool {
        let (x, y) = self.origin;
        let (cols, rows) = self.size;
        x.checked_add(cols).map_or(false, |end| end <= dims.0)
            && y.checked_add(rows).map_or(false, |end| end <= dims.1)
    }
}

use std::fmt;
impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "@ ({},{}) of dimension ({}x{})",
            self.origin.0, self.origin.1, self.size.0, self.size.1
        )
    }
}
