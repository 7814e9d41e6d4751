use crate::geometry::RasterDims;
use crate::reader::WindowReader;
use crate::{Error, Result};

use super::TileConfig;

/// Constructors
impl TileConfig {
    /// Construct a `TileConfig` for a raster of size `dims`
    /// cut into blocks of size `block`. Both are given as
    /// `(cols, rows)`. Fails if either block dimension is
    /// zero.
    pub fn new(dims: RasterDims, block: RasterDims) -> Result<Self> {
        check_block_size(block)?;
        Ok(TileConfig {
            width: dims.0,
            height: dims.1,

            block_width: block.0,
            block_height: block.1,
        })
    }

    /// Construct a `TileConfig` from a raster, using its
    /// size and native block size.
    pub fn for_reader<R: WindowReader + ?Sized>(reader: &R) -> Result<Self> {
        TileConfig::new(reader.dims(), reader.native_block_size())
    }
}

/// Builder methods to configure the parameters
impl TileConfig {
    /// Override the block size, e.g. to trade memory for
    /// fewer reads.
    pub fn with_block_size(self, block: RasterDims) -> Result<Self> {
        TileConfig::new(self.dims(), block)
    }
}

/// Getter methods to read the parameters of the config
impl TileConfig {
    pub fn width(&self) -> usize {
        self.width
    }
    pub fn height(&self) -> usize {
        self.height
    }
    pub fn dims(&self) -> RasterDims {
        (self.width, self.height)
    }

    pub fn block_size(&self) -> RasterDims {
        (self.block_width, self.block_height)
    }
}

fn check_block_size(block: RasterDims) -> Result<()> {
    if block.0 < 1 || block.1 < 1 {
        return Err(Error::config(format!(
            "tile size must be at least 1x1 (got {}x{})",
            block.0, block.1
        )));
    }
    Ok(())
}
