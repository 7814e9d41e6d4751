//! Read rectangular windows from single-band rasters.
//!
//! [`WindowReader`] abstracts the source so that the sweep
//! runs unchanged over a GDAL dataset ([`RasterHandle`]) or
//! an in-memory grid ([`MemRaster`]).

use ndarray::Array2;

use crate::geometry::{RasterDims, Tile};
use crate::{Error, Result};

/// Abstracts reading windows from a single-band raster.
pub trait WindowReader {
    /// Raster size as `(cols, rows)`.
    fn dims(&self) -> RasterDims;

    /// Nodata sentinel, if the raster declares one.
    fn nodata(&self) -> Option<f64>;

    /// Block size the raster is stored in, as `(cols, rows)`.
    fn native_block_size(&self) -> RasterDims;

    /// Read `window` into `out`, in row-major order. `out`
    /// must hold exactly `window.area()` values, and the
    /// window has already been checked to fit the raster.
    fn read_into_slice(&self, out: &mut [f64], window: Tile) -> Result<()>;

    /// Read `window` as an array of shape `(rows, cols)`.
    /// Windows reaching outside the raster are rejected
    /// with [`Error::Bounds`].
    fn read_window(&self, window: Tile) -> Result<Array2<f64>> {
        check_window(window, self.dims())?;

        let mut buf = vec![0.; window.area()];
        self.read_into_slice(&mut buf[..], window)?;
        Array2::from_shape_vec((window.size.1, window.size.0), buf)
            .map_err(|e| Error::io(format!("shaping window {}", window), e))
    }
}

impl<'a, R: WindowReader + ?Sized> WindowReader for &'a R {
    fn dims(&self) -> RasterDims {
        (**self).dims()
    }
    fn nodata(&self) -> Option<f64> {
        (**self).nodata()
    }
    fn native_block_size(&self) -> RasterDims {
        (**self).native_block_size()
    }
    fn read_into_slice(&self, out: &mut [f64], window: Tile) -> Result<()> {
        (**self).read_into_slice(out, window)
    }
}

/// Reject windows that do not fit within `dims`.
pub fn check_window(window: Tile, dims: RasterDims) -> Result<()> {
    if window.fits_within(dims) {
        Ok(())
    } else {
        Err(Error::Bounds { window, dims })
    }
}

/// A raster held in memory. Mostly useful to test sweeps,
/// or to aggregate data that was produced in-process.
#[derive(Clone, Debug)]
pub struct MemRaster {
    data: Array2<f64>,
    nodata: Option<f64>,
    block_size: RasterDims,
}

impl MemRaster {
    /// Wrap an array of shape `(rows, cols)`. The block size
    /// defaults to whole rows, as in a striped GeoTIFF.
    pub fn new(data: Array2<f64>) -> Self {
        let (_, cols) = data.dim();
        MemRaster {
            data,
            nodata: None,
            block_size: (cols.max(1), 1),
        }
    }

    /// Build from row-major rows. All rows must have the same
    /// length.
    pub fn from_rows<T, R>(rows: &[R]) -> Result<Self>
    where
        T: Copy + Into<f64>,
        R: AsRef<[T]>,
    {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.as_ref().len());
        let mut values = Vec::with_capacity(width * height);
        for row in rows {
            let row = row.as_ref();
            if row.len() != width {
                return Err(Error::config("ragged rows in in-memory raster"));
            }
            values.extend(row.iter().map(|&v| v.into()));
        }
        let data = Array2::from_shape_vec((height, width), values)
            .map_err(|e| Error::io("shaping in-memory raster", e))?;
        Ok(MemRaster::new(data))
    }

    pub fn with_nodata(mut self, nodata: Option<f64>) -> Self {
        self.nodata = nodata;
        self
    }

    pub fn with_block_size(mut self, block_size: RasterDims) -> Self {
        self.block_size = block_size;
        self
    }
}

impl WindowReader for MemRaster {
    fn dims(&self) -> RasterDims {
        let (rows, cols) = self.data.dim();
        (cols, rows)
    }
    fn nodata(&self) -> Option<f64> {
        self.nodata
    }
    fn native_block_size(&self) -> RasterDims {
        self.block_size
    }
    fn read_into_slice(&self, out: &mut [f64], window: Tile) -> Result<()> {
        use ndarray::s;
        let (x, y) = window.origin;
        let (cols, rows) = window.size;
        let view = self.data.slice(s![y..y + rows, x..x + cols]);
        for (o, v) in out.iter_mut().zip(view.iter()) {
            *o = *v;
        }
        Ok(())
    }
}

#[cfg(feature = "gdal")]
pub use self::gdal_reader::RasterHandle;

#[cfg(feature = "gdal")]
mod gdal_reader {
    use super::*;
    use crate::error::IoContext;
    use gdal::raster::GdalType;
    use gdal::Dataset;
    use std::path::{Path, PathBuf};

    /// An open single-band raster dataset. Reads always use
    /// the first band.
    ///
    /// A `RasterHandle` is `Send` but not `Sync`: open one per
    /// thread for parallel sweeps.
    pub struct RasterHandle {
        path: PathBuf,
        ds: Dataset,
        dims: RasterDims,
        nodata: Option<f64>,
        block_size: RasterDims,
    }

    impl RasterHandle {
        /// Open the raster at `path`. Fails if it cannot be
        /// read or has no bands.
        pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
            let path = path.as_ref();
            let ds = Dataset::open(path)
                .io_context(|| format!("opening raster {}", path.display()))?;
            if ds.raster_count() < 1 {
                return Err(Error::io(
                    format!("opening raster {}", path.display()),
                    "dataset has no raster bands",
                ));
            }

            let (dims, nodata, block_size) = {
                let band = ds
                    .rasterband(1)
                    .io_context(|| format!("opening band 1 of {}", path.display()))?;
                (band.size(), band.no_data_value(), band.block_size())
            };

            Ok(RasterHandle {
                path: path.to_path_buf(),
                ds,
                dims,
                nodata,
                block_size,
            })
        }

        pub fn path(&self) -> &Path {
            &self.path
        }

        /// Read a window in a caller chosen numeric type,
        /// converted by GDAL from the raster's native type.
        pub fn read_window_as<T>(&self, window: Tile) -> Result<Array2<T>>
        where
            T: GdalType + Copy + Default,
        {
            check_window(window, self.dims)?;
            let mut buf = vec![T::default(); window.area()];
            self.read_slice(&mut buf[..], window)?;
            Array2::from_shape_vec((window.size.1, window.size.0), buf)
                .map_err(|e| Error::io(format!("shaping window {}", window), e))
        }

        fn read_slice<T>(&self, out: &mut [T], window: Tile) -> Result<()>
        where
            T: GdalType + Copy,
        {
            let band = self
                .ds
                .rasterband(1)
                .io_context(|| format!("opening band 1 of {}", self.path.display()))?;
            band.read_into_slice(window.offset(), window.size, window.size, out, None)
                .io_context(|| format!("reading window {} of {}", window, self.path.display()))
        }
    }

    impl WindowReader for RasterHandle {
        fn dims(&self) -> RasterDims {
            self.dims
        }
        fn nodata(&self) -> Option<f64> {
            self.nodata
        }
        fn native_block_size(&self) -> RasterDims {
            self.block_size
        }
        fn read_into_slice(&self, out: &mut [f64], window: Tile) -> Result<()> {
            self.read_slice(out, window)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mem_raster_windows() {
        let raster = MemRaster::from_rows(&[[1u8, 2, 3], [4, 5, 6]]).unwrap();
        assert_eq!(raster.dims(), (3, 2));
        assert_eq!(raster.native_block_size(), (3, 1));

        let win = raster.read_window(Tile::new((1, 0), (2, 2))).unwrap();
        assert_eq!(win, ndarray::arr2(&[[2., 3.], [5., 6.]]));
    }

    #[test]
    fn out_of_bounds_window() {
        let raster = MemRaster::from_rows(&[[1u8, 2, 3], [4, 5, 6]]).unwrap();
        match raster.read_window(Tile::new((2, 1), (2, 1))) {
            Err(Error::Bounds { window, dims }) => {
                assert_eq!(window, Tile::new((2, 1), (2, 1)));
                assert_eq!(dims, (3, 2));
            }
            other => panic!("expected bounds error, got {:?}", other.map(|a| a.dim())),
        }
    }

    #[test]
    fn ragged_rows_rejected() {
        let rows: Vec<Vec<f64>> = vec![vec![1., 2.], vec![3.]];
        assert!(MemRaster::from_rows(&rows).is_err());
    }

    #[cfg(feature = "gdal")]
    #[test]
    fn open_missing_raster() {
        let err = RasterHandle::open("/nonexistent/raster.tif")
            .err()
            .expect("opening a missing raster should fail");
        assert!(matches!(err, Error::Io { .. }));
    }

    #[cfg(feature = "gdal")]
    #[test]
    fn geotiff_window_read() -> Result<()> {
        use crate::error::IoContext;
        use gdal::raster::Buffer;
        use gdal::DriverManager;
        use tempdir::TempDir;

        const WIDTH: usize = 16;
        const HEIGHT: usize = 32;

        let tmp_dir = TempDir::new("zonestats_test").unwrap();
        let path = tmp_dir.path().join("grid.tif");

        {
            let driver = DriverManager::get_driver_by_name("GTiff").io_context(|| "GTiff driver")?;
            let ds = driver
                .create_with_band_type::<f32, _>(&path, WIDTH as isize, HEIGHT as isize, 1)
                .io_context(|| "creating test raster")?;
            let mut band = ds.rasterband(1).io_context(|| "band")?;
            band.set_no_data_value(Some(-99999.))
                .io_context(|| "setting nodata")?;
            let data: Vec<f32> = (0..WIDTH * HEIGHT).map(|v| v as f32).collect();
            band.write((0, 0), (WIDTH, HEIGHT), &Buffer::new((WIDTH, HEIGHT), data))
                .io_context(|| "writing test raster")?;
        }

        let handle = RasterHandle::open(&path)?;
        assert_eq!(handle.dims(), (WIDTH, HEIGHT));
        assert_eq!(handle.nodata(), Some(-99999.));

        let win = handle.read_window(Tile::new((3, 2), (2, 2)))?;
        let x0 = (2 * WIDTH + 3) as f64;
        assert_eq!(
            win,
            ndarray::arr2(&[[x0, x0 + 1.], [x0 + WIDTH as f64, x0 + WIDTH as f64 + 1.]])
        );

        let ints = handle.read_window_as::<i32>(Tile::new((0, 0), (2, 1)))?;
        assert_eq!(ints, ndarray::arr2(&[[0, 1]]));

        assert!(matches!(
            handle.read_window(Tile::new((15, 0), (2, 1))),
            Err(Error::Bounds { .. })
        ));
        Ok(())
    }
}
