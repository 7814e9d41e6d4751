use std::path::PathBuf;
use thiserror::Error;

use crate::geometry::{RasterDims, Tile};

pub type Result<T> = std::result::Result<T, Error>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised while configuring or running a zonal
/// sweep.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid configuration: unknown year, bad tile size,
    /// mismatched raster grids.
    #[error("configuration: {0}")]
    Configuration(String),

    /// A file could not be opened, read or written.
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: BoxError,
    },

    /// A window read that falls outside the raster.
    #[error("window {window} outside raster of dimension {dims:?}")]
    Bounds { window: Tile, dims: RasterDims },

    /// A per-year table needed for the combined series is
    /// absent.
    #[error("missing table for year {year}: {}", .path.display())]
    MissingInput { year: u16, path: PathBuf },
}

impl Error {
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Configuration(msg.into())
    }

    pub fn io<C, E>(context: C, source: E) -> Self
    where
        C: Into<String>,
        E: Into<BoxError>,
    {
        Error::Io {
            context: context.into(),
            source: source.into(),
        }
    }
}

/// Attach a context string to fallible I/O, in the manner
/// of `anyhow::Context`.
pub trait IoContext<T> {
    fn io_context<C, F>(self, f: F) -> Result<T>
    where
        C: Into<String>,
        F: FnOnce() -> C;
}

impl<T, E> IoContext<T> for std::result::Result<T, E>
where
    E: Into<BoxError>,
{
    fn io_context<C, F>(self, f: F) -> Result<T>
    where
        C: Into<String>,
        F: FnOnce() -> C,
    {
        self.map_err(|e| Error::io(f(), e))
    }
}
