//! Bin edges for grouping pixels by value.

use std::cmp::Ordering;

/// Whether `val` is a nodata pixel for a raster with the
/// given sentinel. NaN always counts as nodata.
#[inline]
pub fn is_nodata(val: f64, nodata: Option<f64>) -> bool {
    val.is_nan() || nodata.map_or(false, |nd| val == nd)
}

/// The sorted set of distinct values found in a buffer,
/// excluding nodata.
///
/// When every value is nodata the set would be empty; a
/// single placeholder bin stands in for it so the tile
/// flows through aggregation contributing nothing. The
/// placeholder never matches a value.
#[derive(Clone, Debug, PartialEq)]
pub struct Bins {
    edges: Vec<f64>,
    placeholder: bool,
}

impl Bins {
    pub fn from_values<I>(values: I, nodata: Option<f64>) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let mut edges: Vec<f64> = values
            .into_iter()
            .filter(|&v| !is_nodata(v, nodata))
            .collect();
        // NaN was filtered above
        edges.sort_unstable_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
        edges.dedup();

        if edges.is_empty() {
            Bins::placeholder()
        } else {
            Bins {
                edges,
                placeholder: false,
            }
        }
    }

    pub fn placeholder() -> Self {
        Bins {
            edges: vec![0.],
            placeholder: true,
        }
    }

    #[inline]
    pub fn is_placeholder(&self) -> bool {
        self.placeholder
    }

    /// The bin edges. Holds one synthetic edge for a
    /// placeholder.
    #[inline]
    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Index of the bin holding `val`, if any.
    #[inline]
    pub fn bin_for(&self, val: f64) -> Option<usize> {
        if self.placeholder || val.is_nan() {
            return None;
        }
        self.edges
            .binary_search_by(|e| e.partial_cmp(&val).unwrap_or(Ordering::Less))
            .ok()
    }
}
