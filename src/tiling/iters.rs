use super::TileConfig;
use crate::geometry::Tile;
use std::{iter::*, ops::Range};

impl<'a> IntoIterator for &'a TileConfig {
    type Item = Tile;
    type IntoIter = Map<Range<usize>, Box<dyn Fn(usize) -> Tile + 'a>>;

    fn into_iter(self) -> Self::IntoIter {
        let (count, func) = self.iter_mapper();
        (0..count).map(Box::new(func))
    }
}

impl TileConfig {
    pub(super) fn iter_mapper<'a>(&'a self) -> (usize, impl Fn(usize) -> Tile + 'a) {
        debug_assert!(
            self.block_width > 0 && self.block_height > 0,
            "TileConfig preconditions failed"
        );
        (self.len(), move |i| self.tile(i))
    }

    /// Create an [ `ExactSizeIterator` ] over the tiles.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = Tile> + '_ {
        let (count, func) = self.iter_mapper();
        (0..count).map(func)
    }
}
