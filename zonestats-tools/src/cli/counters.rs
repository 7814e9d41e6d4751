use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Default)]
pub struct Counter {
    val: AtomicUsize,
}
impl Counter {
    pub fn load(&self) -> usize {
        self.val.load(Ordering::Acquire)
    }

    pub fn store(&self, val: usize) {
        self.val.store(val, Ordering::Release);
    }

    pub fn fetch_add(&self, inc: usize) -> usize {
        self.val.fetch_add(inc, Ordering::AcqRel)
    }
}
impl fmt::Display for Counter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.load())
    }
}

/// Tiles swept out of the total, for the year in progress.
#[derive(Debug, Default)]
pub struct TileCounter {
    pub year: Counter,
    pub total: Counter,
    pub processed: Counter,
}
impl TileCounter {
    /// Start counting a new year's sweep.
    pub fn reset(&self, year: u16, total: usize) {
        self.year.store(year as usize);
        self.total.store(total);
        self.processed.store(0);
    }
}
impl fmt::Display for TileCounter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}: completed {} of {} tiles.",
            self.year.load(),
            self.processed.load(),
            self.total.load()
        )
    }
}
