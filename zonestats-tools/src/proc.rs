use crate::cli::*;
use tracing::{debug, info};
use zonestats::engine::{SweepObserver, YearPhase};

/// Reports the engine's progress on a progress bar and in
/// the logs.
pub struct Tracker {
    progress: Progress,
}

impl Tracker {
    pub fn new(show_bar: bool) -> Self {
        let progress = if show_bar {
            Progress::new()
        } else {
            Progress::hidden()
        };
        Tracker { progress }
    }

    pub fn processed(&self) -> usize {
        self.progress.value.processed.load()
    }
}

impl SweepObserver for Tracker {
    fn phase(&self, year: u16, phase: YearPhase) {
        match phase {
            YearPhase::Idle => debug!(year, "opening rasters"),
            YearPhase::Sweeping { tiles } => self.progress.start(year, tiles),
            YearPhase::Finalized { zones } => {
                self.progress.finish();
                info!(year, zones, "sweep finalized");
            }
            YearPhase::Persisted => debug!(year, "persisted"),
        }
    }

    fn tile_done(&self, _year: u16) {
        self.progress.increment();
    }
}

impl Drop for Tracker {
    fn drop(&mut self) {
        self.progress.finish();
    }
}
