use indicatif::{ProgressBar, ProgressStyle};

use super::TileCounter;

/// A progress bar over the tiles of a sweep, labelled by a
/// [`TileCounter`].
pub struct Progress {
    pub bar: ProgressBar,
    pub value: TileCounter,
}
impl Progress {
    pub fn new() -> Self {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40} {msg}"),
        );
        Progress {
            bar,
            value: Default::default(),
        }
    }

    /// Progress that is never drawn, e.g. when stderr is
    /// used for logs only.
    pub fn hidden() -> Self {
        Progress {
            bar: ProgressBar::hidden(),
            value: Default::default(),
        }
    }

    pub fn start(&self, year: u16, total: usize) {
        self.value.reset(year, total);
        self.bar.set_position(0);
        self.bar.set_length(total as u64);
        self.update_progress();
    }

    pub fn increment(&self) {
        self.value.processed.fetch_add(1);
        self.bar.inc(1);
        self.update_progress();
    }

    pub fn update_progress(&self) {
        self.bar.set_message(&format!("{}", self.value));
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
impl Default for Progress {
    fn default() -> Self {
        Progress::new()
    }
}
