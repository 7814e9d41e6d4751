pub mod args;
pub mod progress;
pub use progress::Progress;
pub mod counters;
pub use counters::{Counter, TileCounter};

use std::fmt::Display;
#[inline]
pub fn unwrap_or_exit<T, E: Display>(res: Result<T, E>) -> T {
    match res {
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1)
        }
        Ok(t) => t,
    }
}

#[macro_export]
macro_rules! sync_main {
    ($name:expr) => {
        fn main() {
            $crate::cli::unwrap_or_exit({ $name });
        }
    };
}

/// Install a stderr `tracing` subscriber. `RUST_LOG` takes
/// precedence; otherwise each `-v` raises the level from
/// `warn`.
pub fn init_logging(verbosity: u64) {
    use tracing_subscriber::EnvFilter;

    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
