pub mod utils;
pub use anyhow::{Error, Result};

pub mod proc;
pub use proc::*;

pub mod cli;
pub mod pool;
