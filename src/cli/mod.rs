//! CLI argument parsing for FitLock.

mod args;

pub use args::{parse_args, Args};
