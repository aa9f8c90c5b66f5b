//! Command line interface module
//!
//! Argument parsing with environment fallbacks, and the runner that executes
//! the `images list` and `images delete` commands.

pub mod args;
pub mod runner;

pub use args::{Args, Command, ImagesCommand};
pub use runner::Runner;
