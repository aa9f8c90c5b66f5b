//! Registry Images Library
//!
//! Lists repositories and tags in a Docker Registry HTTP API v2 registry,
//! deletes single tags or whole repositories, and requests garbage collection
//! once a deletion has completed.

pub mod cli;
pub mod common;
pub mod config;
pub mod error;
pub mod image;
pub mod logging;
pub mod output;
pub mod registry;

pub use common::{DeletedTag, ImageRegistry};
pub use config::AppConfig;
pub use error::{RegistryError, Result};
pub use logging::Logger;
