//! Shared traits and helpers

pub mod traits;
pub mod utils;

pub use traits::{DeletedTag, ImageRegistry};
pub use utils::NameUtils;
