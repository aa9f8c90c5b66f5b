//! Image commands: listing and deleting tags in the registry
//!
//! Both commands are generic over [`ImageRegistry`](crate::common::ImageRegistry)
//! and receive credentials explicitly.

pub mod delete;
pub mod list;
pub mod reference;

#[cfg(test)]
pub(crate) mod fake;

pub use delete::{DeleteOptions, DeleteOutcome, GcStatus, ImageDeleter};
pub use list::{ImageLister, ListOptions, RepositoryTags};
pub use reference::ImageReference;
