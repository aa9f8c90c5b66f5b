//! Registry operations module - one file per endpoint family
//!
//! `RegistryClient` in client.rs composes these into the public API.

pub mod gc_operations;
pub mod manifest_operations;
pub mod repository_operations;

pub use gc_operations::GcOperations;
pub use manifest_operations::ManifestOperations;
pub use repository_operations::RepositoryOperations;
