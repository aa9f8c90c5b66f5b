//! Common traits shared between the registry client and the image commands
//!
//! The image commands are written against [`ImageRegistry`] rather than the
//! HTTP client, so the orchestration logic can run against any implementation.

use crate::error::Result;
use crate::registry::auth::RegistryCredential;
use async_trait::async_trait;

/// A tag that was removed, with the digest it pointed to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletedTag {
    pub tag: String,
    pub digest: String,
}

/// Registry endpoints used to list and delete images
#[async_trait]
pub trait ImageRegistry: Send + Sync {
    async fn list_repositories(&self, credential: &RegistryCredential) -> Result<Vec<String>>;

    async fn list_tags(&self, repository: &str, credential: &RegistryCredential) -> Result<Vec<String>>;

    async fn resolve_digest(
        &self,
        repository: &str,
        tag: &str,
        credential: &RegistryCredential,
    ) -> Result<String>;

    async fn delete_manifest(
        &self,
        repository: &str,
        tag: &str,
        digest: &str,
        credential: &RegistryCredential,
    ) -> Result<()>;

    async fn trigger_gc(&self, credential: &RegistryCredential) -> Result<()>;

    /// Delete one tag: resolve it to a digest, then delete by digest.
    ///
    /// Deletion is always digest-addressed, since several tags may share a manifest.
    async fn delete_tag(
        &self,
        repository: &str,
        tag: &str,
        credential: &RegistryCredential,
    ) -> Result<DeletedTag> {
        let digest = self.resolve_digest(repository, tag, credential).await?;
        self.delete_manifest(repository, tag, &digest, credential).await?;
        Ok(DeletedTag {
            tag: tag.to_string(),
            digest,
        })
    }
}
