//! Manifest operations for registry client
//!
//! Implements the manifest endpoints used to remove tags:
//! - Digest resolution (HEAD /v2/{name}/manifests/{tag})
//! - Digest-addressed deletion (DELETE /v2/{name}/manifests/{digest})
//!
//! Both requests accept OCI and Docker v2 manifests, since a registry may
//! store either.

use crate::error::handlers::NetworkErrorHandler;
use crate::error::{RegistryError, Result, status_parts};
use crate::logging::Logger;
use crate::registry::auth::RegistryCredential;
use reqwest::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use tracing::debug;

/// Accept list sent with every manifest request
pub const MANIFEST_ACCEPT: &str =
    "application/vnd.oci.image.manifest.v1+json, application/vnd.docker.distribution.manifest.v2+json";

/// Response header carrying the manifest digest
pub const DIGEST_HEADER: &str = "Docker-Content-Digest";

#[derive(Clone)]
pub struct ManifestOperations {
    client: Client,
    address: String,
    output: Logger,
}

impl ManifestOperations {
    pub fn new(client: Client, address: String, output: Logger) -> Self {
        Self {
            client,
            address,
            output,
        }
    }

    /// Resolve a tag to its manifest digest without downloading the manifest
    pub async fn resolve_digest(
        &self,
        repository: &str,
        tag: &str,
        credential: &RegistryCredential,
    ) -> Result<String> {
        let url = format!("{}/v2/{}/manifests/{}", self.address, repository, tag);
        debug!(url = %url, "resolving manifest digest");

        let response = self
            .client
            .head(&url)
            .header(AUTHORIZATION, credential.authorization_header())
            .header(ACCEPT, MANIFEST_ACCEPT)
            .send()
            .await
            .map_err(|e| NetworkErrorHandler::handle_network_error(&e, "digest resolution"))?;

        let status = response.status();
        debug!(status = %status, repository, tag, "manifest head response");
        if !status.is_success() {
            let (status, status_text) = status_parts(status);
            return Err(RegistryError::TagResolutionFailed {
                repository: repository.to_string(),
                tag: tag.to_string(),
                status,
                status_text,
            });
        }

        let digest = response
            .headers()
            .get(DIGEST_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| RegistryError::DigestMissing {
                repository: repository.to_string(),
                tag: tag.to_string(),
            })?;

        self.output
            .detail(&format!("{}:{} resolves to {}", repository, tag, digest));
        Ok(digest.to_string())
    }

    /// Delete the manifest a tag points to, addressed by digest
    pub async fn delete_manifest(
        &self,
        repository: &str,
        tag: &str,
        digest: &str,
        credential: &RegistryCredential,
    ) -> Result<()> {
        let url = format!("{}/v2/{}/manifests/{}", self.address, repository, digest);
        debug!(url = %url, "deleting manifest");

        let response = self
            .client
            .delete(&url)
            .header(AUTHORIZATION, credential.authorization_header())
            .header(ACCEPT, MANIFEST_ACCEPT)
            .send()
            .await
            .map_err(|e| NetworkErrorHandler::handle_network_error(&e, "manifest deletion"))?;

        let status = response.status();
        debug!(status = %status, repository, digest, "manifest delete response");
        if !status.is_success() {
            let (status, status_text) = status_parts(status);
            return Err(RegistryError::TagDeletionFailed {
                repository: repository.to_string(),
                tag: tag.to_string(),
                digest: digest.to_string(),
                status,
                status_text,
            });
        }

        Ok(())
    }
}
