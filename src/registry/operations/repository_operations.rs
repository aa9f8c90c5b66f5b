//! Repository operations for registry client
//!
//! Implements the read side of the registry catalog:
//! - Repository listing (GET /v2/_catalog)
//! - Tag listing (GET /v2/{name}/tags/list)

use crate::error::handlers::NetworkErrorHandler;
use crate::error::{RegistryError, Result, status_parts};
use crate::logging::Logger;
use crate::registry::auth::RegistryCredential;
use reqwest::Client;
use reqwest::header::AUTHORIZATION;
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct CatalogResponse {
    #[serde(default)]
    repositories: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    tags: Option<Vec<String>>,
}

#[derive(Clone)]
pub struct RepositoryOperations {
    client: Client,
    address: String,
    output: Logger,
}

impl RepositoryOperations {
    pub fn new(client: Client, address: String, output: Logger) -> Self {
        Self {
            client,
            address,
            output,
        }
    }

    /// List every repository name in the registry catalog
    pub async fn list_repositories(&self, credential: &RegistryCredential) -> Result<Vec<String>> {
        let url = format!("{}/v2/_catalog", self.address);
        debug!(url = %url, "listing repositories");

        let response = self
            .client
            .get(&url)
            .header(AUTHORIZATION, credential.authorization_header())
            .send()
            .await
            .map_err(|e| NetworkErrorHandler::handle_network_error(&e, "repository listing"))?;

        let status = response.status();
        debug!(status = %status, "catalog response");
        if !status.is_success() {
            let (status, status_text) = status_parts(status);
            return Err(RegistryError::CatalogUnavailable { status, status_text });
        }

        let catalog: CatalogResponse = response
            .json()
            .await
            .map_err(|e| NetworkErrorHandler::handle_network_error(&e, "repository listing"))?;

        let repositories = catalog.repositories.unwrap_or_default();
        self.output
            .verbose(&format!("Found {} repositories", repositories.len()));
        Ok(repositories)
    }

    /// List all tags in repository using Docker Registry v2 API
    pub async fn list_tags(&self, repository: &str, credential: &RegistryCredential) -> Result<Vec<String>> {
        let url = format!("{}/v2/{}/tags/list", self.address, repository);
        debug!(url = %url, "listing tags");

        let response = self
            .client
            .get(&url)
            .header(AUTHORIZATION, credential.authorization_header())
            .send()
            .await
            .map_err(|e| NetworkErrorHandler::handle_network_error(&e, "tag listing"))?;

        let status = response.status();
        debug!(status = %status, repository, "tags response");
        if !status.is_success() {
            let (status, status_text) = status_parts(status);
            return Err(RegistryError::TagListUnavailable {
                repository: repository.to_string(),
                status,
                status_text,
            });
        }

        let tags_response: TagsResponse = response
            .json()
            .await
            .map_err(|e| NetworkErrorHandler::handle_network_error(&e, "tag listing"))?;

        let tags = tags_response.tags.unwrap_or_default();
        self.output.verbose(&format!(
            "Found {} tags for repository {}",
            tags.len(),
            repository
        ));
        Ok(tags)
    }
}
