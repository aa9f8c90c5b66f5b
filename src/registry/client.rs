// RegistryClient talks to an OCI-distribution registry over HTTP. It owns a
// single reqwest client and a normalised base address, and exposes the
// catalog, manifest and garbage-collection endpoints through ImageRegistry.
// Credentials are passed into every call, never stored on the client.

use crate::common::ImageRegistry;
use crate::error::{RegistryError, Result};
use crate::logging::Logger;
use crate::registry::auth::RegistryCredential;
use crate::registry::operations::{GcOperations, ManifestOperations, RepositoryOperations};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Default transport timeout for a single request
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub struct RegistryClientBuilder {
    address: String,
    timeout: u64,
    skip_tls: bool,
    output: Logger,
}

impl RegistryClientBuilder {
    pub fn new(address: String) -> Self {
        Self {
            address,
            timeout: DEFAULT_TIMEOUT_SECS,
            skip_tls: false,
            output: Logger::default(),
        }
    }

    pub fn with_timeout(mut self, timeout: u64) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_skip_tls(mut self, skip_tls: bool) -> Self {
        self.skip_tls = skip_tls;
        self
    }

    pub fn with_output(mut self, output: Logger) -> Self {
        self.output = output;
        self
    }

    pub fn build(self) -> Result<RegistryClient> {
        let address = normalize_address(&self.address)?;

        let mut builder = Client::builder().timeout(Duration::from_secs(self.timeout));
        if self.skip_tls {
            builder = builder
                .danger_accept_invalid_certs(true)
                .danger_accept_invalid_hostnames(true);
        }
        let client = builder
            .build()
            .map_err(|e| RegistryError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(RegistryClient {
            repositories: RepositoryOperations::new(
                client.clone(),
                address.clone(),
                self.output.clone(),
            ),
            manifests: ManifestOperations::new(client.clone(), address.clone(), self.output),
            gc: GcOperations::new(client.clone(), address.clone()),
            client,
            address,
        })
    }
}

/// Reduce a registry URL to `scheme://host[:port]`
pub fn normalize_address(address: &str) -> Result<String> {
    let with_scheme = if address.contains("://") {
        address.to_string()
    } else {
        format!("https://{}", address)
    };

    let url = Url::parse(&with_scheme)?;
    let host = url.host_str().ok_or_else(|| {
        RegistryError::Configuration(format!("Registry URL has no host: {}", address))
    })?;

    Ok(match url.port() {
        Some(port) => format!("{}://{}:{}", url.scheme(), host, port),
        None => format!("{}://{}", url.scheme(), host),
    })
}

#[derive(Clone)]
pub struct RegistryClient {
    client: Client,
    address: String,
    repositories: RepositoryOperations,
    manifests: ManifestOperations,
    gc: GcOperations,
}

impl RegistryClient {
    pub fn builder(address: String) -> RegistryClientBuilder {
        RegistryClientBuilder::new(address)
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Underlying HTTP client, shared with the credential service
    pub fn http_client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl ImageRegistry for RegistryClient {
    async fn list_repositories(&self, credential: &RegistryCredential) -> Result<Vec<String>> {
        self.repositories.list_repositories(credential).await
    }

    async fn list_tags(&self, repository: &str, credential: &RegistryCredential) -> Result<Vec<String>> {
        self.repositories.list_tags(repository, credential).await
    }

    async fn resolve_digest(
        &self,
        repository: &str,
        tag: &str,
        credential: &RegistryCredential,
    ) -> Result<String> {
        self.manifests.resolve_digest(repository, tag, credential).await
    }

    async fn delete_manifest(
        &self,
        repository: &str,
        tag: &str,
        digest: &str,
        credential: &RegistryCredential,
    ) -> Result<()> {
        self.manifests
            .delete_manifest(repository, tag, digest, credential)
            .await
    }

    async fn trigger_gc(&self, credential: &RegistryCredential) -> Result<()> {
        self.gc.trigger_gc(credential).await
    }
}
