//! Garbage collection trigger (PUT /v2/gc/manifests)
//!
//! Deleting a manifest only drops the reference; storage is reclaimed by a
//! separate, registry-wide collection pass that this request schedules.

use crate::error::handlers::NetworkErrorHandler;
use crate::error::{RegistryError, Result, status_parts};
use crate::registry::auth::RegistryCredential;
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use tracing::debug;

#[derive(Clone)]
pub struct GcOperations {
    client: Client,
    address: String,
}

impl GcOperations {
    pub fn new(client: Client, address: String) -> Self {
        Self { client, address }
    }

    pub async fn trigger_gc(&self, credential: &RegistryCredential) -> Result<()> {
        let url = format!("{}/v2/gc/manifests", self.address);
        debug!(url = %url, "triggering garbage collection");

        let response = self
            .client
            .put(&url)
            .header(AUTHORIZATION, credential.authorization_header())
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| NetworkErrorHandler::handle_network_error(&e, "garbage collection"))?;

        let status = response.status();
        debug!(status = %status, "garbage collection response");
        if status.is_success() {
            Ok(())
        } else {
            let (status, status_text) = status_parts(status);
            Err(RegistryError::GarbageCollectionFailed { status, status_text })
        }
    }
}
