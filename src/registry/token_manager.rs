//! Credential management for one command invocation
//!
//! The credential is issued lazily on first use and re-issued once its known
//! expiry has passed.

use crate::error::Result;
use crate::logging::Logger;
use crate::registry::auth::{CredentialProvider, CredentialRequest, RegistryCredential};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Holds the current credential and refreshes it from its provider
#[derive(Clone)]
pub struct CredentialManager {
    provider: Arc<dyn CredentialProvider>,
    request: CredentialRequest,
    current: Arc<Mutex<Option<RegistryCredential>>>,
    output: Logger,
}

impl CredentialManager {
    pub fn new(provider: Arc<dyn CredentialProvider>, request: CredentialRequest, output: Logger) -> Self {
        Self {
            provider,
            request,
            current: Arc::new(Mutex::new(None)),
            output,
        }
    }

    /// Get a credential that has not expired, issuing a new one if needed
    pub async fn credential(&self) -> Result<RegistryCredential> {
        let mut guard = self.current.lock().await;

        match guard.as_ref() {
            Some(credential) if !credential.is_expired() => return Ok(credential.clone()),
            Some(_) => self.output.verbose("Registry credential expired, requesting a new one"),
            None => self.output.verbose(&format!(
                "Requesting {}-minute registry credential for {}",
                self.request.expiration_minutes, self.request.domain
            )),
        }

        let credential = self.provider.issue(&self.request).await?;
        *guard = Some(credential.clone());
        Ok(credential)
    }
}
