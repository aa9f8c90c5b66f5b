//! Registry credentials and the providers that issue them
//!
//! Every registry request carries `Authorization: Basic base64("v1:" + password)`.
//! The password itself comes from a [`CredentialProvider`]: either a static value
//! from configuration or a short-lived one issued by a credential service.

use crate::error::{RegistryError, Result};
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};
use tracing::debug;

/// Lifetime requested for list and delete flows
pub const DEFAULT_EXPIRATION_MINUTES: u32 = 5;

/// Username the registry expects alongside an issued password
const CREDENTIAL_USERNAME: &str = "v1";

/// Treat a credential as expired slightly before its nominal deadline
const EXPIRY_SKEW: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    Pull,
    Push,
}

/// What to ask a credential provider for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialRequest {
    pub domain: String,
    pub expiration_minutes: u32,
    pub permissions: Vec<Permission>,
}

impl CredentialRequest {
    /// Pull and push access with the default lifetime
    pub fn pull_push(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            expiration_minutes: DEFAULT_EXPIRATION_MINUTES,
            permissions: vec![Permission::Pull, Permission::Push],
        }
    }

    pub fn lifetime(&self) -> Duration {
        Duration::from_secs(u64::from(self.expiration_minutes) * 60)
    }
}

/// Short-lived registry credential, held for one command invocation
#[derive(Clone)]
pub struct RegistryCredential {
    password: String,
    permissions: Vec<Permission>,
    /// `None` for a configured password, which never expires
    expires_at: Option<Instant>,
}

impl RegistryCredential {
    pub fn new(password: impl Into<String>, permissions: Vec<Permission>, lifetime: Duration) -> Self {
        Self {
            password: password.into(),
            permissions,
            expires_at: Some(Instant::now() + lifetime),
        }
    }

    /// Credential for a password that stays valid for the whole run
    pub fn unbounded(password: impl Into<String>, permissions: Vec<Permission>) -> Self {
        Self {
            password: password.into(),
            permissions,
            expires_at: None,
        }
    }

    /// Value for the `Authorization: Basic` header
    pub fn basic_token(&self) -> String {
        STANDARD.encode(format!("{}:{}", CREDENTIAL_USERNAME, self.password))
    }

    pub fn authorization_header(&self) -> String {
        format!("Basic {}", self.basic_token())
    }

    pub fn permissions(&self) -> &[Permission] {
        &self.permissions
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at
            .is_some_and(|deadline| Instant::now() + EXPIRY_SKEW >= deadline)
    }
}

impl fmt::Debug for RegistryCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryCredential")
            .field("password", &"<redacted>")
            .field("permissions", &self.permissions)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Source of registry credentials
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn issue(&self, request: &CredentialRequest) -> Result<RegistryCredential>;
}

/// Password supplied directly by configuration
#[derive(Clone)]
pub struct StaticCredentialProvider {
    password: String,
}

impl StaticCredentialProvider {
    pub fn new(password: impl Into<String>) -> Self {
        Self {
            password: password.into(),
        }
    }
}

#[async_trait]
impl CredentialProvider for StaticCredentialProvider {
    async fn issue(&self, request: &CredentialRequest) -> Result<RegistryCredential> {
        if self.password.is_empty() {
            return Err(RegistryError::Credential(
                "Registry password is empty".to_string(),
            ));
        }
        Ok(RegistryCredential::unbounded(
            self.password.clone(),
            request.permissions.clone(),
        ))
    }
}

#[derive(Debug, Serialize)]
struct GenerateCredentialsRequest<'a> {
    expiration_minutes: u32,
    permissions: &'a [Permission],
}

#[derive(Debug, Deserialize)]
struct GenerateCredentialsResponse {
    password: Option<String>,
}

/// Credentials issued by a registry credential service
///
/// `POST {api_url}/registries/{domain}/generate_credentials` with a bearer API
/// token, answering with `{"password": "..."}`.
#[derive(Clone)]
pub struct HttpCredentialProvider {
    client: Client,
    api_url: String,
    api_token: String,
}

impl HttpCredentialProvider {
    pub fn new(client: Client, api_url: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            api_token: api_token.into(),
        }
    }
}

#[async_trait]
impl CredentialProvider for HttpCredentialProvider {
    async fn issue(&self, request: &CredentialRequest) -> Result<RegistryCredential> {
        let url = format!(
            "{}/registries/{}/generate_credentials",
            self.api_url, request.domain
        );
        debug!(url = %url, minutes = request.expiration_minutes, "requesting registry credentials");

        let body = GenerateCredentialsRequest {
            expiration_minutes: request.expiration_minutes,
            permissions: &request.permissions,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| RegistryError::Credential(format!("Failed to reach credential service: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RegistryError::Credential(format!(
                "Credential service rejected the request for {}: {} {}",
                request.domain,
                status.as_u16(),
                status.canonical_reason().unwrap_or_default()
            )));
        }

        let issued: GenerateCredentialsResponse = response
            .json()
            .await
            .map_err(|e| RegistryError::Credential(format!("Invalid credential response: {}", e)))?;

        let password = issued
            .password
            .filter(|password| !password.is_empty())
            .ok_or_else(|| {
                RegistryError::Credential("Credential response did not contain a password".to_string())
            })?;

        Ok(RegistryCredential::new(
            password,
            request.permissions.clone(),
            request.lifetime(),
        ))
    }
}
