//! Configuration module resolving registry address, credentials and transport settings

use crate::cli::args::Args;
use crate::error::handlers::ValidationErrorHandler;
use crate::error::{RegistryError, Result};
use crate::registry::client::{DEFAULT_TIMEOUT_SECS, normalize_address};
use url::Url;

/// Managed registry used when neither a domain nor a URL is configured
pub const DEFAULT_REGISTRY_DOMAIN: &str = "registry.cloudchamber.cfdata.org";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// Password given directly
    Static { password: String },
    /// Passwords issued on demand by a credential service
    Service { api_url: String, api_token: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Domain credentials are requested for
    pub domain: String,
    /// Normalised `scheme://host[:port]`
    pub base_url: String,
    pub timeout: u64,
    pub skip_tls: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub registry: RegistryConfig,
    pub credentials: CredentialSource,
    pub verbose: bool,
    pub quiet: bool,
}

impl AppConfig {
    pub fn from_args(args: &Args) -> Result<Self> {
        let registry = RegistryConfig::resolve(
            args.registry.as_deref(),
            args.registry_url.as_deref(),
            args.timeout.unwrap_or(DEFAULT_TIMEOUT_SECS),
            args.skip_tls,
        )?;
        let credentials = CredentialSource::resolve(
            args.password.as_deref(),
            args.credentials_api.as_deref(),
            args.api_token.as_deref(),
        )?;

        if args.verbose && args.quiet {
            return Err(RegistryError::Configuration(
                "--verbose and --quiet cannot be combined".to_string(),
            ));
        }

        Ok(AppConfig {
            registry,
            credentials,
            verbose: args.verbose,
            quiet: args.quiet,
        })
    }
}

impl RegistryConfig {
    pub fn resolve(
        domain: Option<&str>,
        url: Option<&str>,
        timeout: u64,
        skip_tls: bool,
    ) -> Result<Self> {
        ValidationErrorHandler::validate_timeout(timeout)?;

        let (domain, base_url) = match (domain, url) {
            (Some(domain), Some(url)) => (domain.to_string(), normalize_address(url)?),
            (Some(domain), None) => (domain.to_string(), normalize_address(domain)?),
            (None, Some(url)) => {
                let base_url = normalize_address(url)?;
                (host_of(&base_url)?, base_url)
            }
            (None, None) => (
                DEFAULT_REGISTRY_DOMAIN.to_string(),
                normalize_address(DEFAULT_REGISTRY_DOMAIN)?,
            ),
        };

        if domain.trim().is_empty() {
            return Err(RegistryError::Configuration(
                "Registry domain cannot be empty".to_string(),
            ));
        }

        Ok(RegistryConfig {
            domain,
            base_url,
            timeout,
            skip_tls,
        })
    }
}

fn host_of(base_url: &str) -> Result<String> {
    let url = Url::parse(base_url)?;
    url.host_str()
        .map(str::to_string)
        .ok_or_else(|| RegistryError::Configuration(format!("Registry URL has no host: {}", base_url)))
}

impl CredentialSource {
    pub fn resolve(
        password: Option<&str>,
        api_url: Option<&str>,
        api_token: Option<&str>,
    ) -> Result<Self> {
        match (password, api_url) {
            (Some(_), Some(_)) => Err(RegistryError::Configuration(
                "Use either a registry password or a credential service, not both".to_string(),
            )),
            (Some(password), None) => Ok(CredentialSource::Static {
                password: password.to_string(),
            }),
            (None, Some(api_url)) => {
                Url::parse(api_url)?;
                let api_token = api_token.ok_or_else(|| {
                    RegistryError::Configuration(
                        "An API token is required when using a credential service".to_string(),
                    )
                })?;
                Ok(CredentialSource::Service {
                    api_url: api_url.to_string(),
                    api_token: api_token.to_string(),
                })
            }
            (None, None) => Err(RegistryError::Configuration(
                "No registry credentials configured: set REGISTRY_PASSWORD or REGISTRY_CREDENTIALS_API"
                    .to_string(),
            )),
        }
    }
}
