//! Standardized error handling patterns shared by the registry operations

use crate::error::{RegistryError, Result};

/// Network error categorization and handling
pub struct NetworkErrorHandler;

impl NetworkErrorHandler {
    /// Categorize and format transport errors with the failing operation as context
    pub fn handle_network_error(error: &reqwest::Error, context: &str) -> RegistryError {
        if error.is_timeout() {
            RegistryError::Network(format!("{} timed out: {}", context, error))
        } else if error.is_connect() {
            RegistryError::Network(format!("Connection error during {}: {}", context, error))
        } else if error.is_decode() {
            RegistryError::Parse(format!("Malformed response during {}: {}", context, error))
        } else if error.to_string().contains("certificate") {
            RegistryError::Network(format!(
                "TLS certificate error during {}: {}",
                context, error
            ))
        } else {
            RegistryError::Network(format!("{} network error: {}", context, error))
        }
    }
}

/// Validation error utilities
pub struct ValidationErrorHandler;

impl ValidationErrorHandler {
    /// Repository names are path-like and may contain slashes, but no empty segments
    pub fn validate_repository(repository: &str) -> Result<()> {
        if repository.is_empty() {
            return Err(RegistryError::InvalidReference(
                "Repository name cannot be empty".to_string(),
            ));
        }

        if repository.split('/').any(|segment| segment.is_empty()) {
            return Err(RegistryError::InvalidReference(format!(
                "Repository name contains an empty path segment: {}",
                repository
            )));
        }

        if repository.chars().any(char::is_whitespace) {
            return Err(RegistryError::InvalidReference(format!(
                "Repository name cannot contain whitespace: {}",
                repository
            )));
        }

        Ok(())
    }

    pub fn validate_tag(tag: &str) -> Result<()> {
        if tag.is_empty() {
            return Err(RegistryError::InvalidReference(
                "Tag cannot be empty".to_string(),
            ));
        }

        if tag.contains('/') || tag.chars().any(char::is_whitespace) {
            return Err(RegistryError::InvalidReference(format!(
                "Tag contains invalid characters: {}",
                tag
            )));
        }

        Ok(())
    }

    /// Standard numeric range validation
    pub fn validate_timeout(timeout: u64) -> Result<()> {
        if timeout == 0 {
            return Err(RegistryError::Configuration(
                "Timeout must be greater than 0".to_string(),
            ));
        }

        if timeout > 86400 {
            // 24 hours
            return Err(RegistryError::Configuration(
                "Timeout cannot exceed 24 hours (86400 seconds)".to_string(),
            ));
        }

        Ok(())
    }
}
