//! Error types and handlers for registry operations

pub mod handlers;

use reqwest::StatusCode;
use std::fmt;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RegistryError>;

/// Machine-readable classification of a [`RegistryError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    CatalogUnavailable,
    TagListUnavailable,
    TagResolutionFailed,
    DigestMissing,
    TagDeletionFailed,
    BatchDeletionPartialFailure,
    GcWarning,
    Credential,
    InvalidReference,
    InvalidFilter,
    Network,
    Parse,
    Configuration,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::CatalogUnavailable => "catalog unavailable",
            ErrorKind::TagListUnavailable => "tag list unavailable",
            ErrorKind::TagResolutionFailed => "tag resolution failed",
            ErrorKind::DigestMissing => "digest missing",
            ErrorKind::TagDeletionFailed => "tag deletion failed",
            ErrorKind::BatchDeletionPartialFailure => "partial batch failure",
            ErrorKind::GcWarning => "garbage collection warning",
            ErrorKind::Credential => "credential",
            ErrorKind::InvalidReference => "invalid reference",
            ErrorKind::InvalidFilter => "invalid filter",
            ErrorKind::Network => "network",
            ErrorKind::Parse => "parse",
            ErrorKind::Configuration => "configuration",
        };
        f.write_str(name)
    }
}

/// One tag that could not be deleted during a whole-repository deletion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagFailure {
    pub tag: String,
    pub kind: ErrorKind,
    pub detail: String,
}

impl TagFailure {
    pub fn new(tag: impl Into<String>, error: &RegistryError) -> Self {
        Self {
            tag: tag.into(),
            kind: error.kind(),
            detail: error.to_string(),
        }
    }
}

impl fmt::Display for TagFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Error when deleting tag {}: {}", self.tag, self.detail)
    }
}

#[derive(Debug, Clone, Error)]
pub enum RegistryError {
    #[error("Failed to fetch repository catalog: {status} {status_text}")]
    CatalogUnavailable { status: u16, status_text: String },

    #[error("Failed to fetch tags for {repository}: {status} {status_text}")]
    TagListUnavailable {
        repository: String,
        status: u16,
        status_text: String,
    },

    #[error("Failed to retrieve tag info for {repository}:{tag}: {status} {status_text}")]
    TagResolutionFailed {
        repository: String,
        tag: String,
        status: u16,
        status_text: String,
    },

    #[error("Digest not found for tag \"{tag}\" in {repository}")]
    DigestMissing { repository: String, tag: String },

    #[error("Failed to delete tag \"{tag}\" (digest: {digest}) from {repository}: {status} {status_text}")]
    TagDeletionFailed {
        repository: String,
        tag: String,
        digest: String,
        status: u16,
        status_text: String,
    },

    #[error("Failed to delete some tags of {repository}:\n{}", join_failures(.failures))]
    BatchDeletionPartialFailure {
        repository: String,
        failures: Vec<TagFailure>,
    },

    /// Only ever reported as a warning; deletions that preceded it stand
    #[error("Garbage collection request failed: {status} {status_text}")]
    GarbageCollectionFailed { status: u16, status_text: String },

    #[error("Credential error: {0}")]
    Credential(String),

    #[error("Invalid image reference: {0}")]
    InvalidReference(String),

    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

fn join_failures(failures: &[TagFailure]) -> String {
    failures
        .iter()
        .map(|failure| format!(" {}", failure))
        .collect::<Vec<_>>()
        .join("\n")
}

impl RegistryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RegistryError::CatalogUnavailable { .. } => ErrorKind::CatalogUnavailable,
            RegistryError::TagListUnavailable { .. } => ErrorKind::TagListUnavailable,
            RegistryError::TagResolutionFailed { .. } => ErrorKind::TagResolutionFailed,
            RegistryError::DigestMissing { .. } => ErrorKind::DigestMissing,
            RegistryError::TagDeletionFailed { .. } => ErrorKind::TagDeletionFailed,
            RegistryError::BatchDeletionPartialFailure { .. } => {
                ErrorKind::BatchDeletionPartialFailure
            }
            RegistryError::GarbageCollectionFailed { .. } => ErrorKind::GcWarning,
            RegistryError::Credential(_) => ErrorKind::Credential,
            RegistryError::InvalidReference(_) => ErrorKind::InvalidReference,
            RegistryError::InvalidFilter(_) => ErrorKind::InvalidFilter,
            RegistryError::Network(_) => ErrorKind::Network,
            RegistryError::Parse(_) => ErrorKind::Parse,
            RegistryError::Configuration(_) => ErrorKind::Configuration,
        }
    }

    /// HTTP status carried by protocol-level failures
    pub fn status(&self) -> Option<u16> {
        match self {
            RegistryError::CatalogUnavailable { status, .. }
            | RegistryError::TagListUnavailable { status, .. }
            | RegistryError::TagResolutionFailed { status, .. }
            | RegistryError::TagDeletionFailed { status, .. }
            | RegistryError::GarbageCollectionFailed { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Split a status into the numeric code and its canonical reason phrase
pub fn status_parts(status: StatusCode) -> (u16, String) {
    (
        status.as_u16(),
        status.canonical_reason().unwrap_or_default().to_string(),
    )
}

impl From<serde_json::Error> for RegistryError {
    fn from(err: serde_json::Error) -> Self {
        RegistryError::Parse(err.to_string())
    }
}

impl From<reqwest::Error> for RegistryError {
    fn from(err: reqwest::Error) -> Self {
        RegistryError::Network(err.to_string())
    }
}

impl From<url::ParseError> for RegistryError {
    fn from(err: url::ParseError) -> Self {
        RegistryError::Configuration(err.to_string())
    }
}

impl From<regex::Error> for RegistryError {
    fn from(err: regex::Error) -> Self {
        RegistryError::InvalidFilter(err.to_string())
    }
}
