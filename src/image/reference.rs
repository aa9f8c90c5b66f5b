//! Parsing of the `<image[:tag]>` argument of the delete command

use crate::common::NameUtils;
use crate::error::Result;
use crate::error::handlers::ValidationErrorHandler;
use std::fmt;
use std::str::FromStr;

/// What the user asked to delete
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageReference {
    /// `repository:tag`, a single tag
    Tag { repository: String, tag: String },
    /// `repository`, every tag in it
    Repository { repository: String },
}

impl ImageReference {
    /// Parse a reference; the first `:` separates repository from tag
    pub fn parse(input: &str) -> Result<Self> {
        let input = NameUtils::strip_leading_separators(input.trim());

        match input.split_once(':') {
            Some((repository, tag)) => {
                ValidationErrorHandler::validate_repository(repository)?;
                ValidationErrorHandler::validate_tag(tag)?;
                Ok(ImageReference::Tag {
                    repository: repository.to_string(),
                    tag: tag.to_string(),
                })
            }
            None => {
                ValidationErrorHandler::validate_repository(input)?;
                Ok(ImageReference::Repository {
                    repository: input.to_string(),
                })
            }
        }
    }

    pub fn repository(&self) -> &str {
        match self {
            ImageReference::Tag { repository, .. } | ImageReference::Repository { repository } => {
                repository
            }
        }
    }
}

impl FromStr for ImageReference {
    type Err = crate::error::RegistryError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageReference::Tag { repository, tag } => write!(f, "{}:{}", repository, tag),
            ImageReference::Repository { repository } => f.write_str(repository),
        }
    }
}
