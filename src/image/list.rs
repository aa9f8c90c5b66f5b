//! Image listing: repositories matching a filter, with their tags

use crate::common::{ImageRegistry, NameUtils};
use crate::error::Result;
use crate::logging::Logger;
use crate::registry::RegistryCredential;
use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    /// Regular expression matched against repository names; `None` matches everything
    pub filter: Option<String>,
    /// Keep tags whose name is itself a content digest
    pub include_digests: bool,
}

/// One repository and the tags shown for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryTags {
    pub name: String,
    pub tags: Vec<String>,
}

pub struct ImageLister<'a, R: ImageRegistry> {
    registry: &'a R,
    output: Logger,
}

impl<'a, R: ImageRegistry> ImageLister<'a, R> {
    pub fn new(registry: &'a R, output: Logger) -> Self {
        Self { registry, output }
    }

    /// List matching repositories and their tags.
    ///
    /// Any tag-listing failure aborts the whole listing; listing is read-only,
    /// so the caller can simply retry.
    pub async fn list_images(
        &self,
        options: &ListOptions,
        credential: &RegistryCredential,
    ) -> Result<Vec<RepositoryTags>> {
        let filter = options.filter.as_deref().map(Regex::new).transpose()?;

        let repositories = self.registry.list_repositories(credential).await?;
        self.output
            .verbose(&format!("Catalog lists {} repositories", repositories.len()));

        let mut results = Vec::new();
        for repository in &repositories {
            let name = NameUtils::strip_leading_separators(repository);
            if let Some(filter) = &filter {
                if !filter.is_match(name) {
                    self.output.detail(&format!("Skipping {} (filter)", name));
                    continue;
                }
            }

            let tags = self.registry.list_tags(name, credential).await?;
            results.push(RepositoryTags {
                name: name.to_string(),
                tags: visible_tags(tags, options.include_digests),
            });
        }

        Ok(results)
    }
}

fn visible_tags(tags: Vec<String>, include_digests: bool) -> Vec<String> {
    if include_digests {
        tags
    } else {
        tags.into_iter()
            .filter(|tag| !NameUtils::is_digest_tag(tag))
            .collect()
    }
}
