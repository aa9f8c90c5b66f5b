//! Tag deletion, for one tag or every tag of a repository
//!
//! Whole-repository deletion attempts every tag even when some fail, collects
//! the failures, and reports them together once all tags were tried. Garbage
//! collection is requested only after a deletion command fully succeeded, and
//! its own failure is downgraded to a warning.

use crate::common::{DeletedTag, ImageRegistry};
use crate::error::{RegistryError, Result, TagFailure};
use crate::image::reference::ImageReference;
use crate::logging::Logger;
use crate::registry::CredentialManager;
use futures::stream::{self, StreamExt};

#[derive(Debug, Clone)]
pub struct DeleteOptions {
    /// Number of tags deleted at the same time; 1 deletes them in order
    pub concurrency: usize,
}

impl Default for DeleteOptions {
    fn default() -> Self {
        Self { concurrency: 1 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GcStatus {
    Triggered,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The repository had no tags; nothing was deleted and GC was not requested
    NoTags { repository: String },
    Deleted {
        repository: String,
        deleted: Vec<DeletedTag>,
        gc: GcStatus,
    },
}

pub struct ImageDeleter<'a, R: ImageRegistry> {
    registry: &'a R,
    credentials: &'a CredentialManager,
    output: Logger,
    options: DeleteOptions,
}

impl<'a, R: ImageRegistry> ImageDeleter<'a, R> {
    pub fn new(registry: &'a R, credentials: &'a CredentialManager, output: Logger) -> Self {
        Self {
            registry,
            credentials,
            output,
            options: DeleteOptions::default(),
        }
    }

    pub fn with_options(mut self, options: DeleteOptions) -> Self {
        self.options = options;
        self
    }

    pub async fn delete(&self, reference: &ImageReference) -> Result<DeleteOutcome> {
        match reference {
            ImageReference::Tag { repository, tag } => self.delete_single(repository, tag).await,
            ImageReference::Repository { repository } => self.delete_repository(repository).await,
        }
    }

    /// Delete one tag; any failure is returned as is
    async fn delete_single(&self, repository: &str, tag: &str) -> Result<DeleteOutcome> {
        let credential = self.credentials.credential().await?;
        let deleted = self.registry.delete_tag(repository, tag, &credential).await?;
        self.report_deleted(repository, &deleted);

        let gc = self.collect_garbage().await;
        Ok(DeleteOutcome::Deleted {
            repository: repository.to_string(),
            deleted: vec![deleted],
            gc,
        })
    }

    async fn delete_repository(&self, repository: &str) -> Result<DeleteOutcome> {
        let credential = self.credentials.credential().await?;
        let tags = self.registry.list_tags(repository, &credential).await?;

        if tags.is_empty() {
            self.output
                .info(&format!("No tags found for image {}", repository));
            return Ok(DeleteOutcome::NoTags {
                repository: repository.to_string(),
            });
        }

        let total = tags.len();
        self.output
            .step(&format!("Deleting {} tags from {}", total, repository));

        let (deleted, failures) = self.delete_tags(repository, tags).await;
        if !failures.is_empty() {
            self.output.info(&format!(
                "Deleted {} of {} tags from {}",
                deleted.len(),
                total,
                repository
            ));
            return Err(RegistryError::BatchDeletionPartialFailure {
                repository: repository.to_string(),
                failures,
            });
        }

        let gc = self.collect_garbage().await;
        Ok(DeleteOutcome::Deleted {
            repository: repository.to_string(),
            deleted,
            gc,
        })
    }

    /// Attempt every tag and split the results into deletions and failures.
    ///
    /// Each tag appears exactly once in one of the two lists. With a concurrency
    /// above 1 the order of either list may differ from `tags`.
    pub async fn delete_tags(
        &self,
        repository: &str,
        tags: Vec<String>,
    ) -> (Vec<DeletedTag>, Vec<TagFailure>) {
        let concurrency = self.options.concurrency.max(1);

        let results: Vec<(String, Result<DeletedTag>)> = stream::iter(tags)
            .map(move |tag| async move {
                let result = self.delete_one(repository, &tag).await;
                (tag, result)
            })
            .buffer_unordered(concurrency)
            .collect()
            .await;

        let mut deleted = Vec::new();
        let mut failures = Vec::new();
        for (tag, result) in results {
            match result {
                Ok(removed) => {
                    self.report_deleted(repository, &removed);
                    deleted.push(removed);
                }
                Err(error) => {
                    let failure = TagFailure::new(tag, &error);
                    self.output.warning(&failure.to_string());
                    failures.push(failure);
                }
            }
        }

        (deleted, failures)
    }

    // A credential that expired mid-batch is re-issued here
    async fn delete_one(&self, repository: &str, tag: &str) -> Result<DeletedTag> {
        let credential = self.credentials.credential().await?;
        self.registry.delete_tag(repository, tag, &credential).await
    }

    async fn collect_garbage(&self) -> GcStatus {
        self.output
            .info("Finalizing the delete. This may take a few seconds");

        let result = match self.credentials.credential().await {
            Ok(credential) => self.registry.trigger_gc(&credential).await,
            Err(error) => Err(error),
        };

        match result {
            Ok(()) => GcStatus::Triggered,
            Err(error) => {
                self.output.warning(&error.to_string());
                GcStatus::Failed(error.to_string())
            }
        }
    }

    fn report_deleted(&self, repository: &str, deleted: &DeletedTag) {
        self.output.success(&format!(
            "Deleted tag \"{}\" (digest: {}) for image {}",
            deleted.tag, deleted.digest, repository
        ));
    }
}
