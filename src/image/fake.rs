//! In-memory registry used by the image command tests

use crate::common::ImageRegistry;
use crate::error::{RegistryError, Result};
use crate::logging::Logger;
use crate::registry::{CredentialManager, CredentialRequest, RegistryCredential, StaticCredentialProvider};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Default)]
pub struct FakeRegistry {
    pub repositories: Vec<String>,
    pub tags: HashMap<String, Vec<String>>,
    pub unresolvable: HashSet<String>,
    pub missing_digest: HashSet<String>,
    pub undeletable: HashSet<String>,
    pub gc_fails: bool,
    pub tag_list_fails: HashSet<String>,

    pub list_tag_calls: AtomicUsize,
    pub resolve_calls: AtomicUsize,
    pub gc_calls: AtomicUsize,
    pub delete_attempts: Mutex<Vec<String>>,
}

impl FakeRegistry {
    pub fn with_tags(repository: &str, tags: &[&str]) -> Self {
        let mut fake = Self::default();
        fake.repositories.push(repository.to_string());
        fake.tags.insert(
            repository.to_string(),
            tags.iter().map(|t| t.to_string()).collect(),
        );
        fake
    }

    pub fn deleted(&self) -> Vec<String> {
        self.delete_attempts.lock().unwrap().clone()
    }

    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

pub fn test_credentials() -> CredentialManager {
    CredentialManager::new(
        Arc::new(StaticCredentialProvider::new("secret")),
        CredentialRequest::pull_push("registry.test"),
        Logger::new_quiet(),
    )
}

#[async_trait]
impl ImageRegistry for FakeRegistry {
    async fn list_repositories(&self, _credential: &RegistryCredential) -> Result<Vec<String>> {
        Ok(self.repositories.clone())
    }

    async fn list_tags(&self, repository: &str, _credential: &RegistryCredential) -> Result<Vec<String>> {
        self.list_tag_calls.fetch_add(1, Ordering::SeqCst);
        if self.tag_list_fails.contains(repository) {
            return Err(RegistryError::TagListUnavailable {
                repository: repository.to_string(),
                status: 500,
                status_text: "Internal Server Error".to_string(),
            });
        }
        Ok(self.tags.get(repository).cloned().unwrap_or_default())
    }

    async fn resolve_digest(
        &self,
        repository: &str,
        tag: &str,
        _credential: &RegistryCredential,
    ) -> Result<String> {
        self.resolve_calls.fetch_add(1, Ordering::SeqCst);
        if self.unresolvable.contains(tag) {
            return Err(RegistryError::TagResolutionFailed {
                repository: repository.to_string(),
                tag: tag.to_string(),
                status: 404,
                status_text: "Not Found".to_string(),
            });
        }
        if self.missing_digest.contains(tag) {
            return Err(RegistryError::DigestMissing {
                repository: repository.to_string(),
                tag: tag.to_string(),
            });
        }
        Ok(format!("sha256:{}", tag))
    }

    async fn delete_manifest(
        &self,
        repository: &str,
        tag: &str,
        digest: &str,
        _credential: &RegistryCredential,
    ) -> Result<()> {
        self.delete_attempts.lock().unwrap().push(tag.to_string());
        if self.undeletable.contains(tag) {
            return Err(RegistryError::TagDeletionFailed {
                repository: repository.to_string(),
                tag: tag.to_string(),
                digest: digest.to_string(),
                status: 500,
                status_text: "Internal Server Error".to_string(),
            });
        }
        Ok(())
    }

    async fn trigger_gc(&self, _credential: &RegistryCredential) -> Result<()> {
        self.gc_calls.fetch_add(1, Ordering::SeqCst);
        if self.gc_fails {
            return Err(RegistryError::GarbageCollectionFailed {
                status: 503,
                status_text: "Service Unavailable".to_string(),
            });
        }
        Ok(())
    }
}
