//! End-to-end tests of `images list` and `images delete` against a mock registry

use registry_images::error::RegistryError;
use registry_images::image::{
    DeleteOptions, DeleteOutcome, GcStatus, ImageDeleter, ImageLister, ImageReference,
    ListOptions, RepositoryTags,
};
use registry_images::logging::Logger;
use registry_images::registry::{
    CredentialManager, CredentialRequest, RegistryClient, StaticCredentialProvider,
};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> RegistryClient {
    RegistryClient::builder(server.uri())
        .with_output(Logger::new_quiet())
        .build()
        .unwrap()
}

fn credentials() -> CredentialManager {
    CredentialManager::new(
        Arc::new(StaticCredentialProvider::new("secret")),
        CredentialRequest::pull_push("registry.test"),
        Logger::new_quiet(),
    )
}

async fn mount_tag(server: &MockServer, repository: &str, tag: &str, delete_status: u16) {
    let digest = format!("sha256:{}", tag);
    Mock::given(method("HEAD"))
        .and(path(format!("/v2/{}/manifests/{}", repository, tag)))
        .respond_with(ResponseTemplate::new(200).insert_header("Docker-Content-Digest", digest.as_str()))
        .mount(server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(format!("/v2/{}/manifests/{}", repository, digest)))
        .respond_with(ResponseTemplate::new(delete_status))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_gc(server: &MockServer, times: u64) {
    Mock::given(method("PUT"))
        .and(path("/v2/gc/manifests"))
        .respond_with(ResponseTemplate::new(202))
        .expect(times)
        .mount(server)
        .await;
}

async fn delete(server: &MockServer, image: &str) -> Result<DeleteOutcome, RegistryError> {
    let registry = client(server);
    let credentials = credentials();
    ImageDeleter::new(&registry, &credentials, Logger::new_quiet())
        .with_options(DeleteOptions { concurrency: 2 })
        .delete(&ImageReference::parse(image).unwrap())
        .await
}

#[tokio::test]
async fn test_list_filters_repositories_and_digest_tags() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/_catalog"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "repositories": ["/team/app", "other"] })),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/team/app/tags/list"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "name": "team/app", "tags": ["v1", "sha256:abc"] })),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/other/tags/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "tags": ["x"] })))
        .expect(0)
        .mount(&server)
        .await;

    let registry = client(&server);
    let credential = credentials().credential().await.unwrap();
    let options = ListOptions {
        filter: Some("^team/".to_string()),
        include_digests: false,
    };
    let images = ImageLister::new(&registry, Logger::new_quiet())
        .list_images(&options, &credential)
        .await
        .unwrap();

    assert_eq!(
        images,
        vec![RepositoryTags {
            name: "team/app".to_string(),
            tags: vec!["v1".to_string()],
        }]
    );
}

#[tokio::test]
async fn test_delete_single_tag_then_gc() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/v2/.+/tags/list$"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    mount_tag(&server, "app", "v1", 202).await;
    mount_gc(&server, 1).await;

    let outcome = delete(&server, "app:v1").await.unwrap();

    match outcome {
        DeleteOutcome::Deleted { deleted, gc, .. } => {
            assert_eq!(deleted.len(), 1);
            assert_eq!(deleted[0].digest, "sha256:v1");
            assert_eq!(gc, GcStatus::Triggered);
        }
        other => panic!("unexpected outcome {:?}", other),
    }
}

#[tokio::test]
async fn test_delete_repository_with_partial_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/app/tags/list"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "tags": ["v1", "v2", "v3"] })),
        )
        .mount(&server)
        .await;
    mount_tag(&server, "app", "v1", 202).await;
    mount_tag(&server, "app", "v2", 500).await;
    mount_tag(&server, "app", "v3", 202).await;
    mount_gc(&server, 0).await;

    let error = delete(&server, "app").await.unwrap_err();

    match &error {
        RegistryError::BatchDeletionPartialFailure { failures, .. } => {
            assert_eq!(failures.len(), 1);
            assert_eq!(failures[0].tag, "v2");
        }
        other => panic!("unexpected error {:?}", other),
    }
    assert!(error.to_string().contains("Error when deleting tag v2:"));
}

#[tokio::test]
async fn test_delete_whole_repository() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/app/tags/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "tags": ["v1", "v2"] })))
        .mount(&server)
        .await;
    mount_tag(&server, "app", "v1", 202).await;
    mount_tag(&server, "app", "v2", 202).await;
    mount_gc(&server, 1).await;

    let outcome = delete(&server, "/app").await.unwrap();
    assert!(matches!(
        outcome,
        DeleteOutcome::Deleted { ref deleted, gc: GcStatus::Triggered, .. } if deleted.len() == 2
    ));
}

#[tokio::test]
async fn test_delete_empty_repository() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/app/tags/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "tags": [] })))
        .mount(&server)
        .await;
    mount_gc(&server, 0).await;

    let outcome = delete(&server, "app").await.unwrap();
    assert_eq!(
        outcome,
        DeleteOutcome::NoTags {
            repository: "app".to_string()
        }
    );
}

#[tokio::test]
async fn test_gc_failure_after_delete_is_reported_not_raised() {
    let server = MockServer::start().await;
    mount_tag(&server, "app", "v1", 202).await;
    Mock::given(method("PUT"))
        .and(path("/v2/gc/manifests"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = delete(&server, "app:v1").await.unwrap();
    assert!(matches!(
        outcome,
        DeleteOutcome::Deleted { gc: GcStatus::Failed(_), .. }
    ));
}
