use http_resolver::concurrency::cancel::never_cancel;
use http_resolver::fetch::DocumentFetcher;
use http_resolver::manifest::{ApplyReport, ManifestApplier};
use http_resolver_config::shared::{ConflictPolicy, HttpConfig};
use http_resolver_telemetry::init_test_tracing;

use crate::common::k8s_client::RecordingK8sClient;
use crate::common::source::{SourceServer, task_document};

mod common;

fn applier(client: RecordingK8sClient) -> ManifestApplier<RecordingK8sClient> {
    let fetcher = DocumentFetcher::new(&HttpConfig::default()).unwrap();

    ManifestApplier::new(fetcher, client, ConflictPolicy::Ignore)
}

#[tokio::test(flavor = "multi_thread")]
async fn report_counts_created_and_existing_objects() {
    init_test_tracing();
    let server = SourceServer::start().await;
    let stream = [task_document("build"), task_document("test")].join("\n---\n");
    server.serve_document("/tasks", &stream).await;

    let client = RecordingK8sClient::new();
    let applier = applier(client.clone());
    let source = server.source_url("/tasks");

    let first = applier
        .apply_manifests(&source, &never_cancel())
        .await
        .unwrap();
    assert_eq!(
        first,
        ApplyReport {
            created: 2,
            already_existing: 0
        }
    );

    let second = applier
        .apply_manifests(&source, &never_cancel())
        .await
        .unwrap();
    assert_eq!(
        second,
        ApplyReport {
            created: 0,
            already_existing: 2
        }
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn empty_stream_reports_nothing() {
    init_test_tracing();
    let server = SourceServer::start().await;
    server.serve("/empty", "---\n", "application/x-yaml").await;

    let client = RecordingK8sClient::new();
    let report = applier(client.clone())
        .apply_manifests(&server.source_url("/empty"), &never_cancel())
        .await
        .unwrap();

    assert_eq!(report, ApplyReport::default());
    assert!(client.attempted().await.is_empty());
}
