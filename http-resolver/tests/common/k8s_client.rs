use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use http_resolver::k8s::{CreateOutcome, K8sClient, K8sError};
use http_resolver::manifest::ManifestObject;
use tokio::sync::Mutex;

#[derive(Debug, Default)]
struct Inner {
    attempted: Vec<String>,
    created: Vec<String>,
    existing: HashSet<String>,
    rejected: HashSet<String>,
}

/// In-memory [`K8sClient`] recording every creation request.
///
/// Objects are identified by their display form, e.g. `Task.tekton.dev/build`.
#[derive(Debug, Clone, Default)]
pub struct RecordingK8sClient {
    inner: Arc<Mutex<Inner>>,
}

impl RecordingK8sClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the cluster reject the object with the given display name.
    pub async fn reject(&self, object: &str) {
        self.inner.lock().await.rejected.insert(object.to_string());
    }

    /// Makes the cluster report the object as already existing.
    pub async fn mark_existing(&self, object: &str) {
        self.inner.lock().await.existing.insert(object.to_string());
    }

    pub async fn attempted(&self) -> Vec<String> {
        self.inner.lock().await.attempted.clone()
    }

    pub async fn created(&self) -> Vec<String> {
        self.inner.lock().await.created.clone()
    }
}

#[async_trait]
impl K8sClient for RecordingK8sClient {
    async fn create_object(&self, object: &ManifestObject) -> Result<CreateOutcome, K8sError> {
        let mut inner = self.inner.lock().await;
        let display = object.to_string();
        inner.attempted.push(display.clone());

        if inner.rejected.contains(&display) {
            return Err(K8sError::Rejected {
                object: display,
                code: 422,
                reason: "Invalid".to_string(),
                message: "spec.steps: Required value".to_string(),
            });
        }

        if inner.existing.contains(&display) {
            return Ok(CreateOutcome::AlreadyExists);
        }

        inner.existing.insert(display.clone());
        inner.created.push(display);

        Ok(CreateOutcome::Created)
    }
}
