use async_trait::async_trait;
use thiserror::Error;

use crate::manifest::ManifestObject;

/// Errors emitted by the Kubernetes integration.
#[derive(Debug, Error)]
pub enum K8sError {
    /// An error returned by the [`kube`] client, including failed API discovery for kinds the
    /// cluster does not serve.
    #[error("An error occurred with kube when dealing with K8s: {0}")]
    Kube(#[from] kube::Error),
    /// The API server answered the creation request with an error status.
    #[error("The API server rejected {object} with status {code} ({reason}): {message}")]
    Rejected {
        object: String,
        code: u16,
        reason: String,
        message: String,
    },
}

/// Result of a successful creation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    /// The object did not exist and was created.
    Created,
    /// An object with the same name already exists, the cluster was left untouched.
    AlreadyExists,
}

/// Client interface describing the Kubernetes operations used by the resolver.
#[async_trait]
pub trait K8sClient: Send + Sync {
    /// Creates `object` in the resource collection matching its kind, without namespace.
    ///
    /// The request targets the cluster-wide collection whatever `metadata.namespace` says, so the
    /// API server rejects namespaced kinds and only cluster-scoped objects can be created.
    ///
    /// Implementations report an object that already exists as [`CreateOutcome::AlreadyExists`]
    /// and leave the decision on how to treat it to the caller.
    async fn create_object(&self, object: &ManifestObject) -> Result<CreateOutcome, K8sError>;
}
