use http_resolver_config::shared::ConflictPolicy;
use tracing::{debug, info, warn};
use url::Url;

use crate::bail;
use crate::concurrency::cancel::{CancelRx, run_cancellable};
use crate::error::{ErrorKind, ResolverResult};
use crate::fetch::DocumentFetcher;
use crate::k8s::{CreateOutcome, K8sClient};
use crate::manifest::{ManifestObject, ManifestStream};
use crate::resolver_error;

/// Counts of the objects a manifest stream produced on the cluster.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyReport {
    pub created: usize,
    pub already_existing: usize,
}

/// Downloads the manifest stream of a source and creates every object it contains.
#[derive(Debug, Clone)]
pub struct ManifestApplier<K> {
    fetcher: DocumentFetcher,
    client: K,
    on_conflict: ConflictPolicy,
}

impl<K> ManifestApplier<K>
where
    K: K8sClient,
{
    pub fn new(fetcher: DocumentFetcher, client: K, on_conflict: ConflictPolicy) -> Self {
        Self {
            fetcher,
            client,
            on_conflict,
        }
    }

    /// Applies the manifests served by `source`, in stream order.
    ///
    /// The first decode or submission error aborts the whole operation and is returned; objects
    /// created before it stay on the cluster and objects after it are never submitted. A stream
    /// without documents succeeds without touching the cluster.
    pub async fn apply_manifests(
        &self,
        source: &Url,
        cancel_rx: &CancelRx,
    ) -> ResolverResult<ApplyReport> {
        let bytes = self.fetcher.fetch_raw(source, cancel_rx).await?;

        // The decoder is not `Send`, so the documents are split before the first submission.
        // Iteration already stopped at the first malformed document.
        let documents: Vec<_> = ManifestStream::new(&bytes).collect();
        debug!(%source, documents = documents.len(), "decoded manifest stream");

        let mut report = ApplyReport::default();
        for document in documents {
            let object = document.inspect_err(|err| {
                warn!(%source, error = %err, "error decoding manifest stream");
            })?;

            match self.create(&object, cancel_rx).await? {
                CreateOutcome::Created => {
                    debug!(%source, object = %object, "created manifest object");
                    report.created += 1;
                }
                CreateOutcome::AlreadyExists => match self.on_conflict {
                    ConflictPolicy::Ignore => {
                        info!(%source, object = %object, "manifest object already exists, skipping");
                        report.already_existing += 1;
                    }
                    ConflictPolicy::Fail => {
                        warn!(%source, object = %object, "manifest object already exists");

                        bail!(
                            ErrorKind::ManifestApplyError,
                            "Manifest object already exists",
                            object
                        );
                    }
                },
            }
        }

        info!(
            %source,
            created = report.created,
            already_existing = report.already_existing,
            "manifests applied from source"
        );

        Ok(report)
    }

    async fn create(
        &self,
        object: &ManifestObject,
        cancel_rx: &CancelRx,
    ) -> ResolverResult<CreateOutcome> {
        run_cancellable(cancel_rx, "create manifest object", async {
            self.client.create_object(object).await.map_err(|err| {
                warn!(object = %object, error = %err, "error creating manifest object");

                resolver_error!(
                    ErrorKind::ManifestApplyError,
                    "Failed to apply manifest object",
                    err
                )
            })
        })
        .await
    }
}
