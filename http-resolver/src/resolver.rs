use std::collections::BTreeMap;

use http_resolver_config::shared::ResolverConfig;
use tracing::{debug, error, info};
use url::Url;

use crate::artifact::ResolvedArtifact;
use crate::bail;
use crate::concurrency::cancel::CancelRx;
use crate::error::{ErrorKind, ResolverResult};
use crate::fetch::DocumentFetcher;
use crate::framework::{LABEL_KEY_RESOLVER_TYPE, Param, Resolver};
use crate::k8s::K8sClient;
use crate::manifest::{ApplyReport, ManifestApplier};

/// Display name of the resolver.
pub const RESOLVER_NAME: &str = "HTTPResolver";

/// Value of [`LABEL_KEY_RESOLVER_TYPE`] routed to this resolver.
pub const RESOLVER_TYPE: &str = "http";

/// Resolver serving the documents of a fixed, ordered list of HTTP sources.
///
/// For every source, in order, the manifests it serves are first created on the cluster and its
/// document is then fetched and appended to the artifact. Applying before fetching guarantees
/// that objects referenced by the resolved document exist once the artifact is returned.
/// Every resolution re-applies every manifest.
#[derive(Debug, Clone)]
pub struct HttpResolver<K> {
    sources: Vec<Url>,
    fetcher: DocumentFetcher,
    applier: ManifestApplier<K>,
}

impl<K> HttpResolver<K>
where
    K: K8sClient,
{
    /// Builds a resolver from a validated [`ResolverConfig`], creating objects through `client`.
    pub fn new(config: &ResolverConfig, client: K) -> ResolverResult<Self> {
        config.validate()?;
        let sources = config.source_urls()?;
        let fetcher = DocumentFetcher::new(&config.http)?;
        let applier = ManifestApplier::new(fetcher.clone(), client, config.apply.on_conflict);

        Ok(Self {
            sources,
            fetcher,
            applier,
        })
    }
}

impl<K> Resolver for HttpResolver<K>
where
    K: K8sClient,
{
    type Resource = ResolvedArtifact;

    async fn initialize(&self) -> ResolverResult<()> {
        debug!(resolver = RESOLVER_NAME, "initializing resolver");

        Ok(())
    }

    fn name(&self) -> &'static str {
        RESOLVER_NAME
    }

    fn selector(&self) -> BTreeMap<String, String> {
        BTreeMap::from([(
            LABEL_KEY_RESOLVER_TYPE.to_string(),
            RESOLVER_TYPE.to_string(),
        )])
    }

    fn validate_params(&self, params: &[Param]) -> ResolverResult<()> {
        if !params.is_empty() {
            let names = params
                .iter()
                .map(|param| param.name.as_str())
                .collect::<Vec<_>>()
                .join(", ");

            bail!(ErrorKind::InvalidParameters, "No params allowed", names);
        }

        Ok(())
    }

    #[tracing::instrument(
        name = "resolve",
        skip_all,
        fields(resolver = RESOLVER_NAME, sources = self.sources.len())
    )]
    async fn resolve(
        &self,
        params: &[Param],
        cancel_rx: CancelRx,
    ) -> ResolverResult<ResolvedArtifact> {
        self.validate_params(params)?;

        let mut data = Vec::new();
        let mut applied = ApplyReport::default();
        for source in &self.sources {
            let report = self
                .applier
                .apply_manifests(source, &cancel_rx)
                .await
                .inspect_err(|err| {
                    error!(
                        %source,
                        error = %err,
                        fatal = err.is_process_fatal(),
                        "error applying manifests from source"
                    );
                })?;
            applied.created += report.created;
            applied.already_existing += report.already_existing;

            let document = self.fetcher.fetch(source, &cancel_rx).await?;
            data.extend_from_slice(&document);

            debug!(%source, bytes = document.len(), "appended source document");
        }

        info!(
            bytes = data.len(),
            created = applied.created,
            already_existing = applied.already_existing,
            "resolution completed"
        );

        Ok(ResolvedArtifact::new(data))
    }
}
