use std::io::Write;

use http_resolver::artifact::ResolvedArtifact;
use http_resolver::concurrency::cancel::{CancelTx, create_cancel_channel};
use http_resolver::framework::{ResolvedResource, Resolver};
use http_resolver::k8s::http::HttpK8sClient;
use http_resolver::resolver::HttpResolver;
use http_resolver_config::shared::{ApplyConfig, HttpConfig, ResolverConfig};
use tokio::signal::unix::{SignalKind, signal};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Runs a single resolution with the provided configuration and writes the artifact to stdout.
///
/// The cluster client is built from the ambient kube configuration (in-cluster service account
/// or local kubeconfig). SIGINT and SIGTERM cancel the resolution in flight.
pub async fn resolve_with_config(resolver_config: ResolverConfig) -> anyhow::Result<()> {
    info!("starting http resolver");

    log_config(&resolver_config);

    let client = HttpK8sClient::new().await?;
    let resolver = HttpResolver::new(&resolver_config, client)?;
    resolver.initialize().await?;

    info!(
        resolver = resolver.name(),
        selector = ?resolver.selector(),
        "resolver initialized"
    );

    let (cancel_tx, cancel_rx) = create_cancel_channel();
    let cancel_handle = spawn_cancel_on_signal(cancel_tx);

    let result = resolver.resolve(&[], cancel_rx).await;

    // The listener outlives a resolution that finished on its own.
    cancel_handle.abort();
    let _ = cancel_handle.await;

    let artifact = result?;
    write_artifact(&artifact)?;

    info!(bytes = artifact.data().len(), "http resolver completed");

    Ok(())
}

fn write_artifact(artifact: &ResolvedArtifact) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(artifact.data())?;
    stdout.flush()?;

    Ok(())
}

/// Cancels the resolution once SIGINT or SIGTERM is received.
fn spawn_cancel_on_signal(cancel_tx: CancelTx) -> JoinHandle<()> {
    tokio::spawn(async move {
        // SIGTERM is sent by Kubernetes before SIGKILL during pod termination.
        let mut sigterm = match signal(SignalKind::terminate()) {
            Ok(sigterm) => sigterm,
            Err(err) => {
                warn!(error = %err, "failed to register SIGTERM handler");
                return;
            }
        };

        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("SIGINT (Ctrl+C) received, canceling resolution");
            }
            _ = sigterm.recv() => {
                info!("SIGTERM received, canceling resolution");
            }
        }

        if let Err(err) = cancel_tx.cancel() {
            warn!("failed to send cancel signal: {:?}", err);
        }
    })
}

fn log_config(config: &ResolverConfig) {
    debug!(sources = ?config.sources, "resolver sources");
    log_http_config(&config.http);
    log_apply_config(&config.apply);
}

fn log_http_config(config: &HttpConfig) {
    debug!(
        request_timeout_ms = config.request_timeout_ms,
        "http client config"
    );
}

fn log_apply_config(config: &ApplyConfig) {
    debug!(on_conflict = ?config.on_conflict, "manifest apply config");
}
