use bytes::Bytes;
use http_resolver_config::shared::HttpConfig;
use reqwest::Response;
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, warn};
use url::Url;

use crate::bail;
use crate::concurrency::cancel::{CancelRx, run_cancellable};
use crate::error::{ErrorKind, ResolverResult};
use crate::resolver_error;

/// Content type a source must declare for its document to be resolvable.
///
/// The header is compared byte for byte: a different case, extra whitespace or reordered
/// parameters are all rejected.
pub const EXPECTED_CONTENT_TYPE: &str = "application/json;charset=UTF-8";

/// Downloads documents from remote sources.
///
/// Every download is a single GET without retries; redirects and timeouts follow the
/// [`HttpConfig`] the fetcher was built with. Status codes are not inspected.
#[derive(Debug, Clone)]
pub struct DocumentFetcher {
    client: reqwest::Client,
}

impl DocumentFetcher {
    pub fn new(config: &HttpConfig) -> ResolverResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
        })
    }

    /// Fetches the resolvable document of `source`.
    ///
    /// Fails with [`ErrorKind::SourceFetchFailed`] when the request fails, when the response does
    /// not declare [`EXPECTED_CONTENT_TYPE`] or when the body cannot be read completely.
    pub async fn fetch(&self, source: &Url, cancel_rx: &CancelRx) -> ResolverResult<Bytes> {
        run_cancellable(cancel_rx, "fetch source document", async {
            let response = self.send(source, ErrorKind::SourceFetchFailed).await?;
            check_content_type(source, &response)?;

            read_body(source, response, ErrorKind::SourceFetchFailed).await
        })
        .await
    }

    /// Fetches the raw bytes of `source` without the content type check.
    ///
    /// Used to download manifest streams, failing with [`ErrorKind::ManifestFetchFailed`].
    pub async fn fetch_raw(&self, source: &Url, cancel_rx: &CancelRx) -> ResolverResult<Bytes> {
        run_cancellable(cancel_rx, "fetch manifest stream", async {
            let response = self.send(source, ErrorKind::ManifestFetchFailed).await?;

            read_body(source, response, ErrorKind::ManifestFetchFailed).await
        })
        .await
    }

    async fn send(&self, source: &Url, kind: ErrorKind) -> ResolverResult<Response> {
        debug!(%source, "sending request to source");

        self.client
            .get(source.clone())
            .send()
            .await
            .map_err(|err| {
                warn!(%source, error = %err, "error fetching from source");

                resolver_error!(kind, "Failed to fetch from source", format!("{source}: {err}"))
            })
    }
}

fn check_content_type(source: &Url, response: &Response) -> ResolverResult<()> {
    let content_type = response.headers().get(CONTENT_TYPE);
    if content_type.map(|value| value.as_bytes()) == Some(EXPECTED_CONTENT_TYPE.as_bytes()) {
        return Ok(());
    }

    let received = content_type
        .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
        .unwrap_or_else(|| "<none>".to_string());
    warn!(%source, content_type = %received, "unexpected content type received from source");

    bail!(
        ErrorKind::SourceFetchFailed,
        "Unexpected content type",
        format!("{source}: received `{received}`, expected `{EXPECTED_CONTENT_TYPE}`")
    );
}

async fn read_body(source: &Url, response: Response, kind: ErrorKind) -> ResolverResult<Bytes> {
    let body = response.bytes().await.map_err(|err| {
        warn!(%source, error = %err, "error reading response body from source");

        resolver_error!(kind, "Failed to read response body", format!("{source}: {err}"))
    })?;

    debug!(%source, bytes = body.len(), "read response body from source");

    Ok(body)
}
