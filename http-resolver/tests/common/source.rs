use std::ops::Deref;
use std::time::Duration;

use http_resolver::fetch::EXPECTED_CONTENT_TYPE;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mock HTTP server playing the role of one or more remote sources.
pub struct SourceServer {
    server: MockServer,
}

impl SourceServer {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Serves `body` at `source_path` with the content type the resolver expects.
    pub async fn serve_document(&self, source_path: &str, body: &str) {
        self.serve(source_path, body, EXPECTED_CONTENT_TYPE).await;
    }

    /// Serves `body` at `source_path` with an arbitrary content type.
    pub async fn serve(&self, source_path: &str, body: &str, content_type: &str) {
        self.mount(
            source_path,
            ResponseTemplate::new(200).set_body_raw(body.as_bytes().to_vec(), content_type),
        )
        .await;
    }

    /// Serves `body` at `source_path` only after `delay`.
    pub async fn serve_delayed(&self, source_path: &str, body: &str, delay: Duration) {
        self.mount(
            source_path,
            ResponseTemplate::new(200)
                .set_body_raw(body.as_bytes().to_vec(), EXPECTED_CONTENT_TYPE)
                .set_delay(delay),
        )
        .await;
    }

    pub async fn mount(&self, source_path: &str, response: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path(source_path))
            .respond_with(response)
            .named(source_path)
            .mount(&self.server)
            .await;
    }

    pub fn source_url(&self, source_path: &str) -> Url {
        Url::parse(&format!("{}{source_path}", self.server.uri())).unwrap()
    }

    /// Number of requests received for `source_path`.
    pub async fn requests_to(&self, source_path: &str) -> usize {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|request| request.url.path() == source_path)
            .count()
    }
}

impl Deref for SourceServer {
    type Target = MockServer;

    fn deref(&self) -> &Self::Target {
        &self.server
    }
}

/// A single-object manifest stream, also valid as a resolvable JSON document.
pub fn task_document(name: &str) -> String {
    format!(
        r#"{{"apiVersion":"tekton.dev/v1","kind":"Task","metadata":{{"name":"{name}"}},"spec":{{"steps":[{{"name":"run","image":"alpine"}}]}}}}"#
    )
}

/// Display name of the object produced by [`task_document`].
pub fn task_object(name: &str) -> String {
    format!("Task.tekton.dev/{name}")
}
