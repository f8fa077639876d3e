use async_trait::async_trait;
use kube::api::{Api, DynamicObject, PostParams};
use kube::discovery::pinned_kind;
use tracing::debug;

use crate::k8s::{CreateOutcome, K8sClient, K8sError};
use crate::manifest::ManifestObject;

/// HTTP status returned by the API server when the object already exists.
const CONFLICT_STATUS_CODE: u16 = 409;

/// [`K8sClient`] talking to the API server through [`kube`].
#[derive(Clone)]
pub struct HttpK8sClient {
    client: kube::Client,
}

impl HttpK8sClient {
    /// Builds a client from the ambient configuration.
    pub async fn new() -> Result<HttpK8sClient, K8sError> {
        let client = kube::Client::try_default().await?;

        Ok(HttpK8sClient { client })
    }
}

#[async_trait]
impl K8sClient for HttpK8sClient {
    async fn create_object(&self, object: &ManifestObject) -> Result<CreateOutcome, K8sError> {
        // Discovery maps the kind to its resource collection, e.g. `Task` to `tasks`.
        let (resource, _capabilities) = pinned_kind(&self.client, object.gvk()).await?;
        debug!(
            object = %object,
            resource = resource.plural,
            "resolved resource collection of manifest object"
        );

        let api: Api<DynamicObject> = Api::all_with(self.client.clone(), &resource);
        match api.create(&PostParams::default(), object.object()).await {
            Ok(_) => Ok(CreateOutcome::Created),
            Err(kube::Error::Api(response)) if response.code == CONFLICT_STATUS_CODE => {
                Ok(CreateOutcome::AlreadyExists)
            }
            Err(kube::Error::Api(response)) => Err(K8sError::Rejected {
                object: object.to_string(),
                code: response.code,
                reason: response.reason,
                message: response.message,
            }),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use hyper_util::client::legacy::Client as HyperClient;
    use hyper_util::rt::TokioExecutor;
    use kube::client::{Body, ConfigExt};
    use serde_json::json;
    use tower::ServiceBuilder;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::manifest::ManifestStream;

    const DISCOVERY_PATH: &str = "/apis/tekton.dev/v1";
    const TASKS_PATH: &str = "/apis/tekton.dev/v1/tasks";

    /// Builds a client talking plain HTTP to `server` in place of the API server.
    fn client_for(server: &MockServer) -> HttpK8sClient {
        let config = kube::Config::new(server.uri().parse().unwrap());
        let service = ServiceBuilder::new()
            .layer(config.base_uri_layer())
            .service(HyperClient::builder(TokioExecutor::new()).build_http::<Body>());

        HttpK8sClient {
            client: kube::Client::new(service, config.default_namespace),
        }
    }

    async fn serve_discovery(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path(DISCOVERY_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "kind": "APIResourceList",
                "apiVersion": "v1",
                "groupVersion": "tekton.dev/v1",
                "resources": [{
                    "name": "tasks",
                    "singularName": "task",
                    "namespaced": true,
                    "kind": "Task",
                    "verbs": ["create", "delete", "get", "list", "patch", "update", "watch"]
                }]
            })))
            .mount(server)
            .await;
    }

    async fn respond_to_create(server: &MockServer, response: ResponseTemplate) {
        Mock::given(method("POST"))
            .and(path(TASKS_PATH))
            .respond_with(response)
            .mount(server)
            .await;
    }

    fn status(code: u16, reason: &str, message: &str) -> ResponseTemplate {
        ResponseTemplate::new(code).set_body_json(json!({
            "kind": "Status",
            "apiVersion": "v1",
            "metadata": {},
            "status": "Failure",
            "message": message,
            "reason": reason,
            "code": code
        }))
    }

    fn task_json(name: &str) -> serde_json::Value {
        json!({
            "apiVersion": "tekton.dev/v1",
            "kind": "Task",
            "metadata": { "name": name },
            "spec": { "steps": [{ "name": "run", "image": "alpine" }] }
        })
    }

    fn task(name: &str) -> ManifestObject {
        let document = task_json(name).to_string();

        ManifestStream::new(document.as_bytes())
            .next()
            .unwrap()
            .unwrap()
    }

    async fn posted_paths(server: &MockServer) -> Vec<String> {
        server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|request| request.method.as_str() == "POST")
            .map(|request| request.url.path().to_string())
            .collect()
    }

    #[tokio::test]
    async fn created_object_is_posted_to_the_discovered_collection() {
        let server = MockServer::start().await;
        serve_discovery(&server).await;
        respond_to_create(
            &server,
            ResponseTemplate::new(201).set_body_json(task_json("build")),
        )
        .await;

        let outcome = client_for(&server)
            .create_object(&task("build"))
            .await
            .unwrap();

        assert_eq!(outcome, CreateOutcome::Created);
        assert_eq!(posted_paths(&server).await, vec![TASKS_PATH.to_string()]);
    }

    #[tokio::test]
    async fn namespace_in_manifest_does_not_change_the_collection() {
        let server = MockServer::start().await;
        serve_discovery(&server).await;
        respond_to_create(
            &server,
            ResponseTemplate::new(201).set_body_json(task_json("build")),
        )
        .await;

        let mut document = task_json("build");
        document["metadata"]["namespace"] = json!("ci");
        let document = document.to_string();
        let object = ManifestStream::new(document.as_bytes())
            .next()
            .unwrap()
            .unwrap();

        client_for(&server).create_object(&object).await.unwrap();

        assert_eq!(posted_paths(&server).await, vec![TASKS_PATH.to_string()]);
    }

    #[tokio::test]
    async fn conflict_reports_already_exists() {
        let server = MockServer::start().await;
        serve_discovery(&server).await;
        respond_to_create(
            &server,
            status(
                409,
                "AlreadyExists",
                "tasks.tekton.dev \"build\" already exists",
            ),
        )
        .await;

        let outcome = client_for(&server)
            .create_object(&task("build"))
            .await
            .unwrap();

        assert_eq!(outcome, CreateOutcome::AlreadyExists);
    }

    #[tokio::test]
    async fn other_error_status_is_a_rejection() {
        let server = MockServer::start().await;
        serve_discovery(&server).await;
        respond_to_create(
            &server,
            status(422, "Invalid", "spec.steps: Required value"),
        )
        .await;

        let err = client_for(&server)
            .create_object(&task("build"))
            .await
            .unwrap_err();

        match err {
            K8sError::Rejected {
                object,
                code,
                reason,
                message,
            } => {
                assert_eq!(object, "Task.tekton.dev/build");
                assert_eq!(code, 422);
                assert_eq!(reason, "Invalid");
                assert_eq!(message, "spec.steps: Required value");
            }
            other => panic!("expected a rejection, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn failed_discovery_is_a_kube_error_and_nothing_is_posted() {
        let server = MockServer::start().await;

        let err = client_for(&server)
            .create_object(&task("build"))
            .await
            .unwrap_err();

        assert!(matches!(err, K8sError::Kube(_)));
        assert!(posted_paths(&server).await.is_empty());
    }

    #[tokio::test]
    async fn kind_missing_from_discovery_is_a_kube_error() {
        let server = MockServer::start().await;
        serve_discovery(&server).await;

        let pipeline = ManifestStream::new(
            br#"{"apiVersion": "tekton.dev/v1", "kind": "Pipeline", "metadata": {"name": "release"}}"#,
        )
        .next()
        .unwrap()
        .unwrap();

        let err = client_for(&server)
            .create_object(&pipeline)
            .await
            .unwrap_err();

        assert!(matches!(err, K8sError::Kube(_)));
        assert!(posted_paths(&server).await.is_empty());
    }
}
