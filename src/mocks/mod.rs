//! Mock implementations for testing GitHub API clients.

use crate::errors::{GitHubError, GitHubErrorKind, GitHubResult};
use crate::transport::{HttpMethod, Transport, TransportRequest, TransportResponse};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Mock transport that replays registered responses and records requests.
#[derive(Debug, Clone)]
pub struct MockGitHubTransport {
    /// Response store.
    responses: Arc<RwLock<ResponseStore>>,
    /// Request history.
    requests: Arc<RwLock<Vec<MockRequest>>>,
    /// Default behavior.
    default_behavior: DefaultBehavior,
}

/// Stored responses for the mock transport.
#[derive(Debug, Default)]
struct ResponseStore {
    responses: HashMap<String, Vec<MockResponse>>,
}

/// A mock response.
#[derive(Debug, Clone)]
pub struct MockResponse {
    /// Status code.
    pub status: u16,
    /// Response body.
    pub body: Value,
    /// Headers.
    pub headers: HashMap<String, String>,
    /// Delay before responding.
    pub delay: Option<std::time::Duration>,
}

impl MockResponse {
    fn with_status(status: u16, body: Value) -> Self {
        Self {
            status,
            body,
            headers: HashMap::new(),
            delay: None,
        }
    }

    fn error(status: u16, message: &str) -> Self {
        Self::with_status(
            status,
            serde_json::json!({
                "message": message,
                "documentation_url": "https://docs.github.com/rest"
            }),
        )
    }

    /// Creates a successful response with the given body.
    pub fn ok<T: Serialize>(body: &T) -> Self {
        Self::with_status(200, serde_json::to_value(body).unwrap_or_default())
    }

    /// Creates a 201 Created response.
    pub fn created<T: Serialize>(body: &T) -> Self {
        Self::with_status(201, serde_json::to_value(body).unwrap_or_default())
    }

    /// Creates a 204 No Content response.
    pub fn no_content() -> Self {
        Self::with_status(204, Value::Null)
    }

    /// Creates a 404 Not Found response.
    pub fn not_found(message: &str) -> Self {
        Self::error(404, message)
    }

    /// Creates a 401 Unauthorized response.
    pub fn unauthorized(message: &str) -> Self {
        Self::error(401, message)
    }

    /// Creates a 403 Forbidden response.
    pub fn forbidden(message: &str) -> Self {
        Self::error(403, message)
    }

    /// Creates a 422 Validation Failed response.
    pub fn validation_failed(message: &str, errors: Vec<(&str, &str, &str)>) -> Self {
        let errors: Vec<_> = errors
            .into_iter()
            .map(|(resource, field, code)| {
                serde_json::json!({
                    "resource": resource,
                    "field": field,
                    "code": code
                })
            })
            .collect();

        Self::with_status(
            422,
            serde_json::json!({
                "message": message,
                "errors": errors,
                "documentation_url": "https://docs.github.com/rest"
            }),
        )
    }

    /// Creates a 500 Internal Server Error response.
    pub fn server_error(message: &str) -> Self {
        Self::with_status(500, serde_json::json!({ "message": message }))
    }

    /// Adds a delay to the response.
    pub fn with_delay(mut self, delay: std::time::Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Adds a header to the response.
    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.insert(key.to_string(), value.to_string());
        self
    }
}

impl From<MockResponse> for TransportResponse {
    fn from(response: MockResponse) -> Self {
        Self {
            status: response.status,
            headers: response.headers,
            body: response.body,
        }
    }
}

/// A recorded mock request.
#[derive(Debug, Clone)]
pub struct MockRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Request path.
    pub path: String,
    /// Request parameters.
    pub params: Map<String, Value>,
    /// Configuration snapshot of the calling client.
    pub options: Map<String, Value>,
    /// Timestamp.
    pub timestamp: DateTime<Utc>,
}

/// Default behavior for unmatched requests.
#[derive(Debug, Clone, Copy, Default)]
pub enum DefaultBehavior {
    /// Return 404 for unmatched requests.
    #[default]
    NotFound,
    /// Return an error for unmatched requests.
    Error,
    /// Panic on unmatched requests.
    Panic,
}

impl Default for MockGitHubTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl MockGitHubTransport {
    /// Creates a new mock transport.
    pub fn new() -> Self {
        Self {
            responses: Arc::new(RwLock::new(ResponseStore::default())),
            requests: Arc::new(RwLock::new(Vec::new())),
            default_behavior: DefaultBehavior::default(),
        }
    }

    /// Sets the default behavior for unmatched requests.
    pub fn with_default_behavior(mut self, behavior: DefaultBehavior) -> Self {
        self.default_behavior = behavior;
        self
    }

    /// Registers a response for a given method and path.
    ///
    /// Responses registered for the same key are replayed in order.
    pub fn register(&self, method: HttpMethod, path: &str, response: MockResponse) {
        let key = format!("{}:{}", method, path);
        let mut store = self
            .responses
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        store.responses.entry(key).or_default().push(response);
    }

    /// Registers a GET response.
    pub fn on_get(&self, path: &str, response: MockResponse) {
        self.register(HttpMethod::Get, path, response);
    }

    /// Registers a POST response.
    pub fn on_post(&self, path: &str, response: MockResponse) {
        self.register(HttpMethod::Post, path, response);
    }

    /// Registers a PUT response.
    pub fn on_put(&self, path: &str, response: MockResponse) {
        self.register(HttpMethod::Put, path, response);
    }

    /// Registers a PATCH response.
    pub fn on_patch(&self, path: &str, response: MockResponse) {
        self.register(HttpMethod::Patch, path, response);
    }

    /// Registers a DELETE response.
    pub fn on_delete(&self, path: &str, response: MockResponse) {
        self.register(HttpMethod::Delete, path, response);
    }

    fn next_response(&self, method: HttpMethod, path: &str) -> Option<MockResponse> {
        let key = format!("{}:{}", method, path);
        let mut store = self
            .responses
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        store
            .responses
            .get_mut(&key)
            .and_then(|responses| (!responses.is_empty()).then(|| responses.remove(0)))
    }

    /// Gets all recorded requests.
    pub fn requests(&self) -> Vec<MockRequest> {
        self.requests
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Gets requests matching a method and path prefix.
    pub fn requests_matching(&self, method: HttpMethod, path_pattern: &str) -> Vec<MockRequest> {
        self.requests
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|r| r.method == method && r.path.starts_with(path_pattern))
            .cloned()
            .collect()
    }

    /// Clears recorded requests.
    pub fn clear_requests(&self) {
        self.requests
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Returns true if a request with this method and exact path was made.
    pub fn verify_request(&self, method: HttpMethod, path: &str) -> bool {
        self.requests
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .any(|r| r.method == method && r.path == path)
    }

    /// Gets the number of recorded requests.
    pub fn request_count(&self) -> usize {
        self.requests
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[async_trait]
impl Transport for MockGitHubTransport {
    async fn execute(&self, request: TransportRequest) -> GitHubResult<TransportResponse> {
        let TransportRequest {
            method,
            path,
            params,
            options,
        } = request;

        let response = self.next_response(method, &path);
        self.requests
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(MockRequest {
                method,
                path: path.clone(),
                params,
                options,
                timestamp: Utc::now(),
            });

        match response {
            Some(resp) => {
                if let Some(delay) = resp.delay {
                    tokio::time::sleep(delay).await;
                }
                Ok(resp.into())
            }
            None => match self.default_behavior {
                DefaultBehavior::NotFound => Ok(MockResponse::not_found(&format!(
                    "No mock response for {} {}",
                    method, path
                ))
                .into()),
                DefaultBehavior::Error => Err(GitHubError::new(
                    GitHubErrorKind::Unknown,
                    format!("No mock response for {} {}", method, path),
                )),
                DefaultBehavior::Panic => {
                    panic!("No mock response for {} {}", method, path);
                }
            },
        }
    }
}

/// Sample API definitions for tests.
pub mod fixtures {
    use crate::api::{handler_fn, hook_fn, ApiCatalog, ApiDefinition, NamespaceOptions};
    use crate::arguments::Arguments;
    use crate::callbacks::Callback;
    use crate::config::Configuration;
    use crate::errors::{GitHubError, GitHubResult};
    use crate::transport::{Endpoint, Transport};
    use serde_json::Value;
    use std::sync::Arc;

    /// Name of the root definition.
    pub const ROOT: &str = "API";

    /// Builds the root definition with its infrastructure methods and hooks.
    pub fn root() -> ApiDefinition {
        let mut root = ApiDefinition::root(ROOT);
        root.define_method(
            "version",
            handler_fn(|_, _| Ok(Value::from(env!("CARGO_PKG_VERSION")))),
        )
        .define_hook(
            "require_user",
            hook_fn(|client| match client.options().is_set("user") {
                Some(true) => Ok(()),
                _ => Err(GitHubError::missing_parameter("user")),
            }),
        )
        .define_hook(
            "track_requests",
            hook_fn(|client| {
                let count = client
                    .option("requests_made")
                    .and_then(Value::as_u64)
                    .unwrap_or(0);
                client.set("requests_made", count + 1)?;
                Ok(())
            }),
        );
        root
    }

    /// Builds the sample definitions: `Client`, `Client::Repos`,
    /// `Repos::Comments` and `Client::Issues`.
    pub fn definitions() -> Vec<ApiDefinition> {
        let root = root();

        let mut client = root.derive("Client");
        client
            .namespace("repos", NamespaceOptions::new())
            .namespace("issues", NamespaceOptions::new());

        let mut repos = root.derive("Client::Repos");
        repos
            .before_request(Callback::new("require_user").only(["list", "get"]))
            .after_request("track_requests")
            .define_method("list", Endpoint::get("/users/{user}/repos"))
            .define_method("get", Endpoint::get("/repos/{user}/{repo}"))
            .define_method("create", Endpoint::post("/user/repos"))
            .define_private_method(
                "full_name",
                handler_fn(|client, _: Arguments| {
                    let part = |name: &str| {
                        client
                            .option(name)
                            .and_then(Value::as_str)
                            .unwrap_or_default()
                            .to_string()
                    };
                    Ok(Value::from(format!("{}/{}", part("user"), part("repo"))))
                }),
            )
            .namespace("comments", NamespaceOptions::new());

        let mut comments = root.derive("Repos::Comments");
        comments
            .before_request("require_user")
            .define_method("list", Endpoint::get("/repos/{user}/{repo}/comments"));

        let mut issues = root.derive("Client::Issues");
        issues
            .after_request("track_requests")
            .define_method("list", Endpoint::get("/repos/{user}/{repo}/issues"))
            .define_method("create", Endpoint::post("/repos/{user}/{repo}/issues"));

        vec![root, client, repos, comments, issues]
    }

    /// Builds a catalog of the sample definitions.
    pub fn catalog(
        config: Configuration,
        transport: impl Transport + 'static,
    ) -> GitHubResult<Arc<ApiCatalog>> {
        definitions()
            .into_iter()
            .fold(ApiCatalog::builder().configuration(config), |builder, definition| {
                builder.register(definition)
            })
            .transport(transport)
            .build()
    }
}
