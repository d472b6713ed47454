//! Generic request body that forwards a templated path to the transport.

use super::{HttpMethod, TransportRequest};
use crate::api::RequestHandler;
use crate::arguments::Arguments;
use crate::client::GitHubClient;
use crate::errors::{GitHubError, GitHubResult};
use async_trait::async_trait;
use serde_json::{Map, Value};

/// A request method backed by a path template such as `/repos/{user}/{repo}`.
///
/// Placeholders are filled from named parameters, then from positional
/// arguments in order, then from the client's options. Remaining named
/// parameters are sent as request parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    method: HttpMethod,
    path: String,
}

impl Endpoint {
    /// Creates an endpoint.
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
        }
    }

    /// Creates a GET endpoint.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    /// Creates a POST endpoint.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    /// Creates a PUT endpoint.
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, path)
    }

    /// Creates a PATCH endpoint.
    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Patch, path)
    }

    /// Creates a DELETE endpoint.
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    /// Gets the HTTP method.
    pub fn method(&self) -> HttpMethod {
        self.method
    }

    /// Gets the path template.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Renders the path template and returns it with the unused parameters.
    pub fn render(
        &self,
        args: Arguments,
        options: &Map<String, Value>,
    ) -> GitHubResult<(String, Map<String, Value>)> {
        let Arguments { positional, mut params } = args;
        let mut positional = positional.into_iter().filter(|value| !value.is_null());

        let mut path = String::with_capacity(self.path.len());
        let mut rest = self.path.as_str();
        while let Some(start) = rest.find('{') {
            path.push_str(&rest[..start]);
            let after = &rest[start + 1..];
            let end = after.find('}').ok_or_else(|| {
                GitHubError::configuration(format!("unterminated placeholder in `{}`", self.path))
            })?;
            let name = &after[..end];

            let value = params
                .remove(name)
                .filter(|value| !value.is_null())
                .or_else(|| positional.next())
                .or_else(|| options.get(name).filter(|value| !value.is_null()).cloned())
                .ok_or_else(|| GitHubError::missing_parameter(name))?;
            path.push_str(&segment(name, &value)?);

            rest = &after[end + 1..];
        }
        path.push_str(rest);

        Ok((path, params))
    }
}

fn segment(name: &str, value: &Value) -> GitHubResult<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(GitHubError::invalid_option_value(name, "a string or number")),
    }
}

#[async_trait]
impl RequestHandler for Endpoint {
    async fn call(&self, client: &mut GitHubClient, args: Arguments) -> GitHubResult<Value> {
        let transport = client.transport()?;
        let args = client.parse_arguments(args)?.clone();
        let (path, params) = self.render(args, client.current_options())?;

        let request = TransportRequest::new(self.method, path)
            .with_params(params)
            .with_options(client.current_options().clone());
        let response = transport.execute(request).await?;

        if !response.is_success() {
            let message = response
                .body
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| format!("HTTP {}", response.status));
            return Err(GitHubError::from_response(response.status, message)
                .with_api(client.api_name()));
        }

        Ok(response.body)
    }
}
