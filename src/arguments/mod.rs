//! Arguments passed to request methods and the parser seam that normalizes them.

use crate::client::GitHubClient;
use crate::errors::GitHubResult;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Positional and named arguments of a request method call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Arguments {
    /// Positional arguments.
    #[serde(default)]
    pub positional: Vec<Value>,
    /// Named parameters.
    #[serde(default)]
    pub params: Map<String, Value>,
}

impl Arguments {
    /// Creates an empty argument list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a positional argument.
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// Adds a named parameter.
    pub fn param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Gets a positional argument.
    pub fn positional(&self, index: usize) -> Option<&Value> {
        self.positional.get(index)
    }

    /// Gets a named parameter.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.params.get(name)
    }

    /// Returns true if there are no arguments.
    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.params.is_empty()
    }
}

/// Validates and normalizes the arguments of a request method.
///
/// The parsed value is stored on the client and read back through
/// [`GitHubClient::arguments`].
pub trait ArgumentsParser: Send + Sync {
    /// Parses `args` in the context of `client`.
    fn parse(&self, client: &GitHubClient, args: Arguments) -> GitHubResult<Arguments>;
}

/// Parser that accepts arguments unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughParser;

impl ArgumentsParser for PassthroughParser {
    fn parse(&self, _client: &GitHubClient, args: Arguments) -> GitHubResult<Arguments> {
        Ok(args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder() {
        let args = Arguments::new()
            .arg("octocat")
            .arg("hello-world")
            .param("state", "open");

        assert_eq!(args.positional(1), Some(&json!("hello-world")));
        assert_eq!(args.get("state"), Some(&json!("open")));
        assert!(!args.is_empty());
        assert!(Arguments::new().is_empty());
    }

    #[test]
    fn test_deserialize_partial() {
        let args: Arguments = serde_json::from_value(json!({"params": {"per_page": 50}})).unwrap();
        assert!(args.positional.is_empty());
        assert_eq!(args.get("per_page"), Some(&json!(50)));
    }
}
