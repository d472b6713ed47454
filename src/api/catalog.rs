//! Process-wide registry of API definitions and shared collaborators.

use super::definition::ApiDefinition;
use crate::arguments::{ArgumentsParser, PassthroughParser};
use crate::client::GitHubClient;
use crate::config::Configuration;
use crate::errors::{GitHubError, GitHubResult};
use crate::transport::Transport;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Registry of API definitions, keyed by fully qualified name.
pub struct ApiCatalog {
    config: Configuration,
    definitions: HashMap<String, Arc<ApiDefinition>>,
    parser: Arc<dyn ArgumentsParser>,
    transport: Option<Arc<dyn Transport>>,
}

impl ApiCatalog {
    /// Creates a builder.
    pub fn builder() -> ApiCatalogBuilder {
        ApiCatalogBuilder::new()
    }

    /// Gets the global configuration.
    pub fn configuration(&self) -> &Configuration {
        &self.config
    }

    /// Gets a definition by fully qualified name.
    pub fn definition(&self, name: &str) -> Option<&Arc<ApiDefinition>> {
        self.definitions.get(name)
    }

    /// Lists the registered definition names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.definitions.keys().map(String::as_str)
    }

    /// Constructs a client of the definition `name`.
    pub fn client(self: &Arc<Self>, name: &str, options: Value) -> GitHubResult<GitHubClient> {
        let definition = self
            .definition(name)
            .cloned()
            .ok_or_else(|| GitHubError::unknown_api(name))?;
        GitHubClient::new(Arc::clone(self), definition, options)
    }

    /// Gets the transport, if one was configured.
    pub fn transport(&self) -> Option<&Arc<dyn Transport>> {
        self.transport.as_ref()
    }

    /// Gets the arguments parser.
    pub fn arguments_parser(&self) -> &Arc<dyn ArgumentsParser> {
        &self.parser
    }
}

impl fmt::Debug for ApiCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.definitions.keys().collect();
        names.sort();
        f.debug_struct("ApiCatalog")
            .field("definitions", &names)
            .field("transport", &self.transport.is_some())
            .finish()
    }
}

/// Builder for [`ApiCatalog`].
pub struct ApiCatalogBuilder {
    config: Option<Configuration>,
    definitions: Vec<ApiDefinition>,
    parser: Option<Arc<dyn ArgumentsParser>>,
    transport: Option<Arc<dyn Transport>>,
}

impl ApiCatalogBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self {
            config: None,
            definitions: Vec::new(),
            parser: None,
            transport: None,
        }
    }

    /// Sets the global configuration.
    pub fn configuration(mut self, config: Configuration) -> Self {
        self.config = Some(config);
        self
    }

    /// Registers a definition.
    pub fn register(mut self, definition: ApiDefinition) -> Self {
        self.definitions.push(definition);
        self
    }

    /// Sets the arguments parser.
    pub fn arguments_parser(mut self, parser: impl ArgumentsParser + 'static) -> Self {
        self.parser = Some(Arc::new(parser));
        self
    }

    /// Sets the transport.
    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Builds the catalog.
    pub fn build(self) -> GitHubResult<Arc<ApiCatalog>> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let mut definitions = HashMap::with_capacity(self.definitions.len());
        for definition in self.definitions {
            let name = definition.name().to_string();
            if definitions.insert(name.clone(), Arc::new(definition)).is_some() {
                return Err(GitHubError::configuration(format!(
                    "api `{}` is registered twice",
                    name
                )));
            }
        }

        Ok(Arc::new(ApiCatalog {
            config,
            definitions,
            parser: self
                .parser
                .unwrap_or_else(|| Arc::new(PassthroughParser)),
            transport: self.transport,
        }))
    }
}

impl Default for ApiCatalogBuilder {
    fn default() -> Self {
        Self::new()
    }
}
