//! GitHub API client: one instance of an API definition with its own options.

mod pipeline;

use crate::api::{ApiCatalog, ApiDefinition, Visibility};
use crate::arguments::Arguments;
use crate::config::Property;
use crate::errors::{GitHubError, GitHubResult};
use crate::observability::TracingHooks;
use crate::options::{OptionStore, Settings};
use crate::transport::Transport;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// Outcome of [`GitHubClient::dispatch`].
#[derive(Debug)]
pub enum Dispatched {
    /// A method result or an option value.
    Value(Value),
    /// Truthiness of an option queried as `name?`.
    Flag(bool),
    /// A client built for a namespace.
    Namespace(GitHubClient),
    /// An option cleared through `clear_name`.
    Cleared,
}

impl Dispatched {
    /// Gets the value, if this is a value outcome.
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Value(value) => Some(value),
            _ => None,
        }
    }

    /// Gets the flag, if this is a flag outcome.
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Flag(flag) => Some(*flag),
            _ => None,
        }
    }

    /// Consumes the outcome into a namespace client.
    pub fn into_namespace(self) -> Option<GitHubClient> {
        match self {
            Self::Namespace(client) => Some(client),
            _ => None,
        }
    }
}

/// GitHub API client.
pub struct GitHubClient {
    /// Definition this client is an instance of.
    definition: Arc<ApiDefinition>,
    /// Catalog the definition was taken from.
    catalog: Arc<ApiCatalog>,
    /// Configuration snapshot.
    options: OptionStore,
    /// Last parsed arguments.
    arguments: Option<Arguments>,
}

impl GitHubClient {
    /// Creates a client of `definition` with `options` merged over the
    /// catalog's configuration defaults.
    pub fn new(
        catalog: Arc<ApiCatalog>,
        definition: Arc<ApiDefinition>,
        options: Value,
    ) -> GitHubResult<Self> {
        let options = OptionStore::setup(catalog.configuration(), options)?;
        Ok(Self::from_store(catalog, definition, options))
    }

    pub(crate) fn from_store(
        catalog: Arc<ApiCatalog>,
        definition: Arc<ApiDefinition>,
        options: OptionStore,
    ) -> Self {
        Self {
            definition,
            catalog,
            options,
            arguments: None,
        }
    }

    /// Creates a builder for a client of the definition `name`.
    pub fn builder(catalog: &Arc<ApiCatalog>, name: impl Into<String>) -> GitHubClientBuilder {
        GitHubClientBuilder::new(Arc::clone(catalog), name)
    }

    /// Runs `f` against the freshly built client.
    pub fn configure<F>(mut self, f: F) -> GitHubResult<Self>
    where
        F: FnOnce(&mut Self) -> GitHubResult<()>,
    {
        f(&mut self)?;
        Ok(self)
    }

    /// Gets the definition.
    pub fn definition(&self) -> &Arc<ApiDefinition> {
        &self.definition
    }

    /// Gets the name of the definition.
    pub fn api_name(&self) -> &str {
        self.definition.name()
    }

    /// Gets the catalog.
    pub fn catalog(&self) -> &Arc<ApiCatalog> {
        &self.catalog
    }

    /// Gets the option store.
    pub fn options(&self) -> &OptionStore {
        &self.options
    }

    /// Gets the typed property slots.
    pub fn settings(&self) -> &Settings {
        self.options.settings()
    }

    /// Gets the configuration snapshot.
    pub fn current_options(&self) -> &Map<String, Value> {
        self.options.current()
    }

    /// Reads an option by name.
    pub fn option(&self, name: &str) -> Option<&Value> {
        self.options.get(name)
    }

    /// Replaces the snapshot with the configuration defaults merged with `options`.
    pub fn setup(&mut self, options: Value) -> GitHubResult<&mut Self> {
        self.options.reset(self.catalog.configuration(), options)?;
        Ok(self)
    }

    /// Writes a declared property.
    pub fn set_property(&mut self, property: Property, value: Value) -> GitHubResult<&mut Self> {
        self.options.set_property(property, value)?;
        Ok(self)
    }

    /// Assigns a single option. `null` is ignored.
    pub fn set(&mut self, option: &str, value: impl Into<Value>) -> GitHubResult<&mut Self> {
        self.options.set(option, value)?;
        Ok(self)
    }

    /// Assigns every entry of a mapping, in order.
    pub fn set_options(&mut self, options: Value) -> GitHubResult<&mut Self> {
        self.options.set_options(options)?;
        Ok(self)
    }

    /// Assigns the value produced by `block`, which sees the client as it is.
    ///
    /// Fails when an explicit value is supplied as well.
    pub fn set_lazy<F>(
        &mut self,
        option: &str,
        explicit: Option<Value>,
        block: F,
    ) -> GitHubResult<&mut Self>
    where
        F: FnOnce(&Self) -> Value,
    {
        if explicit.is_some() {
            return Err(GitHubError::conflicting_value(option));
        }
        let value = block(self);
        self.set(option, value)
    }

    /// Sets a scope: a mapping of options or an `"owner/repository"` string.
    pub fn with(&mut self, scope: impl Into<Value>) -> GitHubResult<&mut Self> {
        self.options.with(scope)?;
        Ok(self)
    }

    /// Reads the truthiness of an option.
    pub fn is_set(&self, name: &str) -> GitHubResult<bool> {
        self.options
            .is_set(name)
            .ok_or_else(|| GitHubError::no_such_method(&format!("{}?", name), self.api_name()))
    }

    /// Sets an option to `null`.
    pub fn clear(&mut self, name: &str) -> GitHubResult<&mut Self> {
        match self.options.clear(name) {
            Some(result) => {
                result?;
                Ok(self)
            }
            None => Err(GitHubError::no_such_method(
                &format!("clear_{}", name),
                self.api_name(),
            )),
        }
    }

    /// Gets the last parsed arguments.
    pub fn arguments(&self) -> Option<&Arguments> {
        self.arguments.as_ref()
    }

    /// Parses `args` with the catalog's parser and stores the result.
    pub fn parse_arguments(&mut self, args: Arguments) -> GitHubResult<&Arguments> {
        let parser = Arc::clone(self.catalog.arguments_parser());
        let parsed = parser.parse(self, args)?;
        Ok(&*self.arguments.insert(parsed))
    }

    /// Gets the catalog's transport.
    pub fn transport(&self) -> GitHubResult<Arc<dyn Transport>> {
        self.catalog
            .transport()
            .cloned()
            .ok_or_else(GitHubError::missing_transport)
    }

    /// Lists the request methods of the definition.
    pub fn actions(&self) -> Vec<&str> {
        self.definition.actions().collect()
    }

    /// Returns true if `name` is a public method, a namespace or an option.
    pub fn responds_to(&self, name: &str) -> bool {
        self.definition.visibility(name) == Some(Visibility::Public)
            || self.definition.namespace_binding(name).is_some()
            || self.options.responds_to(name)
    }

    /// Calls a public method.
    ///
    /// Request methods run through the before and after hooks; anything else
    /// runs its body directly.
    pub async fn call(&mut self, name: &str, args: Arguments) -> GitHubResult<Value> {
        if self.definition.visibility(name) != Some(Visibility::Public) {
            return Err(GitHubError::no_such_method(name, self.api_name()));
        }
        self.invoke(name, args, true).await
    }

    /// Calls a private helper method. Helpers never run hooks.
    pub async fn call_helper(&mut self, name: &str, args: Arguments) -> GitHubResult<Value> {
        if self.definition.visibility(name) != Some(Visibility::Private) {
            return Err(GitHubError::no_such_method(name, self.api_name()));
        }
        self.invoke(name, args, false).await
    }

    /// Calls the raw body of a method, skipping hooks.
    pub async fn call_without_callbacks(
        &mut self,
        name: &str,
        args: Arguments,
    ) -> GitHubResult<Value> {
        if self.definition.method(name).is_none() {
            return Err(GitHubError::no_such_method(name, self.api_name()));
        }
        self.invoke(name, args, false).await
    }

    async fn invoke(&mut self, name: &str, args: Arguments, hooks: bool) -> GitHubResult<Value> {
        let definition = Arc::clone(&self.definition);
        let handler = definition
            .method(name)
            .cloned()
            .ok_or_else(|| GitHubError::no_such_method(name, self.api_name()))?;

        if hooks && definition.is_intercepted(name) {
            self.execute(name, handler, args).await
        } else {
            handler.call(self, args).await
        }
    }

    /// Builds a client for the namespace `name` with the current snapshot.
    pub fn namespace(&self, name: &str) -> GitHubResult<GitHubClient> {
        self.namespace_with(name, Value::Null)
    }

    /// Builds a client for the namespace `name` with `overrides` merged over
    /// the current snapshot.
    pub fn namespace_with(&self, name: &str, overrides: Value) -> GitHubResult<GitHubClient> {
        let binding = self
            .definition
            .namespace_binding(name)
            .ok_or_else(|| GitHubError::no_such_method(name, self.api_name()))?;

        let options = OptionStore::inherit(
            self.catalog.configuration(),
            self.options.current(),
            overrides,
        )?;
        let definition = self
            .catalog
            .definition(binding.target())
            .cloned()
            .ok_or_else(|| GitHubError::unknown_api(binding.target()))?;

        let client = Self::from_store(Arc::clone(&self.catalog), definition, options);
        TracingHooks::on_namespace(name, binding.target());
        Ok(client)
    }

    /// Resolves `name` the way a dynamic call would.
    ///
    /// Tried in order: a public method, a namespace (named parameters become
    /// overrides), an option getter, `name?` for truthiness and `clear_name`
    /// to reset an option.
    pub async fn dispatch(&mut self, name: &str, args: Arguments) -> GitHubResult<Dispatched> {
        if self.definition.visibility(name) == Some(Visibility::Public) {
            return self.call(name, args).await.map(Dispatched::Value);
        }

        if self.definition.namespace_binding(name).is_some() {
            return self
                .namespace_with(name, Value::Object(args.params))
                .map(Dispatched::Namespace);
        }

        if let Some(value) = self.options.get(name) {
            return Ok(Dispatched::Value(value.clone()));
        }

        if let Some(option) = name.strip_suffix('?') {
            if let Some(flag) = self.options.is_set(option) {
                return Ok(Dispatched::Flag(flag));
            }
        }

        if let Some(option) = name.strip_prefix("clear_") {
            if let Some(result) = self.options.clear(option) {
                result?;
                return Ok(Dispatched::Cleared);
            }
        }

        Err(GitHubError::no_such_method(name, self.api_name()))
    }
}

impl fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitHubClient")
            .field("api", &self.definition.name())
            .field("options", &self.options)
            .field("arguments", &self.arguments)
            .finish()
    }
}

/// Builder for [`GitHubClient`].
pub struct GitHubClientBuilder {
    catalog: Arc<ApiCatalog>,
    name: String,
    options: Map<String, Value>,
}

impl GitHubClientBuilder {
    /// Creates a new builder.
    pub fn new(catalog: Arc<ApiCatalog>, name: impl Into<String>) -> Self {
        Self {
            catalog,
            name: name.into(),
            options: Map::new(),
        }
    }

    /// Sets an initial option.
    pub fn option(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(name.into(), value.into());
        self
    }

    /// Sets basic authentication as `"login:password"`.
    pub fn basic_auth(self, credentials: impl Into<String>) -> Self {
        self.option(Property::BasicAuth.as_str(), credentials.into())
    }

    /// Sets an OAuth token.
    pub fn oauth_token(self, token: impl Into<String>) -> Self {
        self.option(Property::OauthToken.as_str(), token.into())
    }

    /// Sets the API endpoint.
    pub fn endpoint(self, url: impl Into<String>) -> Self {
        self.option(Property::Endpoint.as_str(), url.into())
    }

    /// Builds the client.
    pub fn build(self) -> GitHubResult<GitHubClient> {
        self.catalog.client(&self.name, Value::Object(self.options))
    }
}
