//! API definitions: the declared surface of one API type.
//!
//! A definition is derived from a parent and starts as a copy of it: methods,
//! hooks, callbacks and namespaces. Public methods defined on a derived
//! definition are request methods and run through the hook pipeline. Methods
//! inherited from the root stay plain unless redefined.

use super::handler::{Hook, RequestHandler};
use super::namespace::{NamespaceBinding, NamespaceOptions};
use crate::callbacks::{Callback, CallbackKind, CallbackRegistry};
use crate::observability::TracingHooks;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

/// Method names reserved for infrastructure on every definition.
pub const RESERVED_METHODS: &[&str] = &["actions"];

/// Visibility of a defined method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Part of the API surface, intercepted when defined on a derived definition.
    Public,
    /// Helper, never intercepted.
    Private,
}

#[derive(Clone)]
struct MethodEntry {
    handler: Arc<dyn RequestHandler>,
    visibility: Visibility,
}

/// Declared surface of one API type.
#[derive(Clone)]
pub struct ApiDefinition {
    name: String,
    root: bool,
    methods: BTreeMap<String, MethodEntry>,
    hooks: BTreeMap<String, Arc<dyn Hook>>,
    callbacks: CallbackRegistry,
    namespaces: BTreeMap<String, NamespaceBinding>,
    request_methods: BTreeSet<String>,
    wrapped: BTreeSet<String>,
}

impl ApiDefinition {
    /// Creates a root definition. Its methods are infrastructure and never
    /// run through hooks.
    pub fn root(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            root: true,
            methods: BTreeMap::new(),
            hooks: BTreeMap::new(),
            callbacks: CallbackRegistry::new(),
            namespaces: BTreeMap::new(),
            request_methods: BTreeSet::new(),
            wrapped: BTreeSet::new(),
        }
    }

    /// Derives a child definition named `name`.
    ///
    /// The child receives a copy of everything declared on `self` so far.
    /// Later declarations on `self` do not reach the child.
    pub fn derive(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            root: false,
            methods: self.methods.clone(),
            hooks: self.hooks.clone(),
            callbacks: self.callbacks.clone(),
            namespaces: self.namespaces.clone(),
            request_methods: self.request_methods.clone(),
            wrapped: self.wrapped.clone(),
        }
    }

    /// Gets the fully qualified name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets the last `::` segment of the name.
    pub fn short_name(&self) -> &str {
        self.name.rsplit("::").next().unwrap_or(&self.name)
    }

    /// Returns true for the root definition.
    pub fn is_root(&self) -> bool {
        self.root
    }

    /// Defines a public method.
    pub fn define_method<H>(&mut self, name: &str, handler: H) -> &mut Self
    where
        H: RequestHandler + 'static,
    {
        self.define_method_with_visibility(name, Visibility::Public, handler)
    }

    /// Defines a private helper method.
    pub fn define_private_method<H>(&mut self, name: &str, handler: H) -> &mut Self
    where
        H: RequestHandler + 'static,
    {
        self.define_method_with_visibility(name, Visibility::Private, handler)
    }

    /// Defines a method and decides whether calls to it run through hooks.
    pub fn define_method_with_visibility<H>(
        &mut self,
        name: &str,
        visibility: Visibility,
        handler: H,
    ) -> &mut Self
    where
        H: RequestHandler + 'static,
    {
        let is_request_method = self.classify(name, visibility);
        self.methods.insert(
            name.to_string(),
            MethodEntry {
                handler: Arc::new(handler),
                visibility,
            },
        );

        if !is_request_method {
            self.request_methods.remove(name);
            self.wrapped.remove(name);
            return self;
        }

        self.request_methods.insert(name.to_string());
        if self.wrapped.insert(name.to_string()) {
            TracingHooks::on_method_intercepted(&self.name, name);
        } else {
            TracingHooks::on_method_redefined(&self.name, name);
        }
        self
    }

    fn classify(&self, name: &str, visibility: Visibility) -> bool {
        !self.root && visibility == Visibility::Public && !RESERVED_METHODS.contains(&name)
    }

    /// Defines a hook that callbacks can refer to by name.
    pub fn define_hook<H>(&mut self, name: &str, hook: H) -> &mut Self
    where
        H: Hook + 'static,
    {
        self.hooks.insert(name.to_string(), Arc::new(hook));
        self
    }

    /// Registers a callback to run before request methods.
    pub fn before_request(&mut self, callback: impl Into<Callback>) -> &mut Self {
        self.callbacks.register(CallbackKind::Before, callback.into());
        self
    }

    /// Registers a callback to run after request methods.
    pub fn after_request(&mut self, callback: impl Into<Callback>) -> &mut Self {
        self.callbacks.register(CallbackKind::After, callback.into());
        self
    }

    /// Declares a namespace.
    ///
    /// The first declaration of a name wins, and a name already taken by a
    /// public method is left alone.
    pub fn namespace(&mut self, name: &str, options: NamespaceOptions) -> &mut Self {
        let taken_by_method = self
            .methods
            .get(name)
            .map_or(false, |entry| entry.visibility == Visibility::Public);
        if taken_by_method || self.namespaces.contains_key(name) {
            return self;
        }

        let binding = NamespaceBinding::new(self.short_name(), name, &options);
        self.namespaces.insert(name.to_string(), binding);
        self
    }

    /// Gets the callback registry.
    pub fn callbacks(&self) -> &CallbackRegistry {
        &self.callbacks
    }

    /// Gets the body of a method.
    pub fn method(&self, name: &str) -> Option<&Arc<dyn RequestHandler>> {
        self.methods.get(name).map(|entry| &entry.handler)
    }

    /// Gets the visibility of a method.
    pub fn visibility(&self, name: &str) -> Option<Visibility> {
        self.methods.get(name).map(|entry| entry.visibility)
    }

    /// Gets a hook by name.
    pub fn hook(&self, name: &str) -> Option<&Arc<dyn Hook>> {
        self.hooks.get(name)
    }

    /// Returns true if calls to `name` run through the hook pipeline.
    pub fn is_intercepted(&self, name: &str) -> bool {
        self.wrapped.contains(name)
    }

    /// Returns true if `name` is a request method.
    pub fn is_request_method(&self, name: &str) -> bool {
        self.request_methods.contains(name)
    }

    /// Lists the request methods.
    pub fn actions(&self) -> impl Iterator<Item = &str> {
        self.request_methods.iter().map(String::as_str)
    }

    /// Gets a namespace binding.
    pub fn namespace_binding(&self, name: &str) -> Option<&NamespaceBinding> {
        self.namespaces.get(name)
    }

    /// Lists the namespace bindings.
    pub fn namespaces(&self) -> impl Iterator<Item = &NamespaceBinding> {
        self.namespaces.values()
    }
}

impl fmt::Debug for ApiDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiDefinition")
            .field("name", &self.name)
            .field("root", &self.root)
            .field("methods", &self.methods.keys().collect::<Vec<_>>())
            .field("hooks", &self.hooks.keys().collect::<Vec<_>>())
            .field("callbacks", &self.callbacks)
            .field("namespaces", &self.namespaces)
            .field("request_methods", &self.request_methods)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::handler::{handler_fn, hook_fn};
    use serde_json::Value;

    fn noop() -> impl RequestHandler {
        handler_fn(|_, _| Ok(Value::Null))
    }

    #[test]
    fn test_inherited_root_methods_are_not_intercepted() {
        let mut root = ApiDefinition::root("API");
        root.define_method("arguments", noop());
        root.define_method("version", noop());
        assert!(!root.is_intercepted("arguments"));

        let mut repos = root.derive("Repos");
        repos.define_method("list", noop());

        assert!(repos.is_intercepted("list"));
        assert!(!repos.is_intercepted("version"));
        assert!(repos.method("version").is_some());
        assert_eq!(repos.actions().collect::<Vec<_>>(), vec!["list"]);
    }

    #[test]
    fn test_local_override_of_root_method_is_intercepted() {
        let mut root = ApiDefinition::root("API");
        root.define_method("version", noop());

        let mut repos = root.derive("Repos");
        repos.define_method("version", noop());

        assert!(repos.is_intercepted("version"));
        assert!(repos.is_request_method("version"));
        assert!(!root.is_intercepted("version"));

        let forks = repos.derive("Repos::Forks");
        assert!(forks.is_intercepted("version"));
    }

    #[test]
    fn test_private_and_reserved_methods_are_plain() {
        let mut repos = ApiDefinition::root("API").derive("Repos");
        repos.define_private_method("build_path", noop());
        repos.define_method("actions", noop());

        assert!(!repos.is_intercepted("build_path"));
        assert!(!repos.is_intercepted("actions"));
        assert!(repos.method("build_path").is_some());
        assert_eq!(repos.actions().count(), 0);
    }

    #[test]
    fn test_redefinition_does_not_wrap_twice() {
        let mut repos = ApiDefinition::root("API").derive("Repos");
        repos.define_method("list", noop());
        repos.define_method("list", noop());

        assert!(repos.is_intercepted("list"));
        assert_eq!(repos.actions().count(), 1);
    }

    #[test]
    fn test_redefining_as_private_drops_interception() {
        let mut repos = ApiDefinition::root("API").derive("Repos");
        repos.define_method("list", noop());
        repos.define_private_method("list", noop());

        assert!(!repos.is_intercepted("list"));
        assert!(!repos.is_request_method("list"));
    }

    #[test]
    fn test_derive_snapshots_callbacks() {
        let mut base = ApiDefinition::root("API").derive("Base");
        base.before_request("authenticate").after_request("audit");

        let mut child = base.derive("Child");
        child.before_request("validate");
        base.before_request("late");

        let before: Vec<_> = child
            .callbacks()
            .callbacks(CallbackKind::Before)
            .iter()
            .map(|c| c.callback.as_str())
            .collect();
        assert_eq!(before, vec!["authenticate", "validate"]);
        assert_eq!(child.callbacks().callbacks(CallbackKind::After).len(), 1);
    }

    #[test]
    fn test_derived_methods_stay_intercepted() {
        let mut repos = ApiDefinition::root("API").derive("Repos");
        repos.define_method("list", noop());
        repos.define_hook("authenticate", hook_fn(|_| Ok(())));

        let forks = repos.derive("Repos::Forks");
        assert!(forks.is_intercepted("list"));
        assert!(forks.hook("authenticate").is_some());
    }

    #[test]
    fn test_namespace_first_declaration_wins() {
        let mut client = ApiDefinition::root("API").derive("Client");
        client.namespace("issues", NamespaceOptions::new());
        client.namespace("issues", NamespaceOptions::new().root());

        assert_eq!(
            client.namespace_binding("issues").map(|b| b.target()),
            Some("Client::Issues")
        );
    }

    #[test]
    fn test_namespace_skipped_when_method_exists() {
        let mut client = ApiDefinition::root("API").derive("Client");
        client.define_method("repos", noop());
        client.namespace("repos", NamespaceOptions::new());

        assert!(client.namespace_binding("repos").is_none());
    }

    #[test]
    fn test_short_name() {
        let definition = ApiDefinition::root("API").derive("Repos::Comments");
        assert_eq!(definition.short_name(), "Comments");
        assert_eq!(ApiDefinition::root("API").short_name(), "API");
    }
}
