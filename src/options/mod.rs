//! Per-client option store and the fluent composer on top of it.
//!
//! Declared properties have a typed slot in [`Settings`] and a mirrored entry
//! in the snapshot. Any other key written through [`OptionStore::set`] becomes
//! an ad-hoc option that lives in the snapshot alone.

mod settings;

pub use settings::{BasicAuth, Settings};

use crate::config::{Configuration, Property, NULL};
use crate::errors::{GitHubError, GitHubResult};
use crate::observability::{redact_option, TracingHooks};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::fmt;

/// Ruby-style truthiness: only `null` and `false` are falsy.
pub fn truthy(value: &Value) -> bool {
    !matches!(value, Value::Null | Value::Bool(false))
}

fn mapping(options: Value) -> GitHubResult<Map<String, Value>> {
    match options {
        Value::Null => Ok(Map::new()),
        Value::Object(map) => Ok(map),
        _ => Err(GitHubError::invalid_options("cannot iterate over value")),
    }
}

/// Configuration snapshot of a single client.
#[derive(Clone, Default)]
pub struct OptionStore {
    settings: Settings,
    current: Map<String, Value>,
    adhoc: BTreeSet<String>,
}

impl OptionStore {
    /// Builds a store from the configuration defaults merged with `options`.
    pub fn setup(config: &Configuration, options: Value) -> GitHubResult<Self> {
        let mut store = Self::default();
        store.reset(config, options)?;
        Ok(store)
    }

    /// Replaces the whole snapshot with defaults merged with `options`.
    ///
    /// Caller values win over defaults. Every declared property is written
    /// through its setter, then `basic_auth` is decomposed into
    /// `login`/`password`.
    pub fn reset(&mut self, config: &Configuration, options: Value) -> GitHubResult<()> {
        let mut merged = config.fetch();
        merged.extend(mapping(options)?);
        self.load(merged)?;

        if let Some(auth) = self.current.get("basic_auth").cloned() {
            self.process_basic_auth(&auth)?;
        }
        Ok(())
    }

    /// Builds a store that continues from a parent snapshot.
    ///
    /// The parent's credentials are taken as they are now. `basic_auth` is
    /// only decomposed again when `overrides` supplies a new one.
    pub fn inherit(
        config: &Configuration,
        parent: &Map<String, Value>,
        overrides: Value,
    ) -> GitHubResult<Self> {
        let overrides = mapping(overrides)?;
        let auth = overrides.get("basic_auth").cloned();

        let mut merged = config.fetch();
        merged.extend(parent.clone());
        merged.extend(overrides);

        let mut store = Self::default();
        store.load(merged)?;
        if let Some(auth) = auth {
            store.process_basic_auth(&auth)?;
        }
        Ok(store)
    }

    fn load(&mut self, merged: Map<String, Value>) -> GitHubResult<()> {
        let mut settings = Settings::default();
        for property in Property::ALL {
            let value = merged.get(property.as_str()).unwrap_or(&Value::Null);
            settings.assign(property, value)?;
        }

        self.adhoc = merged
            .keys()
            .filter(|key| Property::from_name(key).is_none())
            .cloned()
            .collect();
        self.settings = settings;
        self.current = merged;
        Ok(())
    }

    fn process_basic_auth(&mut self, auth: &Value) -> GitHubResult<()> {
        match auth {
            Value::String(token) => {
                let (login, password) = match token.split_once(':') {
                    Some((login, password)) => (login, Some(password)),
                    None => (token.as_str(), None),
                };
                self.set_property(Property::Login, Value::from(login))?;
                self.set_property(
                    Property::Password,
                    password.map(Value::from).unwrap_or(Value::Null),
                )?;
            }
            Value::Object(fields) => {
                let login = fields.get("login").cloned().unwrap_or(Value::Null);
                let password = fields.get("password").cloned().unwrap_or(Value::Null);
                self.set_property(Property::Login, login)?;
                self.set_property(Property::Password, password)?;
            }
            _ => {}
        }
        Ok(())
    }

    /// Writes a declared property to its typed slot and to the snapshot.
    pub fn set_property(&mut self, property: Property, value: Value) -> GitHubResult<&mut Self> {
        self.settings.assign(property, &value)?;
        self.current.insert(property.as_str().to_string(), value);
        Ok(self)
    }

    /// Assigns every entry of a mapping, in order.
    pub fn set_options(&mut self, options: Value) -> GitHubResult<&mut Self> {
        let Value::Object(entries) = options else {
            return Err(GitHubError::invalid_options("cannot iterate over value"));
        };
        for (key, value) in entries {
            self.set(&key, value)?;
        }
        Ok(self)
    }

    /// Assigns a single option.
    ///
    /// `null` is ignored. Declared properties go through their setter; any
    /// other key is stored as an ad-hoc option.
    pub fn set(&mut self, option: &str, value: impl Into<Value>) -> GitHubResult<&mut Self> {
        self.assign(option, value.into(), false)
    }

    /// Assigns the value produced by `block`.
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
        self.assign(option, value, false)
    }

    fn assign(&mut self, option: &str, value: Value, ignore_setter: bool) -> GitHubResult<&mut Self> {
        if value.is_null() {
            return Ok(self);
        }

        if !ignore_setter {
            if let Some(property) = Property::from_name(option) {
                return self.set_property(property, value);
            }
            if self.adhoc.contains(option) {
                return self.assign(option, value, true);
            }
        }

        self.define_option(option, value);
        Ok(self)
    }

    fn define_option(&mut self, option: &str, value: Value) {
        if self.adhoc.insert(option.to_string()) {
            TracingHooks::on_option_defined(option, &redact_option(option, &value));
        }
        self.current.insert(option.to_string(), value);
    }

    /// Sets a scope: either a mapping of options or an `"owner/repository"` string.
    pub fn with(&mut self, scope: impl Into<Value>) -> GitHubResult<&mut Self> {
        match scope.into() {
            options @ Value::Object(_) => self.set_options(options),
            Value::String(path) => {
                let (user, repo) = path
                    .split_once('/')
                    .filter(|(user, repo)| !user.is_empty() && !repo.is_empty())
                    .ok_or_else(GitHubError::unsupported_scope)?;
                let mut options = Map::new();
                options.insert("user".into(), Value::from(user));
                options.insert("repo".into(), Value::from(repo));
                self.set_options(Value::Object(options))
            }
            _ => Err(GitHubError::unsupported_scope()),
        }
    }

    /// Returns true when `name` is a declared property or a known ad-hoc option.
    pub fn responds_to(&self, name: &str) -> bool {
        Property::from_name(name).is_some() || self.adhoc.contains(name)
    }

    /// Reads an option by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        if self.responds_to(name) {
            Some(self.current.get(name).unwrap_or(&NULL))
        } else {
            None
        }
    }

    /// Reads the truthiness of an option, `None` when nothing answers to `name`.
    pub fn is_set(&self, name: &str) -> Option<bool> {
        self.get(name).map(truthy)
    }

    /// Sets an option to `null`, `None` when nothing answers to `name`.
    pub fn clear(&mut self, name: &str) -> Option<GitHubResult<&mut Self>> {
        if let Some(property) = Property::from_name(name) {
            return Some(self.set_property(property, Value::Null));
        }
        if self.adhoc.contains(name) {
            self.current.insert(name.to_string(), Value::Null);
            return Some(Ok(self));
        }
        None
    }

    /// Gets the typed property slots.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Gets the snapshot.
    pub fn current(&self) -> &Map<String, Value> {
        &self.current
    }

    /// Gets the names of ad-hoc options.
    pub fn adhoc_names(&self) -> impl Iterator<Item = &str> {
        self.adhoc.iter().map(String::as_str)
    }
}

impl fmt::Debug for OptionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redacted: Map<String, Value> = self
            .current
            .iter()
            .map(|(key, value)| (key.clone(), redact_option(key, value)))
            .collect();
        f.debug_struct("OptionStore")
            .field("current", &redacted)
            .field("adhoc", &self.adhoc)
            .finish()
    }
}
