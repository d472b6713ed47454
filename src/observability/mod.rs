//! Structured logging for dispatch, hooks, options and namespaces.

use crate::config::Property;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// Placeholder written in place of secret option values.
pub const REDACTED: &str = "[REDACTED]";

/// Option keys that should be redacted in logs, besides sensitive properties.
pub const SENSITIVE_OPTIONS: &[&str] = &["token", "access_token", "secret", "authorization"];

/// Redacts the value of a secret-bearing option.
pub fn redact_option(name: &str, value: &Value) -> Value {
    let sensitive = Property::from_name(name).map_or(false, |p| p.is_sensitive())
        || SENSITIVE_OPTIONS.contains(&name.to_lowercase().as_str());

    if sensitive && !value.is_null() {
        Value::from(REDACTED)
    } else {
        value.clone()
    }
}

/// Hook kind as it appears in log fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookPhase {
    /// Before the request body.
    Before,
    /// After the request body.
    After,
}

impl HookPhase {
    /// Gets the phase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Before => "before",
            Self::After => "after",
        }
    }
}

/// Tracing hooks for the dispatch core.
pub struct TracingHooks;

impl TracingHooks {
    /// Logs a method being intercepted at definition time.
    pub fn on_method_intercepted(api: &str, method: &str) {
        debug!(api = %api, method = %method, "Request method intercepted");
    }

    /// Logs a method body replaced on an already intercepted name.
    pub fn on_method_redefined(api: &str, method: &str) {
        debug!(api = %api, method = %method, "Intercepted method redefined");
    }

    /// Logs a hook about to run.
    pub fn on_hook(phase: HookPhase, callback: &str) {
        debug!(phase = phase.as_str(), callback = %callback, "Running request hook");
    }

    /// Logs the completion of a request method.
    pub fn on_action_complete(action: &str, duration: Duration) {
        debug!(
            action = %action,
            duration_ms = duration.as_millis() as u64,
            "Request method completed"
        );
    }

    /// Logs a failed request method.
    pub fn on_action_error(action: &str, error: &str) {
        warn!(action = %action, error = %error, "Request method failed");
    }

    /// Logs an ad-hoc option being synthesized.
    pub fn on_option_defined(name: &str, value: &Value) {
        debug!(option = %name, value = %value, "Ad-hoc option defined");
    }

    /// Logs a namespace being instantiated.
    pub fn on_namespace(name: &str, target: &str) {
        debug!(namespace = %name, target = %target, "Namespace instantiated");
    }
}
