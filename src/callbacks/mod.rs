//! Before/after request hook descriptors and their per-definition registry.

use crate::observability::HookPhase;
use std::collections::BTreeSet;

/// Which side of the request body a callback runs on.
pub type CallbackKind = HookPhase;

/// A registered hook: the name it resolves by and an optional method filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Callback {
    /// Hook name, resolved against the client's definition at call time.
    pub callback: String,
    /// Method names the hook is limited to. `None` means every request method.
    pub only: Option<BTreeSet<String>>,
}

impl Callback {
    /// Creates a callback that applies to every request method.
    pub fn new(callback: impl Into<String>) -> Self {
        Self {
            callback: callback.into(),
            only: None,
        }
    }

    /// Limits the callback to the given method names.
    pub fn only<I, S>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.only = Some(methods.into_iter().map(Into::into).collect());
        self
    }

    /// Returns true if the callback applies to `action`.
    pub fn applies_to(&self, action: &str) -> bool {
        self.only
            .as_ref()
            .map_or(true, |methods| methods.contains(action))
    }
}

impl From<&str> for Callback {
    fn from(callback: &str) -> Self {
        Self::new(callback)
    }
}

impl From<String> for Callback {
    fn from(callback: String) -> Self {
        Self::new(callback)
    }
}

/// Ordered before and after callbacks of one API definition.
///
/// A derived definition starts from a clone of its parent's registry, so
/// ancestor callbacks keep their order and run ahead of the child's own.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallbackRegistry {
    before: Vec<Callback>,
    after: Vec<Callback>,
}

impl CallbackRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a callback of the given kind.
    pub fn register(&mut self, kind: CallbackKind, callback: Callback) {
        match kind {
            CallbackKind::Before => self.before.push(callback),
            CallbackKind::After => self.after.push(callback),
        }
    }

    /// Gets every callback of the given kind, in registration order.
    pub fn callbacks(&self, kind: CallbackKind) -> &[Callback] {
        match kind {
            CallbackKind::Before => &self.before,
            CallbackKind::After => &self.after,
        }
    }

    /// Gets the callbacks of the given kind that apply to `action`.
    pub fn filter<'a>(
        &'a self,
        kind: CallbackKind,
        action: &'a str,
    ) -> impl Iterator<Item = &'a Callback> + 'a {
        self.callbacks(kind)
            .iter()
            .filter(move |callback| callback.applies_to(action))
    }

    /// Returns true if no callbacks are registered.
    pub fn is_empty(&self) -> bool {
        self.before.is_empty() && self.after.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_filter() {
        let mut registry = CallbackRegistry::new();
        registry.register(CallbackKind::Before, Callback::new("authenticate"));
        registry.register(
            CallbackKind::Before,
            Callback::new("validate").only(["create_issue"]),
        );

        let names: Vec<_> = registry
            .filter(CallbackKind::Before, "list_issues")
            .map(|c| c.callback.as_str())
            .collect();
        assert_eq!(names, vec!["authenticate"]);

        let names: Vec<_> = registry
            .filter(CallbackKind::Before, "create_issue")
            .map(|c| c.callback.as_str())
            .collect();
        assert_eq!(names, vec!["authenticate", "validate"]);
    }

    #[test]
    fn test_kinds_are_separate() {
        let mut registry = CallbackRegistry::new();
        registry.register(CallbackKind::After, "audit".into());

        assert!(registry.callbacks(CallbackKind::Before).is_empty());
        assert_eq!(registry.callbacks(CallbackKind::After).len(), 1);
        assert!(!registry.is_empty());
    }

    #[test]
    fn test_clone_is_a_snapshot() {
        let mut parent = CallbackRegistry::new();
        parent.register(CallbackKind::Before, "first".into());

        let child = parent.clone();
        parent.register(CallbackKind::Before, "late".into());

        assert_eq!(child.callbacks(CallbackKind::Before).len(), 1);
        assert_eq!(parent.callbacks(CallbackKind::Before).len(), 2);
    }
}
