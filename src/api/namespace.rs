//! Namespace bindings: named sub-APIs built from the caller's configuration.

/// Options of a namespace declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceOptions {
    /// Do not qualify the target under the declaring definition.
    pub root: bool,
    /// Name to derive the target from instead of the namespace name.
    pub full_name: Option<String>,
}

impl NamespaceOptions {
    /// Creates default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Leaves the target unqualified.
    pub fn root(mut self) -> Self {
        self.root = true;
        self
    }

    /// Derives the target from `name`.
    pub fn full_name(mut self, name: impl Into<String>) -> Self {
        self.full_name = Some(name.into());
        self
    }
}

/// Binding from a namespace name to the definition it constructs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceBinding {
    name: String,
    target: String,
}

impl NamespaceBinding {
    /// Creates a binding declared on the definition whose last name segment is `owner`.
    pub fn new(owner: &str, name: &str, options: &NamespaceOptions) -> Self {
        let converted = camelize(options.full_name.as_deref().unwrap_or(name));
        let target = if options.root {
            converted
        } else {
            format!("{}::{}", owner, converted)
        };

        Self {
            name: name.to_string(),
            target,
        }
    }

    /// Gets the namespace name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets the fully qualified name of the target definition.
    pub fn target(&self) -> &str {
        &self.target
    }
}

/// `pull_requests` -> `PullRequests`.
pub(crate) fn camelize(name: &str) -> String {
    name.split('_')
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}
