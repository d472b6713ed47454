//! Error types for the dispatch core.

use std::fmt;
use thiserror::Error;

/// Result type alias for dispatch operations.
pub type GitHubResult<T> = Result<T, GitHubError>;

/// Error kinds for categorizing errors raised by the core and its collaborators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitHubErrorKind {
    // Configuration errors
    /// Invalid configuration source.
    InvalidConfiguration,
    /// Invalid endpoint or site URL.
    InvalidBaseUrl,

    // Argument errors
    /// Options were not an iterable mapping.
    InvalidOptions,
    /// An explicit value and a block were both supplied.
    ConflictingValue,
    /// A value did not fit the typed slot of a declared property.
    InvalidOptionValue,
    /// `with` received a shape it does not understand.
    UnsupportedScope,
    /// A path placeholder had no value.
    MissingParameter,

    // Dispatch errors
    /// No method, namespace or option answers to the name.
    NoSuchMethod,
    /// A namespace points at a definition the catalog does not know.
    UnknownApi,
    /// A request body asked for a transport but none is configured.
    MissingTransport,

    // Transport errors
    /// Request validation failed (400).
    ValidationError,
    /// Bad credentials (401).
    BadCredentials,
    /// Access forbidden (403).
    Forbidden,
    /// Resource not found (404).
    NotFound,
    /// Resource conflict (409).
    Conflict,
    /// Unprocessable entity (422).
    UnprocessableEntity,
    /// Rate limit exceeded (429).
    RateLimitExceeded,
    /// Internal server error (500).
    InternalError,
    /// Service unavailable (502/503).
    ServiceUnavailable,

    // Generic
    /// Unknown error.
    Unknown,
}

impl fmt::Display for GitHubErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfiguration => write!(f, "invalid_configuration"),
            Self::InvalidBaseUrl => write!(f, "invalid_base_url"),
            Self::InvalidOptions => write!(f, "invalid_options"),
            Self::ConflictingValue => write!(f, "conflicting_value"),
            Self::InvalidOptionValue => write!(f, "invalid_option_value"),
            Self::UnsupportedScope => write!(f, "unsupported_scope"),
            Self::MissingParameter => write!(f, "missing_parameter"),
            Self::NoSuchMethod => write!(f, "no_such_method"),
            Self::UnknownApi => write!(f, "unknown_api"),
            Self::MissingTransport => write!(f, "missing_transport"),
            Self::ValidationError => write!(f, "validation_error"),
            Self::BadCredentials => write!(f, "bad_credentials"),
            Self::Forbidden => write!(f, "forbidden"),
            Self::NotFound => write!(f, "not_found"),
            Self::Conflict => write!(f, "conflict"),
            Self::UnprocessableEntity => write!(f, "unprocessable_entity"),
            Self::RateLimitExceeded => write!(f, "rate_limit_exceeded"),
            Self::InternalError => write!(f, "internal_error"),
            Self::ServiceUnavailable => write!(f, "service_unavailable"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Error raised by the dispatch core, a hook, a request body or the transport.
#[derive(Error, Debug)]
pub struct GitHubError {
    /// Error kind.
    kind: GitHubErrorKind,
    /// Error message.
    message: String,
    /// HTTP status code.
    status_code: Option<u16>,
    /// Name of the API definition the error surfaced in.
    api: Option<String>,
    /// Underlying cause.
    #[source]
    cause: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for GitHubError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)?;
        if let Some(code) = self.status_code {
            write!(f, " (HTTP {})", code)?;
        }
        if let Some(ref api) = self.api {
            write!(f, " [api: {}]", api)?;
        }
        Ok(())
    }
}

impl GitHubError {
    /// Creates a new error.
    pub fn new(kind: GitHubErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status_code: None,
            api: None,
            cause: None,
        }
    }

    /// Sets the HTTP status code.
    pub fn with_status(mut self, code: u16) -> Self {
        self.status_code = Some(code);
        self
    }

    /// Sets the API definition name.
    pub fn with_api(mut self, api: impl Into<String>) -> Self {
        self.api = Some(api.into());
        self
    }

    /// Sets the underlying cause.
    pub fn with_cause(mut self, cause: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    /// Gets the error kind.
    pub fn kind(&self) -> &GitHubErrorKind {
        &self.kind
    }

    /// Gets the error message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Gets the HTTP status code.
    pub fn status_code(&self) -> Option<u16> {
        self.status_code
    }

    /// Gets the API definition name.
    pub fn api(&self) -> Option<&str> {
        self.api.as_deref()
    }

    /// Returns true for malformed calls into the configuration surface.
    pub fn is_argument_error(&self) -> bool {
        matches!(
            self.kind,
            GitHubErrorKind::InvalidOptions
                | GitHubErrorKind::ConflictingValue
                | GitHubErrorKind::InvalidOptionValue
                | GitHubErrorKind::UnsupportedScope
                | GitHubErrorKind::MissingParameter
        )
    }

    /// Creates an error from an HTTP status code reported by a transport.
    pub fn from_response(status: u16, message: impl Into<String>) -> Self {
        Self::new(Self::kind_from_status(status), message).with_status(status)
    }

    /// Maps HTTP status code to error kind.
    fn kind_from_status(status: u16) -> GitHubErrorKind {
        match status {
            400 => GitHubErrorKind::ValidationError,
            401 => GitHubErrorKind::BadCredentials,
            403 => GitHubErrorKind::Forbidden,
            404 => GitHubErrorKind::NotFound,
            409 => GitHubErrorKind::Conflict,
            422 => GitHubErrorKind::UnprocessableEntity,
            429 => GitHubErrorKind::RateLimitExceeded,
            500 => GitHubErrorKind::InternalError,
            502 | 503 => GitHubErrorKind::ServiceUnavailable,
            _ => GitHubErrorKind::Unknown,
        }
    }

    // Convenience constructors

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(GitHubErrorKind::InvalidConfiguration, message)
    }

    /// Creates an error for options that cannot be iterated.
    pub fn invalid_options(message: impl Into<String>) -> Self {
        Self::new(GitHubErrorKind::InvalidOptions, message)
    }

    /// Creates an error for a value supplied together with a block.
    pub fn conflicting_value(option: &str) -> Self {
        Self::new(
            GitHubErrorKind::ConflictingValue,
            format!("value and block are mutually exclusive for `{}`", option),
        )
    }

    /// Creates an error for a value of the wrong type.
    pub fn invalid_option_value(option: &str, expected: &str) -> Self {
        Self::new(
            GitHubErrorKind::InvalidOptionValue,
            format!("`{}` expects {}", option, expected),
        )
    }

    /// Creates an unsupported scope error.
    pub fn unsupported_scope() -> Self {
        Self::new(
            GitHubErrorKind::UnsupportedScope,
            "this api does not support passed in arguments",
        )
    }

    /// Creates a missing parameter error.
    pub fn missing_parameter(name: &str) -> Self {
        Self::new(
            GitHubErrorKind::MissingParameter,
            format!("missing required parameter `{}`", name),
        )
    }

    /// Creates an unknown-call error.
    pub fn no_such_method(name: &str, api: &str) -> Self {
        Self::new(
            GitHubErrorKind::NoSuchMethod,
            format!("undefined method `{}` for {}", name, api),
        )
        .with_api(api)
    }

    /// Creates an unknown API definition error.
    pub fn unknown_api(name: &str) -> Self {
        Self::new(
            GitHubErrorKind::UnknownApi,
            format!("no API definition named `{}`", name),
        )
    }

    /// Creates a missing transport error.
    pub fn missing_transport() -> Self {
        Self::new(
            GitHubErrorKind::MissingTransport,
            "no transport configured for this catalog",
        )
    }
}

/// Checks if an error is an unknown-call error.
pub fn is_no_such_method(error: &GitHubError) -> bool {
    matches!(
        error.kind(),
        GitHubErrorKind::NoSuchMethod | GitHubErrorKind::UnknownApi
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = GitHubError::new(GitHubErrorKind::NotFound, "Repository not found")
            .with_status(404)
            .with_api("Repos");

        let display = format!("{}", error);
        assert!(display.contains("not_found"));
        assert!(display.contains("Repository not found"));
        assert!(display.contains("404"));
        assert!(display.contains("Repos"));
    }

    #[test]
    fn test_argument_errors() {
        assert!(GitHubError::invalid_options("cannot iterate over value").is_argument_error());
        assert!(GitHubError::conflicting_value("user").is_argument_error());
        assert!(GitHubError::unsupported_scope().is_argument_error());
        assert!(!GitHubError::no_such_method("foo", "Repos").is_argument_error());
    }

    #[test]
    fn test_no_such_method_names_the_api() {
        let error = GitHubError::no_such_method("foo_bar_baz", "Repos");
        assert!(is_no_such_method(&error));
        assert_eq!(error.api(), Some("Repos"));
        assert!(error.message().contains("foo_bar_baz"));
    }

    #[test]
    fn test_from_response() {
        let error = GitHubError::from_response(404, "Not Found");
        assert_eq!(*error.kind(), GitHubErrorKind::NotFound);
        assert_eq!(error.status_code(), Some(404));

        let error = GitHubError::from_response(418, "teapot");
        assert_eq!(*error.kind(), GitHubErrorKind::Unknown);
    }
}
