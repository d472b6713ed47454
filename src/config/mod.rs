//! Configuration source: the declared property set and its defaults.

use crate::errors::{GitHubError, GitHubErrorKind, GitHubResult};
use crate::observability::redact_option;
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use url::Url;

/// Default GitHub API endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.github.com";

/// Default GitHub web site.
pub const DEFAULT_SITE: &str = "https://github.com";

/// Default upload endpoint.
pub const DEFAULT_UPLOAD_ENDPOINT: &str = "https://uploads.github.com";

/// Default transport adapter name.
pub const DEFAULT_ADAPTER: &str = "reqwest";

/// Default User-Agent header.
pub const DEFAULT_USER_AGENT: &str = "integrations-github-api/0.1.0";

/// Default redirect limit.
pub const DEFAULT_MAX_REDIRECTS: u32 = 5;

/// Environment variable holding an OAuth token.
pub const TOKEN_ENV_VAR: &str = "GITHUB_TOKEN";

/// Environment variable overriding the API endpoint.
pub const ENDPOINT_ENV_VAR: &str = "GITHUB_ENDPOINT";

pub(crate) static NULL: Value = Value::Null;

/// A configuration property declared for every client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Property {
    /// Transport adapter name.
    Adapter,
    /// Follow pagination links automatically.
    AutoPagination,
    /// Basic credentials, `"login:password"` or `{login, password}`.
    BasicAuth,
    /// OAuth application id.
    ClientId,
    /// OAuth application secret.
    ClientSecret,
    /// Extra options handed to the transport.
    ConnectionOptions,
    /// API endpoint.
    Endpoint,
    /// Follow HTTP redirects.
    FollowRedirects,
    /// Basic auth login.
    Login,
    /// Redirect limit.
    MaxRedirects,
    /// Media type requested from the API.
    MimeType,
    /// OAuth access token.
    OauthToken,
    /// Default organization.
    Org,
    /// Basic auth password.
    Password,
    /// Default repository.
    Repo,
    /// GitHub web site.
    Site,
    /// TLS options handed to the transport.
    Ssl,
    /// Upload endpoint.
    UploadEndpoint,
    /// Default user.
    User,
    /// User-Agent header.
    UserAgent,
}

impl Property {
    /// Every declared property, in declaration order.
    pub const ALL: [Property; 20] = [
        Property::Adapter,
        Property::AutoPagination,
        Property::BasicAuth,
        Property::ClientId,
        Property::ClientSecret,
        Property::ConnectionOptions,
        Property::Endpoint,
        Property::FollowRedirects,
        Property::Login,
        Property::MaxRedirects,
        Property::MimeType,
        Property::OauthToken,
        Property::Org,
        Property::Password,
        Property::Repo,
        Property::Site,
        Property::Ssl,
        Property::UploadEndpoint,
        Property::User,
        Property::UserAgent,
    ];

    /// Gets the option key of the property.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Adapter => "adapter",
            Self::AutoPagination => "auto_pagination",
            Self::BasicAuth => "basic_auth",
            Self::ClientId => "client_id",
            Self::ClientSecret => "client_secret",
            Self::ConnectionOptions => "connection_options",
            Self::Endpoint => "endpoint",
            Self::FollowRedirects => "follow_redirects",
            Self::Login => "login",
            Self::MaxRedirects => "max_redirects",
            Self::MimeType => "mime_type",
            Self::OauthToken => "oauth_token",
            Self::Org => "org",
            Self::Password => "password",
            Self::Repo => "repo",
            Self::Site => "site",
            Self::Ssl => "ssl",
            Self::UploadEndpoint => "upload_endpoint",
            Self::User => "user",
            Self::UserAgent => "user_agent",
        }
    }

    /// Looks up a property by option key.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|p| p.as_str() == name)
    }

    /// Returns true for properties whose values must not be logged.
    pub fn is_sensitive(&self) -> bool {
        matches!(
            self,
            Self::BasicAuth | Self::ClientSecret | Self::OauthToken | Self::Password
        )
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Property {
    type Err = GitHubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| {
            GitHubError::configuration(format!("`{}` is not a declared property", s))
        })
    }
}

/// Library-wide configuration: declared property names plus their defaults.
#[derive(Clone)]
pub struct Configuration {
    defaults: Map<String, Value>,
}

impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redacted: Map<String, Value> = self
            .defaults
            .iter()
            .map(|(key, value)| (key.clone(), redact_option(key, value)))
            .collect();
        f.debug_struct("Configuration")
            .field("defaults", &redacted)
            .finish()
    }
}

impl Default for Configuration {
    fn default() -> Self {
        let mut defaults = Map::new();
        for property in Property::ALL {
            defaults.insert(property.as_str().to_string(), Value::Null);
        }
        defaults.insert("adapter".into(), Value::from(DEFAULT_ADAPTER));
        defaults.insert("auto_pagination".into(), Value::Bool(false));
        defaults.insert("connection_options".into(), Value::Object(Map::new()));
        defaults.insert("endpoint".into(), Value::from(DEFAULT_ENDPOINT));
        defaults.insert("follow_redirects".into(), Value::Bool(true));
        defaults.insert("max_redirects".into(), Value::from(DEFAULT_MAX_REDIRECTS));
        defaults.insert("site".into(), Value::from(DEFAULT_SITE));
        defaults.insert("ssl".into(), Value::Object(Map::new()));
        defaults.insert("upload_endpoint".into(), Value::from(DEFAULT_UPLOAD_ENDPOINT));
        defaults.insert("user_agent".into(), Value::from(DEFAULT_USER_AGENT));
        Self { defaults }
    }
}

impl Configuration {
    /// Creates a new configuration builder.
    pub fn builder() -> ConfigurationBuilder {
        ConfigurationBuilder::new()
    }

    /// Gets the declared property names in declaration order.
    pub fn property_names(&self) -> impl Iterator<Item = &'static str> {
        Property::ALL.iter().map(Property::as_str)
    }

    /// Gets the default value of a property.
    pub fn default_for(&self, property: Property) -> &Value {
        self.defaults.get(property.as_str()).unwrap_or(&NULL)
    }

    /// Gets the defaults map.
    pub fn defaults(&self) -> &Map<String, Value> {
        &self.defaults
    }

    /// Returns a fresh copy of the defaults, ready to be merged with overrides.
    pub fn fetch(&self) -> Map<String, Value> {
        self.defaults.clone()
    }

    /// Validates the configuration.
    pub fn validate(&self) -> GitHubResult<()> {
        for property in [Property::Endpoint, Property::Site, Property::UploadEndpoint] {
            match self.default_for(property) {
                Value::Null => {}
                Value::String(raw) => validate_url(property, raw)?,
                _ => {
                    return Err(GitHubError::new(
                        GitHubErrorKind::InvalidBaseUrl,
                        format!("`{}` must be a URL string", property),
                    ))
                }
            }
        }

        if !matches!(self.default_for(Property::UserAgent), Value::String(ua) if !ua.is_empty()) {
            return Err(GitHubError::configuration("User-Agent is required by GitHub API"));
        }

        Ok(())
    }
}

fn validate_url(property: Property, raw: &str) -> GitHubResult<()> {
    let parsed = Url::parse(raw).map_err(|e| {
        GitHubError::new(
            GitHubErrorKind::InvalidBaseUrl,
            format!("`{}` is not a valid URL: {}", property, e),
        )
        .with_cause(e)
    })?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(GitHubError::new(
            GitHubErrorKind::InvalidBaseUrl,
            format!("`{}` must start with http:// or https://", property),
        ));
    }

    Ok(())
}

/// Builder for [`Configuration`].
#[derive(Default)]
pub struct ConfigurationBuilder {
    overrides: Vec<(Property, Value)>,
}

impl fmt::Debug for ConfigurationBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let overrides: Vec<_> = self
            .overrides
            .iter()
            .map(|(property, value)| (property, redact_option(property.as_str(), value)))
            .collect();
        f.debug_struct("ConfigurationBuilder")
            .field("overrides", &overrides)
            .finish()
    }
}

impl ConfigurationBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the token and endpoint from the environment.
    pub fn from_env() -> Self {
        let mut builder = Self::new();
        if let Ok(token) = std::env::var(TOKEN_ENV_VAR) {
            builder = builder.oauth_token(token);
        }
        if let Ok(endpoint) = std::env::var(ENDPOINT_ENV_VAR) {
            builder = builder.endpoint(endpoint);
        }
        builder
    }

    /// Overrides the default of any property.
    pub fn property(mut self, property: Property, value: impl Into<Value>) -> Self {
        self.overrides.push((property, value.into()));
        self
    }

    /// Sets the API endpoint.
    pub fn endpoint(self, url: impl Into<String>) -> Self {
        self.property(Property::Endpoint, url.into())
    }

    /// Sets the web site.
    pub fn site(self, url: impl Into<String>) -> Self {
        self.property(Property::Site, url.into())
    }

    /// Sets the User-Agent header.
    pub fn user_agent(self, ua: impl Into<String>) -> Self {
        self.property(Property::UserAgent, ua.into())
    }

    /// Sets the OAuth token.
    pub fn oauth_token(self, token: impl Into<String>) -> Self {
        self.property(Property::OauthToken, token.into())
    }

    /// Sets basic credentials as `"login:password"`.
    pub fn basic_auth(self, credentials: impl Into<String>) -> Self {
        self.property(Property::BasicAuth, credentials.into())
    }

    /// Enables or disables auto pagination.
    pub fn auto_pagination(self, enabled: bool) -> Self {
        self.property(Property::AutoPagination, enabled)
    }

    /// Builds the configuration.
    pub fn build(self) -> GitHubResult<Configuration> {
        let mut config = Configuration::default();
        for (property, value) in self.overrides {
            config.defaults.insert(property.as_str().to_string(), value);
        }

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Configuration::default();
        assert_eq!(config.default_for(Property::Endpoint), DEFAULT_ENDPOINT);
        assert_eq!(config.default_for(Property::FollowRedirects), &Value::Bool(true));
        assert!(config.default_for(Property::OauthToken).is_null());
        assert_eq!(config.defaults().len(), Property::ALL.len());
    }

    #[test]
    fn test_config_builder() {
        let config = Configuration::builder()
            .endpoint("https://github.example.com/api/v3")
            .user_agent("test-client/1.0")
            .auto_pagination(true)
            .build()
            .unwrap();

        assert_eq!(
            config.default_for(Property::Endpoint),
            "https://github.example.com/api/v3"
        );
        assert_eq!(config.default_for(Property::UserAgent), "test-client/1.0");
        assert_eq!(config.default_for(Property::AutoPagination), &Value::Bool(true));
    }

    #[test]
    fn test_from_env() {
        std::env::set_var(TOKEN_ENV_VAR, "ghp_env");
        std::env::set_var(ENDPOINT_ENV_VAR, "https://ghe.example.com/api/v3");
        let config = ConfigurationBuilder::from_env().build().unwrap();
        std::env::remove_var(TOKEN_ENV_VAR);
        std::env::remove_var(ENDPOINT_ENV_VAR);

        assert_eq!(config.default_for(Property::OauthToken), "ghp_env");
        assert_eq!(
            config.default_for(Property::Endpoint),
            "https://ghe.example.com/api/v3"
        );

        let config = ConfigurationBuilder::from_env().build().unwrap();
        assert!(config.default_for(Property::OauthToken).is_null());
        assert_eq!(config.default_for(Property::Endpoint), DEFAULT_ENDPOINT);
    }

    #[test]
    fn test_invalid_endpoint() {
        let result = Configuration::builder().endpoint("invalid-url").build();
        assert_eq!(*result.unwrap_err().kind(), GitHubErrorKind::InvalidBaseUrl);

        let result = Configuration::builder().site("ftp://github.com").build();
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_user_agent_rejected() {
        let result = Configuration::builder().user_agent("").build();
        assert_eq!(*result.unwrap_err().kind(), GitHubErrorKind::InvalidConfiguration);
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = Configuration::builder()
            .oauth_token("ghp_secret")
            .build()
            .unwrap();
        let debug = format!("{:?}", config);
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("ghp_secret"));
    }

    #[test]
    fn test_property_lookup() {
        assert_eq!(Property::from_name("oauth_token"), Some(Property::OauthToken));
        assert_eq!(Property::from_name("nope"), None);
        assert!("password".parse::<Property>().unwrap().is_sensitive());
        assert!("owner".parse::<Property>().is_err());
    }
}
