//! Typed slots backing the declared configuration properties.

use crate::config::Property;
use crate::errors::{GitHubError, GitHubResult};
use secrecy::SecretString;
use serde_json::{Map, Value};

/// Basic credentials as accepted by the `basic_auth` property.
#[derive(Debug, Clone)]
pub enum BasicAuth {
    /// A single `"login:password"` token.
    Token(SecretString),
    /// Structured credentials.
    Credentials {
        /// Login.
        login: Option<String>,
        /// Password.
        password: Option<SecretString>,
    },
}

impl BasicAuth {
    fn from_value(value: &Value) -> GitHubResult<Self> {
        match value {
            Value::String(token) => Ok(Self::Token(SecretString::new(token.clone()))),
            Value::Object(fields) => Ok(Self::Credentials {
                login: fields.get("login").and_then(Value::as_str).map(String::from),
                password: fields
                    .get("password")
                    .and_then(Value::as_str)
                    .map(|p| SecretString::new(p.to_string())),
            }),
            _ => Err(GitHubError::invalid_option_value(
                Property::BasicAuth.as_str(),
                "a \"login:password\" string or a {login, password} object",
            )),
        }
    }
}

/// The dedicated field of every declared property.
///
/// Fields are only written through [`Settings::assign`], which the option
/// store pairs with a write into its snapshot.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    adapter: Option<String>,
    auto_pagination: Option<bool>,
    basic_auth: Option<BasicAuth>,
    client_id: Option<String>,
    client_secret: Option<SecretString>,
    connection_options: Option<Map<String, Value>>,
    endpoint: Option<String>,
    follow_redirects: Option<bool>,
    login: Option<String>,
    max_redirects: Option<u32>,
    mime_type: Option<String>,
    oauth_token: Option<SecretString>,
    org: Option<String>,
    password: Option<SecretString>,
    repo: Option<String>,
    site: Option<String>,
    ssl: Option<Map<String, Value>>,
    upload_endpoint: Option<String>,
    user: Option<String>,
    user_agent: Option<String>,
}

impl Settings {
    /// Converts `value` into the slot of `property` and stores it.
    ///
    /// `null` empties the slot. A value of the wrong type leaves the slot
    /// untouched.
    pub fn assign(&mut self, property: Property, value: &Value) -> GitHubResult<()> {
        match property {
            Property::Adapter => self.adapter = string(property, value)?,
            Property::AutoPagination => self.auto_pagination = flag(property, value)?,
            Property::BasicAuth => {
                self.basic_auth = match value {
                    Value::Null => None,
                    other => Some(BasicAuth::from_value(other)?),
                }
            }
            Property::ClientId => self.client_id = string(property, value)?,
            Property::ClientSecret => self.client_secret = secret(property, value)?,
            Property::ConnectionOptions => self.connection_options = object(property, value)?,
            Property::Endpoint => self.endpoint = string(property, value)?,
            Property::FollowRedirects => self.follow_redirects = flag(property, value)?,
            Property::Login => self.login = string(property, value)?,
            Property::MaxRedirects => self.max_redirects = count(property, value)?,
            Property::MimeType => self.mime_type = string(property, value)?,
            Property::OauthToken => self.oauth_token = secret(property, value)?,
            Property::Org => self.org = string(property, value)?,
            Property::Password => self.password = secret(property, value)?,
            Property::Repo => self.repo = string(property, value)?,
            Property::Site => self.site = string(property, value)?,
            Property::Ssl => self.ssl = object(property, value)?,
            Property::UploadEndpoint => self.upload_endpoint = string(property, value)?,
            Property::User => self.user = string(property, value)?,
            Property::UserAgent => self.user_agent = string(property, value)?,
        }
        Ok(())
    }

    /// Transport adapter name.
    pub fn adapter(&self) -> Option<&str> {
        self.adapter.as_deref()
    }

    /// Whether pagination links are followed automatically.
    pub fn auto_pagination(&self) -> Option<bool> {
        self.auto_pagination
    }

    /// Basic credentials as configured.
    pub fn basic_auth(&self) -> Option<&BasicAuth> {
        self.basic_auth.as_ref()
    }

    /// OAuth application id.
    pub fn client_id(&self) -> Option<&str> {
        self.client_id.as_deref()
    }

    /// OAuth application secret.
    pub fn client_secret(&self) -> Option<&SecretString> {
        self.client_secret.as_ref()
    }

    /// Extra transport options.
    pub fn connection_options(&self) -> Option<&Map<String, Value>> {
        self.connection_options.as_ref()
    }

    /// API endpoint.
    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    /// Whether redirects are followed.
    pub fn follow_redirects(&self) -> Option<bool> {
        self.follow_redirects
    }

    /// Basic auth login.
    pub fn login(&self) -> Option<&str> {
        self.login.as_deref()
    }

    /// Redirect limit.
    pub fn max_redirects(&self) -> Option<u32> {
        self.max_redirects
    }

    /// Requested media type.
    pub fn mime_type(&self) -> Option<&str> {
        self.mime_type.as_deref()
    }

    /// OAuth access token.
    pub fn oauth_token(&self) -> Option<&SecretString> {
        self.oauth_token.as_ref()
    }

    /// Default organization.
    pub fn org(&self) -> Option<&str> {
        self.org.as_deref()
    }

    /// Basic auth password.
    pub fn password(&self) -> Option<&SecretString> {
        self.password.as_ref()
    }

    /// Default repository.
    pub fn repo(&self) -> Option<&str> {
        self.repo.as_deref()
    }

    /// GitHub web site.
    pub fn site(&self) -> Option<&str> {
        self.site.as_deref()
    }

    /// TLS options.
    pub fn ssl(&self) -> Option<&Map<String, Value>> {
        self.ssl.as_ref()
    }

    /// Upload endpoint.
    pub fn upload_endpoint(&self) -> Option<&str> {
        self.upload_endpoint.as_deref()
    }

    /// Default user.
    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    /// User-Agent header.
    pub fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }
}

fn string(property: Property, value: &Value) -> GitHubResult<Option<String>> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        _ => Err(GitHubError::invalid_option_value(property.as_str(), "a string")),
    }
}

fn secret(property: Property, value: &Value) -> GitHubResult<Option<SecretString>> {
    Ok(string(property, value)?.map(SecretString::new))
}

fn flag(property: Property, value: &Value) -> GitHubResult<Option<bool>> {
    match value {
        Value::Null => Ok(None),
        Value::Bool(b) => Ok(Some(*b)),
        _ => Err(GitHubError::invalid_option_value(property.as_str(), "a boolean")),
    }
}

fn count(property: Property, value: &Value) -> GitHubResult<Option<u32>> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => n
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| {
                GitHubError::invalid_option_value(property.as_str(), "a non-negative integer")
            }),
        _ => Err(GitHubError::invalid_option_value(
            property.as_str(),
            "a non-negative integer",
        )),
    }
}

fn object(property: Property, value: &Value) -> GitHubResult<Option<Map<String, Value>>> {
    match value {
        Value::Null => Ok(None),
        Value::Object(map) => Ok(Some(map.clone())),
        _ => Err(GitHubError::invalid_option_value(property.as_str(), "an object")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use serde_json::json;

    #[test]
    fn test_assign_typed_slots() {
        let mut settings = Settings::default();
        settings.assign(Property::User, &json!("octocat")).unwrap();
        settings.assign(Property::MaxRedirects, &json!(3)).unwrap();
        settings.assign(Property::FollowRedirects, &json!(false)).unwrap();
        settings.assign(Property::OauthToken, &json!("gho_secret")).unwrap();

        assert_eq!(settings.user(), Some("octocat"));
        assert_eq!(settings.max_redirects(), Some(3));
        assert_eq!(settings.follow_redirects(), Some(false));
        assert_eq!(settings.oauth_token().unwrap().expose_secret(), "gho_secret");
    }

    #[test]
    fn test_null_clears_slot() {
        let mut settings = Settings::default();
        settings.assign(Property::Login, &json!("octocat")).unwrap();
        settings.assign(Property::Login, &Value::Null).unwrap();
        assert_eq!(settings.login(), None);
    }

    #[test]
    fn test_wrong_type_leaves_slot_untouched() {
        let mut settings = Settings::default();
        settings.assign(Property::Repo, &json!("hello-world")).unwrap();

        let err = settings.assign(Property::Repo, &json!(42)).unwrap_err();
        assert!(err.is_argument_error());
        assert_eq!(settings.repo(), Some("hello-world"));

        assert!(settings.assign(Property::MaxRedirects, &json!(-1)).is_err());
    }

    #[test]
    fn test_basic_auth_shapes() {
        let mut settings = Settings::default();
        settings
            .assign(Property::BasicAuth, &json!({"login": "octocat", "password": "pw"}))
            .unwrap();
        match settings.basic_auth() {
            Some(BasicAuth::Credentials { login, password }) => {
                assert_eq!(login.as_deref(), Some("octocat"));
                assert_eq!(password.as_ref().unwrap().expose_secret(), "pw");
            }
            other => panic!("unexpected basic auth: {:?}", other),
        }

        assert!(settings.assign(Property::BasicAuth, &json!(true)).is_err());
    }
}
