//! Session configuration.

use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use url::Url;

use crate::error::{Error, Result};

/// User agent sent with every request.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 5.1; rv:31.1) Gecko/20100101 Firefox/31.0";

/// Well-known Office 365 autodiscover endpoint.
pub const DEFAULT_DISCOVERY_URL: &str =
    "https://autodiscover-s.outlook.com/autodiscover/autodiscover.xml";

/// Shortest response body treated as a real answer.
pub const DEFAULT_MIN_RESPONSE_LENGTH: usize = 20;

/// Credentials and endpoints for a session.
#[derive(Clone)]
pub struct SessionConfig {
    username: String,
    password: String,
    server: Option<Url>,
    user_agent: String,
    discovery_url: Url,
    min_response_length: usize,
    timeout: Option<Duration>,
}

impl SessionConfig {
    /// Starts a configuration for the given account.
    #[must_use]
    pub fn builder(username: impl Into<String>, password: impl Into<String>) -> SessionConfigBuilder {
        SessionConfigBuilder {
            username: username.into(),
            password: password.into(),
            server: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            discovery_url: DEFAULT_DISCOVERY_URL.to_string(),
            min_response_length: DEFAULT_MIN_RESPONSE_LENGTH,
            timeout: None,
        }
    }

    /// Account name, also the address used for autodiscovery.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Configured EWS endpoint, if any.
    #[must_use]
    pub const fn server(&self) -> Option<&Url> {
        self.server.as_ref()
    }

    /// User agent header value.
    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Autodiscover endpoint.
    #[must_use]
    pub const fn discovery_url(&self) -> &Url {
        &self.discovery_url
    }

    /// Minimum accepted response body length.
    #[must_use]
    pub const fn min_response_length(&self) -> usize {
        self.min_response_length
    }

    /// HTTP timeout, if set.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// `Authorization` header value.
    pub(crate) fn basic_auth(&self) -> String {
        let credentials = format!("{}:{}", self.username, self.password);
        format!("Basic {}", STANDARD.encode(credentials))
    }
}

impl std::fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionConfig")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("server", &self.server.as_ref().map(Url::as_str))
            .field("discovery_url", &self.discovery_url.as_str())
            .field("min_response_length", &self.min_response_length)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// Builder for [`SessionConfig`].
#[derive(Clone)]
pub struct SessionConfigBuilder {
    username: String,
    password: String,
    server: Option<String>,
    user_agent: String,
    discovery_url: String,
    min_response_length: usize,
    timeout: Option<Duration>,
}

impl SessionConfigBuilder {
    /// Uses a fixed EWS endpoint instead of autodiscovery.
    #[must_use]
    pub fn server(mut self, server: impl Into<String>) -> Self {
        self.server = Some(server.into());
        self
    }

    /// Overrides the user agent.
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Overrides the autodiscover endpoint.
    #[must_use]
    pub fn discovery_url(mut self, url: impl Into<String>) -> Self {
        self.discovery_url = url.into();
        self
    }

    /// Overrides the minimum response length.
    #[must_use]
    pub const fn min_response_length(mut self, length: usize) -> Self {
        self.min_response_length = length;
        self
    }

    /// Sets an HTTP timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Validates and builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the username or password is empty, or a URL is
    /// malformed or not `http`/`https`.
    pub fn build(self) -> Result<SessionConfig> {
        if self.username.trim().is_empty() {
            return Err(Error::invalid_config("username is required"));
        }
        if self.password.is_empty() {
            return Err(Error::invalid_config("password is required"));
        }

        let server = self.server.as_deref().map(web_url).transpose()?;
        let discovery_url = web_url(&self.discovery_url)?;

        Ok(SessionConfig {
            username: self.username,
            password: self.password,
            server,
            user_agent: self.user_agent,
            discovery_url,
            min_response_length: self.min_response_length,
            timeout: self.timeout,
        })
    }
}

impl std::fmt::Debug for SessionConfigBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionConfigBuilder")
            .field("username", &self.username)
            .field("server", &self.server)
            .finish_non_exhaustive()
    }
}

fn web_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw)?;
    match url.scheme() {
        "http" | "https" if url.host().is_some() => Ok(url),
        "http" | "https" => Err(Error::invalid_config(format!("{raw} has no host"))),
        scheme => Err(Error::invalid_config(format!(
            "{raw}: unsupported scheme '{scheme}'"
        ))),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SessionConfig::builder("alice@example.com", "secret")
            .build()
            .unwrap();
        assert_eq!(config.user_agent(), DEFAULT_USER_AGENT);
        assert_eq!(config.discovery_url().as_str(), DEFAULT_DISCOVERY_URL);
        assert_eq!(config.min_response_length(), 20);
        assert!(config.server().is_none());
        assert!(config.timeout().is_none());
    }

    #[test]
    fn test_basic_auth() {
        let config = SessionConfig::builder("user", "pass").build().unwrap();
        assert_eq!(config.basic_auth(), "Basic dXNlcjpwYXNz");
    }

    #[test]
    fn test_empty_credentials_rejected() {
        assert!(SessionConfig::builder("", "pass").build().is_err());
        assert!(SessionConfig::builder("user", "").build().is_err());
    }

    #[test]
    fn test_server_must_be_web_url() {
        assert!(
            SessionConfig::builder("u", "p")
                .server("ftp://mail.example.com/EWS/Exchange.asmx")
                .build()
                .is_err()
        );
        assert!(
            SessionConfig::builder("u", "p")
                .server("not a url")
                .build()
                .is_err()
        );
        let config = SessionConfig::builder("u", "p")
            .server("https://mail.example.com/EWS/Exchange.asmx")
            .build()
            .unwrap();
        assert_eq!(config.server().unwrap().host_str(), Some("mail.example.com"));
    }

    #[test]
    fn test_debug_redacts_password() {
        let config = SessionConfig::builder("user", "hunter2").build().unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("<redacted>"));
    }
}
