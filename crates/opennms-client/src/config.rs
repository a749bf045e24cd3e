//! Server and authentication configuration
//!
//! A [`ServerConfig`] is read-only input to the transport: base URL, optional
//! display name, basic-auth credentials and the default request timeout.

use crate::error::OnmsError;
use reqwest::Url;
use std::fmt;
use std::time::Duration;

/// Default base URL used when `OPENNMS_URL` is not set
pub const DEFAULT_URL: &str = "http://localhost:8980/opennms/";

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Basic-auth credentials
#[derive(Clone, PartialEq, Eq)]
pub struct AuthConfig {
    username: String,
    password: String,
}

impl AuthConfig {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Connection settings for one OpenNMS server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    name: Option<String>,
    url: Url,
    auth: Option<AuthConfig>,
    timeout: Duration,
}

impl ServerConfig {
    /// Start building a configuration for the server at `url`
    pub fn builder(url: impl Into<String>) -> ServerConfigBuilder {
        ServerConfigBuilder {
            url: url.into(),
            name: None,
            auth: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Load configuration from `OPENNMS_URL`, `OPENNMS_USERNAME`,
    /// `OPENNMS_PASSWORD` and `OPENNMS_TIMEOUT_MS`.
    pub fn from_env() -> Result<Self, OnmsError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Same as [`ServerConfig::from_env`], reading variables through `lookup`.
    pub fn from_vars<F>(lookup: F) -> Result<Self, OnmsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = lookup("OPENNMS_URL").unwrap_or_else(|| DEFAULT_URL.to_string());
        let mut builder = Self::builder(url);

        match (lookup("OPENNMS_USERNAME"), lookup("OPENNMS_PASSWORD")) {
            (Some(username), Some(password)) => {
                builder = builder.auth(AuthConfig::new(username, password));
            }
            (Some(_), None) | (None, Some(_)) => {
                return Err(OnmsError::InvalidConfig(
                    "OPENNMS_USERNAME and OPENNMS_PASSWORD must be set together".to_string(),
                ));
            }
            (None, None) => {}
        }

        if let Some(raw) = lookup("OPENNMS_TIMEOUT_MS") {
            let millis: u64 = raw.trim().parse().map_err(|_| {
                OnmsError::InvalidConfig(format!("OPENNMS_TIMEOUT_MS is not a number: {raw}"))
            })?;
            builder = builder.timeout(Duration::from_millis(millis));
        }

        builder.build()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn auth(&self) -> Option<&AuthConfig> {
        self.auth.as_ref()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Resolve a REST path (e.g. `rest/nodes/1`) against the base URL
    pub fn resolve_url(&self, path: &str) -> Result<Url, OnmsError> {
        self.url
            .join(path.trim_start_matches('/'))
            .map_err(|e| OnmsError::InvalidConfig(format!("cannot resolve {path}: {e}")))
    }
}

/// Builder for [`ServerConfig`]
#[derive(Debug, Clone)]
pub struct ServerConfigBuilder {
    url: String,
    name: Option<String>,
    auth: Option<AuthConfig>,
    timeout: Duration,
}

impl ServerConfigBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn auth(mut self, auth: AuthConfig) -> Self {
        self.auth = Some(auth);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<ServerConfig, OnmsError> {
        // Url::join drops the last path segment unless the base ends in '/'
        let raw = if self.url.ends_with('/') {
            self.url
        } else {
            format!("{}/", self.url)
        };
        let url = Url::parse(&raw)
            .map_err(|e| OnmsError::InvalidConfig(format!("invalid server URL {raw}: {e}")))?;
        if url.cannot_be_a_base() {
            return Err(OnmsError::InvalidConfig(format!(
                "server URL cannot be used as a base: {raw}"
            )));
        }

        Ok(ServerConfig {
            name: self.name,
            url,
            auth: self.auth,
            timeout: self.timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_resolve_url_keeps_context_path() {
        let server = ServerConfig::builder("http://demo.opennms.org/opennms")
            .name("Demo")
            .build()
            .unwrap();
        assert_eq!(server.name(), Some("Demo"));
        assert_eq!(
            server.resolve_url("rest/nodes/1").unwrap().as_str(),
            "http://demo.opennms.org/opennms/rest/nodes/1"
        );
        assert_eq!(
            server.resolve_url("/rest/nodes").unwrap().as_str(),
            "http://demo.opennms.org/opennms/rest/nodes"
        );
    }

    #[test]
    fn test_invalid_url_rejected() {
        let err = ServerConfig::builder("not a url").build().unwrap_err();
        assert!(matches!(err, OnmsError::InvalidConfig(_)));
    }

    #[test]
    fn test_from_vars_defaults() {
        let server = ServerConfig::from_vars(vars(&[])).unwrap();
        assert_eq!(server.url().as_str(), DEFAULT_URL);
        assert!(server.auth().is_none());
        assert_eq!(server.timeout(), DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_from_vars_reads_credentials_and_timeout() {
        let server = ServerConfig::from_vars(vars(&[
            ("OPENNMS_URL", "https://nms.example.com/opennms/"),
            ("OPENNMS_USERNAME", "admin"),
            ("OPENNMS_PASSWORD", "secret"),
            ("OPENNMS_TIMEOUT_MS", "2500"),
        ]))
        .unwrap();
        let auth = server.auth().unwrap();
        assert_eq!(auth.username(), "admin");
        assert_eq!(auth.password(), "secret");
        assert_eq!(server.timeout(), Duration::from_millis(2500));
    }

    #[test]
    fn test_from_vars_rejects_half_credentials() {
        let err = ServerConfig::from_vars(vars(&[("OPENNMS_USERNAME", "admin")])).unwrap_err();
        assert!(matches!(err, OnmsError::InvalidConfig(_)));
    }

    #[test]
    fn test_from_vars_rejects_bad_timeout() {
        let err = ServerConfig::from_vars(vars(&[("OPENNMS_TIMEOUT_MS", "soon")])).unwrap_err();
        assert!(matches!(err, OnmsError::InvalidConfig(_)));
    }

    #[test]
    fn test_auth_debug_redacts_password() {
        let auth = AuthConfig::new("demo", "hunter2");
        let rendered = format!("{auth:?}");
        assert!(rendered.contains("demo"));
        assert!(!rendered.contains("hunter2"));
    }
}
