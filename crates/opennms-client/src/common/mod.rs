//! HTTP transport for the OpenNMS REST API
//!
//! Turns a uniform [`RequestOptions`] value into a reqwest call and hands back
//! a normalized [`HttpResult`]. JSON bodies are parsed; XML and plain-text
//! bodies are returned as raw text for the caller to parse.

pub mod query;

use crate::config::{AuthConfig, ServerConfig};
use crate::error::OnmsError;
use crate::http_trait::OnmsHttp;
use query::Filter;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use std::time::Duration;
use tracing::debug;

/// Response types the transport knows how to decode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum AcceptType {
    #[default]
    Json,
    PlainText,
    Xml,
}

impl AcceptType {
    /// MIME type sent in the `Accept` header
    pub fn mime(self) -> &'static str {
        match self {
            AcceptType::Json => "application/json",
            AcceptType::PlainText => "text/plain",
            AcceptType::Xml => "application/xml",
        }
    }
}

impl fmt::Display for AcceptType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime())
    }
}

impl FromStr for AcceptType {
    type Err = OnmsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "application/json" => Ok(AcceptType::Json),
            "text/plain" => Ok(AcceptType::PlainText),
            "application/xml" => Ok(AcceptType::Xml),
            _ => Err(OnmsError::UnsupportedAcceptType(s.to_string())),
        }
    }
}

/// Per-request options
///
/// Credentials and timeout fall back to the server configuration when unset.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub accept: AcceptType,
    pub auth: Option<AuthConfig>,
    pub timeout: Option<Duration>,
    pub filter: Option<Filter>,
}

impl RequestOptions {
    /// Options for a JSON request
    pub fn json() -> Self {
        Self::default()
    }

    /// Options for an arbitrary MIME type; fails for anything but JSON, text or XML
    pub fn accepting(mime: &str) -> Result<Self, OnmsError> {
        Ok(Self {
            accept: mime.parse()?,
            ..Self::default()
        })
    }

    pub fn with_auth(mut self, auth: AuthConfig) -> Self {
        self.auth = Some(auth);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_filter(mut self, filter: Option<&Filter>) -> Self {
        self.filter = filter.filter(|f| !f.is_empty()).cloned();
        self
    }
}

/// Decoded response body
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(Value),
    Text(String),
    Empty,
}

/// Normalized result of a successful call
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResult {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: ResponseBody,
}

impl HttpResult {
    /// 200 response carrying a JSON document
    pub fn ok_json(value: Value) -> Self {
        Self {
            status: 200,
            content_type: Some(AcceptType::Json.mime().to_string()),
            body: ResponseBody::Json(value),
        }
    }

    /// 200 response carrying raw text of the given type
    pub fn ok_text(accept: AcceptType, text: impl Into<String>) -> Self {
        Self {
            status: 200,
            content_type: Some(accept.mime().to_string()),
            body: ResponseBody::Text(text.into()),
        }
    }

    /// Take the JSON body; an empty body reads as `null`
    pub fn into_json(self) -> Result<Value, OnmsError> {
        match self.body {
            ResponseBody::Json(value) => Ok(value),
            ResponseBody::Empty => Ok(Value::Null),
            ResponseBody::Text(_) => Err(OnmsError::MalformedResponse(format!(
                "expected a JSON body but got {}",
                self.content_type.as_deref().unwrap_or("text")
            ))),
        }
    }

    /// Take a text (XML or plain) body
    pub fn into_text(self) -> Result<String, OnmsError> {
        match self.body {
            ResponseBody::Text(text) => Ok(text),
            ResponseBody::Empty => Ok(String::new()),
            ResponseBody::Json(_) => Err(OnmsError::MalformedResponse(
                "expected a text body but got JSON".to_string(),
            )),
        }
    }
}

/// Decode a response body according to the requested accept type
pub fn decode_body(accept: AcceptType, text: String) -> Result<ResponseBody, OnmsError> {
    if text.trim().is_empty() {
        return Ok(ResponseBody::Empty);
    }
    match accept {
        AcceptType::Json => Ok(ResponseBody::Json(serde_json::from_str(&text)?)),
        AcceptType::PlainText | AcceptType::Xml => Ok(ResponseBody::Text(text)),
    }
}

/// reqwest-backed transport
///
/// The underlying [`Client`] is built on first use and memoized for the
/// configured server. [`ReqwestHttp::set_server`] swaps the configuration and
/// drops the memoized client so the next call builds a fresh one.
pub struct ReqwestHttp {
    server: ServerConfig,
    client: OnceLock<Client>,
}

impl fmt::Debug for ReqwestHttp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReqwestHttp")
            .field("server", &self.server)
            .field("connected", &self.client.get().is_some())
            .finish()
    }
}

impl ReqwestHttp {
    pub fn new(server: ServerConfig) -> Self {
        Self {
            server,
            client: OnceLock::new(),
        }
    }

    pub fn server(&self) -> &ServerConfig {
        &self.server
    }

    /// Point the transport at another server
    pub fn set_server(&mut self, server: ServerConfig) {
        self.server = server;
        self.client = OnceLock::new();
    }

    /// Whether a client has been built for the current server
    pub fn is_connected(&self) -> bool {
        self.client.get().is_some()
    }

    fn client(&self) -> Result<&Client, OnmsError> {
        if let Some(client) = self.client.get() {
            return Ok(client);
        }
        let built = Client::builder().timeout(self.server.timeout()).build()?;
        Ok(self.client.get_or_init(|| built))
    }

    fn request(
        &self,
        method: Method,
        path: &str,
        options: &RequestOptions,
    ) -> Result<RequestBuilder, OnmsError> {
        let mut url = self.server.resolve_url(path)?;
        if let Some(filter) = options.filter.as_ref().filter(|f| !f.is_empty()) {
            let query = match url.query() {
                Some(existing) if !existing.is_empty() => {
                    format!("{}&{}", existing, filter.to_query_string())
                }
                _ => filter.to_query_string(),
            };
            url.set_query(Some(&query));
        }

        debug!("{} {}", method, url);

        let mut builder = self
            .client()?
            .request(method, url)
            .header(ACCEPT, options.accept.mime());

        if let Some(auth) = options.auth.as_ref().or(self.server.auth()) {
            builder = builder.basic_auth(auth.username(), Some(auth.password()));
        }
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(builder)
    }

    async fn execute(
        &self,
        method: &'static str,
        path: &str,
        accept: AcceptType,
        builder: RequestBuilder,
    ) -> Result<HttpResult, OnmsError> {
        let response = builder.send().await?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OnmsError::Status {
                method,
                path: path.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().await?;
        Ok(HttpResult {
            status: status.as_u16(),
            content_type,
            body: decode_body(accept, text)?,
        })
    }
}

#[async_trait::async_trait]
impl OnmsHttp for ReqwestHttp {
    fn base_url(&self) -> &str {
        self.server.url().as_str()
    }

    async fn get(&self, path: &str, options: &RequestOptions) -> Result<HttpResult, OnmsError> {
        let builder = self.request(Method::GET, path, options)?;
        self.execute("GET", path, options.accept, builder).await
    }

    async fn post_json(
        &self,
        path: &str,
        body: &Value,
        options: &RequestOptions,
    ) -> Result<HttpResult, OnmsError> {
        let builder = self
            .request(Method::POST, path, options)?
            .header(CONTENT_TYPE, AcceptType::Json.mime())
            .body(serde_json::to_vec(body)?);
        self.execute("POST", path, options.accept, builder).await
    }
}
