//! Mock transport for unit testing
//!
//! [`MockOnmsHttp`] implements [`OnmsHttp`] over an in-memory table of canned
//! responses keyed by request path, so the DAOs can be exercised without a
//! running OpenNMS server. Every call is recorded for later inspection.
//!
//! - `helpers.rs` - builders for the collection envelopes OpenNMS returns

pub mod helpers;

use crate::common::query::Filter;
use crate::common::{AcceptType, HttpResult, RequestOptions};
use crate::error::OnmsError;
use crate::http_trait::OnmsHttp;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Canned response for one path
#[derive(Debug, Clone)]
pub enum MockResponse {
    Ok(HttpResult),
    /// Non-2xx answer, surfaced as [`OnmsError::Status`]
    Status(u16, String),
}

/// A call seen by the mock
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: &'static str,
    pub path: String,
    pub accept: AcceptType,
    pub filter: Option<Filter>,
    pub body: Option<Value>,
}

/// Mock transport for testing
///
/// Unknown paths answer 404. Clones share the same response table and
/// request log.
#[derive(Debug, Clone)]
pub struct MockOnmsHttp {
    base_url: String,
    responses: Arc<Mutex<HashMap<String, MockResponse>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockOnmsHttp {
    /// Create a new mock transport
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            responses: Arc::new(Mutex::new(HashMap::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Answer `path` with a JSON body
    pub fn respond_json(&self, path: impl Into<String>, body: Value) -> &Self {
        self.respond(path, MockResponse::Ok(HttpResult::ok_json(body)))
    }

    /// Answer `path` with a non-2xx status
    pub fn respond_status(&self, path: impl Into<String>, status: u16, body: impl Into<String>) -> &Self {
        self.respond(path, MockResponse::Status(status, body.into()))
    }

    pub fn respond(&self, path: impl Into<String>, response: MockResponse) -> &Self {
        lock(&self.responses).insert(path.into(), response);
        self
    }

    /// Every request seen so far, in call order
    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.requests).clone()
    }

    /// Paths requested so far, in call order
    pub fn requested_paths(&self) -> Vec<String> {
        lock(&self.requests).iter().map(|r| r.path.clone()).collect()
    }

    fn answer(
        &self,
        method: &'static str,
        path: &str,
        options: &RequestOptions,
        body: Option<&Value>,
    ) -> Result<HttpResult, OnmsError> {
        lock(&self.requests).push(RecordedRequest {
            method,
            path: path.to_string(),
            accept: options.accept,
            filter: options.filter.clone(),
            body: body.cloned(),
        });

        let response = lock(&self.responses).get(path).cloned();
        match response {
            Some(MockResponse::Ok(result)) => Ok(result),
            Some(MockResponse::Status(status, body)) => Err(OnmsError::Status {
                method,
                path: path.to_string(),
                status,
                body,
            }),
            None => Err(OnmsError::Status {
                method,
                path: path.to_string(),
                status: 404,
                body: format!("no mock response for {path}"),
            }),
        }
    }
}

#[async_trait::async_trait]
impl OnmsHttp for MockOnmsHttp {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get(&self, path: &str, options: &RequestOptions) -> Result<HttpResult, OnmsError> {
        self.answer("GET", path, options, None)
    }

    async fn post_json(
        &self,
        path: &str,
        body: &Value,
        options: &RequestOptions,
    ) -> Result<HttpResult, OnmsError> {
        self.answer("POST", path, options, Some(body))
    }
}
