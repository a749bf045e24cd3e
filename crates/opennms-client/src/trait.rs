//! OnmsHttp trait for mocking
//!
//! This trait abstracts the HTTP transport so the DAOs can be exercised in unit
//! tests without a running OpenNMS server. [`crate::ReqwestHttp`] is the real
//! implementation; [`crate::MockOnmsHttp`] (feature `test-util`) serves canned
//! responses.

use crate::common::{HttpResult, RequestOptions};
use crate::error::OnmsError;
use serde_json::Value;

/// Transport contract shared by every DAO
///
/// All async methods must be `Send` to work with Tokio's work-stealing runtime.
#[async_trait::async_trait]
pub trait OnmsHttp: Send + Sync {
    /// Base URL of the configured server
    fn base_url(&self) -> &str;

    /// GET `path` (relative to the base URL)
    async fn get(&self, path: &str, options: &RequestOptions) -> Result<HttpResult, OnmsError>;

    /// POST a JSON document to `path`
    async fn post_json(
        &self,
        path: &str,
        body: &Value,
        options: &RequestOptions,
    ) -> Result<HttpResult, OnmsError>;
}
