//! OpenNMS API client
//!
//! Entry point tying a transport to the DAOs.

use crate::common::{RequestOptions, ReqwestHttp};
use crate::config::ServerConfig;
use crate::dao::{mapper, NodeDao, SituationFeedbackDao};
use crate::error::OnmsError;
use crate::http_trait::OnmsHttp;
use crate::models::ServerMetadata;
use std::sync::Arc;
use tracing::debug;

/// OpenNMS API client
///
/// Cheap to clone; every DAO handed out shares the same transport.
#[derive(Clone)]
pub struct OnmsClient {
    http: Arc<dyn OnmsHttp>,
}

impl std::fmt::Debug for OnmsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnmsClient")
            .field("base_url", &self.http.base_url())
            .finish()
    }
}

impl OnmsClient {
    /// Create a client talking to `server` over HTTP
    pub fn new(server: ServerConfig) -> Self {
        Self::with_http(Arc::new(ReqwestHttp::new(server)))
    }

    /// Create a client over an arbitrary transport (e.g. a mock)
    pub fn with_http(http: Arc<dyn OnmsHttp>) -> Self {
        Self { http }
    }

    /// Create a client from `OPENNMS_*` environment variables
    pub fn from_env() -> Result<Self, OnmsError> {
        Ok(Self::new(ServerConfig::from_env()?))
    }

    /// Point the client at another server
    ///
    /// The transport is replaced wholesale; DAOs obtained earlier keep
    /// talking to the previous server.
    pub fn set_server(&mut self, server: ServerConfig) {
        debug!("Switching to server {}", server.url());
        self.http = Arc::new(ReqwestHttp::new(server));
    }

    pub fn base_url(&self) -> &str {
        self.http.base_url()
    }

    pub fn nodes(&self) -> NodeDao {
        NodeDao::new(Arc::clone(&self.http))
    }

    pub fn situation_feedback(&self) -> SituationFeedbackDao {
        SituationFeedbackDao::new(Arc::clone(&self.http))
    }

    /// Version and packaging information of the server (`rest/info`)
    pub async fn server_metadata(&self) -> Result<ServerMetadata, OnmsError> {
        debug!("Getting server metadata from {}", self.base_url());
        let body = self.http.get("rest/info", &RequestOptions::json()).await?.into_json()?;
        mapper::server_metadata(&body)
    }
}
