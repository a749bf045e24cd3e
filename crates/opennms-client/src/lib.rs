//! OpenNMS REST API Client
//!
//! A Rust client library for the OpenNMS network-management REST API.
//! Responses are normalized across server API versions, mapped into typed
//! entities, and node graphs are assembled with parent back-references.
//!
//! # Example
//!
//! ```no_run
//! use opennms_client::{AuthConfig, Filter, OnmsClient, ServerConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let server = ServerConfig::builder("http://demo.opennms.org/opennms/")
//!     .name("Demo")
//!     .auth(AuthConfig::new("demo", "demo"))
//!     .build()?;
//! let client = OnmsClient::new(server);
//!
//! // Server version
//! let info = client.server_metadata().await?;
//! println!("OpenNMS {}", info.version);
//!
//! // Node with its interfaces and services, every child linked to the node
//! let node = client.nodes().get(1, true).await?;
//! for iface in &node.ip_interfaces {
//!     println!("{} has {} services", iface.ip_address, iface.services.len());
//! }
//!
//! // Query nodes
//! let routers = client
//!     .nodes()
//!     .find(Some(&Filter::new().param("label", "router").limit(10)))
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - **Version tolerance**: collection envelopes from API v1 and v2 are unwrapped uniformly
//! - **Typed entities**: coded enumerations and timestamps are decoded and validated
//! - **Graph assembly**: interfaces and services are fetched and linked to their parents
//! - **Situation feedback**: read and submit alarm correlation feedback

pub mod client;
pub mod common;
pub mod config;
pub mod dao;
pub mod error;
pub mod models;
#[path = "trait.rs"]
pub mod http_trait;
#[cfg(any(test, feature = "test-util"))]
pub mod mock;

pub use client::OnmsClient;
pub use common::query::Filter;
pub use common::{AcceptType, HttpResult, RequestOptions, ReqwestHttp, ResponseBody};
pub use config::{AuthConfig, ServerConfig};
pub use dao::{InterfaceKey, NodeDao, NodeKey, SituationFeedbackDao};
pub use error::OnmsError;
pub use http_trait::OnmsHttp;
pub use models::*;
#[cfg(any(test, feature = "test-util"))]
pub use mock::MockOnmsHttp;
