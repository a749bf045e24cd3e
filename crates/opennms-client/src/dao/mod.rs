//! Data access objects
//!
//! Each DAO issues requests through an [`OnmsHttp`](crate::OnmsHttp)
//! transport, normalizes the collection envelope ([`envelope`]) and maps raw
//! records into entities ([`mapper`]).

pub mod envelope;
pub mod feedback;
pub mod mapper;
pub mod node;
pub(crate) mod record;

pub use feedback::SituationFeedbackDao;
pub use node::{InterfaceKey, NodeDao, NodeKey};
pub use record::parse_timestamp;
