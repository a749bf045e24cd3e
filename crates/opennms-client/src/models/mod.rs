//! OpenNMS domain models
//!
//! Entities are built fresh per request by the mappers in [`crate::dao::mapper`];
//! identifiers are private and read through `id()`.

pub mod enums;
pub mod feedback;
pub mod info;
pub mod node;
pub mod parent;

pub use enums::*;
pub use feedback::{FeedbackPayload, SituationFeedback};
pub use info::ServerMetadata;
pub use node::{Category, IpInterface, MonitoredService, Node, PhysAddr, ServiceType, SnmpInterface};
pub use parent::ParentRef;
