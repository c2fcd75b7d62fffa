//! Shared data model.
//!
//! # Data Flow
//! ```text
//! ServiceDescription + [BackendHost]   (inputs, owned by caller)
//!     → routing::build
//!     → RoutingModel                   (RoutingKey → RoutingEntry)
//!     → render::render
//!     → proxy configuration document
//! ```
//!
//! # Design Decisions
//! - Inputs are plain serde types so they load straight from TOML/JSON
//! - The routing model is built fresh per call and never mutated after
//! - RoutingKey keeps its string form authoritative for naming and ordering

pub mod node;
pub mod routing;
pub mod service;

pub use node::{AddressType, BackendHost, NodeAddress};
pub use routing::{Endpoint, RoutingEntry, RoutingKey, RoutingModel};
pub use service::{IpFamily, Protocol, ServiceDescription, ServicePort};

use serde::{Deserialize, Serialize};

/// A load-balancer description: one service and the nodes backing it.
///
/// This is the document the CLI reads from disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoadBalancerDescription {
    pub service: Option<ServiceDescription>,
    pub nodes: Vec<BackendHost>,
}
