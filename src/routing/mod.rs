//! Routing-model builder.
//!
//! # Data Flow
//! ```text
//! ServiceDescription + [BackendHost]
//!     → for each IP family, for each port:
//!         RoutingKey  = <Family>_<Port>_<PROTOCOL>
//!         Listener    = family wildcard : listen port
//!         Cluster     = every host with an address in the family : target port
//!     → RoutingModel (health-check port shared by all entries)
//! ```
//!
//! # Design Decisions
//! - Pure function: no state survives a call
//! - Never fails; hosts without a matching address are skipped
//! - Cluster order follows node input order, it is never sorted
//! - Duplicate keys overwrite in iteration order (with a warning)

pub mod builder;

pub use builder::build;
