//! Proxy configuration rendering.
//!
//! # Data Flow
//! ```text
//! RoutingModel
//!     → collect entries, sort by key string (byte-wise)
//!     → check every address is representable as a plain scalar
//!     → admin block
//!     → one listener per entry   (tcp_proxy → cluster_<key>)
//!     → one cluster per entry    (STATIC, RANDOM, HTTP health check)
//!     → document text
//! ```
//!
//! # Design Decisions
//! - Literal text output, so the document is byte-stable across runs
//! - Key order is string order, never numeric port order
//! - Either the whole document or an error; never a partial document

pub mod envoy;

pub use envoy::{render, RenderError};
