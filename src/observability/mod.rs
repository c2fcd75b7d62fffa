//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Compiler stages produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, gauges)
//!
//! Consumers:
//!     → stderr (pretty or compact)
//!     → Metrics endpoint (Prometheus scrape, watch mode)
//! ```
//!
//! # Design Decisions
//! - Structured fields (key, backends, entries) rather than formatted text
//! - Metrics are cheap and recorded even when no exporter is installed

pub mod logging;
pub mod metrics;
