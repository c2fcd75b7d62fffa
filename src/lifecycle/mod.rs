//! Lifecycle management for watch mode.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger
//!
//! Shutdown (shutdown.rs):
//!     broadcast → watch loop stops → watcher dropped → exit
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
