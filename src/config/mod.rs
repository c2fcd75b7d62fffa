//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! compiler config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → CompilerConfig (validated, immutable)
//!
//! load-balancer description (TOML/JSON)
//!     → loader.rs (parse)
//!     → validation.rs (duplicate keys, zero ports)
//!     → routing::build
//!
//! In watch mode:
//!     watcher.rs detects change
//!     → loader.rs reloads the description
//!     → new description sent to the compile loop
//! ```
//!
//! # Design Decisions
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - A failed reload keeps the last delivered document

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use schema::CompilerConfig;
pub use schema::InputConfig;
pub use schema::ObservabilityConfig;
pub use schema::OutputConfig;
pub use schema::ValidationConfig;
pub use schema::WatchConfig;
