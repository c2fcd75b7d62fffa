//! Load-balancer proxy configuration compiler.
//!
//! Turns a service description plus its backend hosts into the static
//! configuration document of a TCP/UDP pass-through proxy.

pub mod compiler;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod model;
pub mod observability;
pub mod output;
pub mod render;
pub mod routing;
pub mod watch;

pub use compiler::Compiler;
pub use config::schema::CompilerConfig;
pub use error::Error;
pub use model::{BackendHost, LoadBalancerDescription, RoutingModel, ServiceDescription};
pub use render::render;
pub use routing::build;
