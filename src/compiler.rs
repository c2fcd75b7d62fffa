//! End-to-end compilation: validate, build, render.
//!
//! # Responsibilities
//! - Apply the validation policy to a description
//! - Run the builder and renderer
//! - Record compilation metrics
//!
//! # Design Decisions
//! - Stateless: every call compiles from scratch, nothing is cached
//! - Non-strict mode logs validation errors and keeps overwrite semantics

use crate::config::validation::validate_service;
use crate::error::{Error, Result};
use crate::model::LoadBalancerDescription;
use crate::observability::metrics;
use crate::render::render;
use crate::routing::build;

/// Compiles load-balancer descriptions into proxy documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct Compiler {
    strict: bool,
}

impl Compiler {
    pub fn new(strict: bool) -> Self {
        Self { strict }
    }

    /// Produce the proxy document for one description.
    pub fn compile(&self, description: &LoadBalancerDescription) -> Result<String> {
        if let Some(service) = &description.service {
            if let Err(errors) = validate_service(service) {
                if self.strict {
                    metrics::record_compilation("invalid");
                    return Err(Error::InvalidService(errors));
                }
                for error in &errors {
                    tracing::warn!(error = %error, "Service description problem");
                }
            }
        }

        let model = build(description.service.as_ref(), &description.nodes);
        metrics::record_model(model.service_ports.len(), model.endpoint_count());

        let document = render(&model).map_err(|e| {
            metrics::record_render_failure();
            metrics::record_compilation("render_error");
            e
        })?;

        tracing::info!(
            entries = model.service_ports.len(),
            endpoints = model.endpoint_count(),
            health_check_port = model.health_check_port,
            "Compiled proxy configuration"
        );
        metrics::record_compilation("ok");

        Ok(document)
    }
}
