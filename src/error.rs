//! Crate-level error type.

use thiserror::Error;

use crate::config::loader::ConfigError;
use crate::config::validation::{join_errors, ValidationError};
use crate::output::writer::OutputError;
use crate::render::RenderError;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid service description: {}", join_errors(.0))]
    InvalidService(Vec<ValidationError>),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Output(#[from] OutputError),

    #[error("watch error: {0}")]
    Watch(#[from] notify::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
