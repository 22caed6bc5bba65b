//! @acp:module "Errors"
//! @acp:summary "Library error type and result alias"
//! @acp:domain cli
//! @acp:layer model

use thiserror::Error;

/// Message shown to the user for any failure while acquiring a plan.
pub const GENERATION_FAILED_MESSAGE: &str =
    "Unable to generate the portfolio plan. Please check your API key or try again.";

/// @acp:summary "Errors raised by the atelier library"
#[derive(Debug, Error)]
pub enum AtelierError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Template error: {0}")]
    Template(String),

    #[error("Plan does not match schema: {0}")]
    SchemaViolation(String),

    /// Cause of a failed provider call; never shown to the user directly
    #[error("Provider error: {0}")]
    Provider(String),

    #[error("{}", GENERATION_FAILED_MESSAGE)]
    GenerationFailed,

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Export failed: {0}")]
    Export(String),

    #[error("{0}")]
    Other(String),
}

impl From<handlebars::TemplateError> for AtelierError {
    fn from(err: handlebars::TemplateError) -> Self {
        AtelierError::Template(err.to_string())
    }
}

impl From<handlebars::RenderError> for AtelierError {
    fn from(err: handlebars::RenderError) -> Self {
        AtelierError::Template(err.to_string())
    }
}

impl From<reqwest::Error> for AtelierError {
    fn from(err: reqwest::Error) -> Self {
        AtelierError::Provider(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AtelierError>;
