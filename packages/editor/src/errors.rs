//! Error types for the editor

use crate::validation::ValidationResult;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Mutation error: {0}")]
    Mutation(#[from] crate::mutations::MutationError),

    #[error("Template error: {0}")]
    Template(#[from] crate::templates::TemplateError),

    #[error("Persistence error: {0}")]
    Persistence(#[from] crate::persistence::PersistenceError),

    #[error("URL error: {0}")]
    Url(#[from] crate::url::UrlError),

    #[error("Page {0} not found")]
    PageNotFound(String),

    #[error("No site loaded")]
    NoSite,

    #[error("Validation failed: {0}")]
    Validation(ValidationResult),

    #[error("Invalid editor options: {0}")]
    Options(#[from] serde_json::Error),
}
