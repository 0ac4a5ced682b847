//! Application-level errors (wraps domain errors)

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::{DomainError, SyntaxError};

/// Application errors wrap domain errors and add application-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("rule '{rule}': {source}")]
    RuleSyntax {
        rule: String,
        #[source]
        source: SyntaxError,
    },

    #[error("invalid rule document {}: {message}", path.display())]
    Document { path: PathBuf, message: String },

    #[error("no rule named '{0}'")]
    UnknownRule(String),

    #[error("config error: {message}")]
    Config { message: String },

    #[error("operation failed: {context}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
