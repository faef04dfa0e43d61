//! Crate errors
//!
//! Registry and accessor operations are total; only settings loading can fail.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum InjectedError {
    #[error("config error: {message}")]
    Config { message: String },

    #[error("I/O error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl InjectedError {
    /// Create an I/O error with context.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

/// Result type for fallible crate operations.
pub type InjectedResult<T> = Result<T, InjectedError>;
