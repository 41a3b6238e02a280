use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Unexpected Error: {0}")]
    Custom(String),

    #[error(transparent)]
    Diesel(#[from] diesel::result::Error),

    #[error(transparent)]
    RedisError(#[from] redis::RedisError),

    #[error(transparent)]
    DbPool(#[from] diesel_async::pooled_connection::deadpool::PoolError),

    #[error("Invalid {kind}: {value}")]
    InvalidEnum { kind: &'static str, value: String },

    #[error("Record not found: {0}")]
    NotFound(String),
}

impl ApiError {
    /// Renders the error followed by every underlying source, one per line
    pub fn stacktrace(&self) -> String {
        let mut lines = vec![format!("{self}")];
        let mut source = std::error::Error::source(self);
        while let Some(err) = source {
            lines.push(format!("caused by: {err}"));
            source = err.source();
        }
        lines.join("\n")
    }
}

/// Error messages for the API Responses
pub enum ErrorMessages {
    DB,
    Unauthorized,
}

impl fmt::Display for ErrorMessages {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            ErrorMessages::DB => "An unforeseen database error has occurred. Kindly try again after some time.",
            ErrorMessages::Unauthorized => "Missing or invalid credentials.",
        };
        write!(f, "{message}")
    }
}
