use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncTestError {
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Invalid backend URL: {0}")]
    InvalidBackendUrl(String),

    #[error("Missing required argument: {0}")]
    MissingArgument(&'static str),

    #[error("Invalid argument {name}: {reason}")]
    InvalidArgument { name: &'static str, reason: String },

    #[error("Unknown tool: {0}")]
    UnknownTool(String),
}
