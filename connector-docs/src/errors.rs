use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocsError {
    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid connector metadata: {0}")]
    Metadata(#[from] serde_json::Error),

    #[error("Unknown connector: {0}")]
    UnknownConnector(String),
}

impl DocsError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| DocsError::Io { path, source }
    }
}
