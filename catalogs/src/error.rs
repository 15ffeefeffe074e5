use std::path::PathBuf;

use skyview::FetchError;
use thiserror::Error;

/// Errors from the remote archives and catalog files
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("Request to {url} failed: {message}")]
    Network { url: String, message: String },

    #[error("Unexpected response from {url}: {message}")]
    InvalidResponse { url: String, message: String },

    #[error("No planet named '{0}' in the archive")]
    PlanetNotFound(String),

    #[error("Planet '{name}' has no usable sky position")]
    MissingPosition { name: String },

    #[error("Failed to read catalog file {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl ArchiveError {
    pub(crate) fn network(url: &str, err: impl std::fmt::Display) -> Self {
        Self::Network {
            url: url.to_string(),
            message: err.to_string(),
        }
    }

    pub(crate) fn invalid(url: &str, message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            url: url.to_string(),
            message: message.into(),
        }
    }
}

impl From<ArchiveError> for FetchError {
    fn from(err: ArchiveError) -> Self {
        match err {
            ArchiveError::InvalidResponse { .. } | ArchiveError::Csv { .. } => {
                FetchError::Malformed(err.to_string())
            }
            _ => FetchError::Unavailable(err.to_string()),
        }
    }
}
