//! Error types for vault-remote

/// Result type for remote host operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while talking to a remote content host
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Remote object absent. Expected during reconciliation (create on
    /// upsert, skip on delete) and not treated as a failure by callers.
    #[error("Remote content not found: {path}")]
    NotFound { path: String },

    /// Version token mismatch — a concurrent external writer changed the
    /// object between fetch and write. Triggers exactly one retry upstream.
    #[error("Version conflict at {path}")]
    Conflict { path: String },

    /// Network failure, timeout, or cancellation. Always fatal.
    #[error("Transport error: {message}")]
    Transport { message: String },

    /// The remote API rejected the request with an unexpected status.
    #[error("Remote API error at {path}: status {status}")]
    RemoteApi { path: String, status: u16 },

    /// The response body was not in the expected shape.
    #[error("Malformed remote response at {path}: {message}")]
    MalformedResponse { path: String, message: String },
}

impl Error {
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }

    pub fn conflict(path: impl Into<String>) -> Self {
        Self::Conflict { path: path.into() }
    }

    pub fn malformed(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// True when the remote reported the object as absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// True when the remote reported an optimistic-lock conflict.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport {
            message: err.to_string(),
        }
    }
}
