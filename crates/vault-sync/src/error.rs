//! Error types for vault-sync

/// Result type for reconciliation and seeding operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a reconciliation batch or seed walk.
///
/// Both operations fail fast: the first fatal remote error stops all
/// remaining work and is returned as a single value. There is no
/// partial-success reporting.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A remote call failed while reconciling `path`; items after it in the
    /// batch were not attempted.
    #[error("Sync aborted at {path}: {source}")]
    Sync {
        path: String,
        #[source]
        source: vault_remote::Error,
    },

    /// A remote call failed while walking `path` during seeding; nothing is
    /// imported.
    #[error("Seed import aborted at {path}: {source}")]
    Seed {
        path: String,
        #[source]
        source: vault_remote::Error,
    },
}

impl Error {
    pub(crate) fn sync(path: impl Into<String>, source: vault_remote::Error) -> Self {
        Self::Sync {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn seed(path: impl Into<String>, source: vault_remote::Error) -> Self {
        Self::Seed {
            path: path.into(),
            source,
        }
    }

    /// The remote error that aborted the operation.
    pub fn remote(&self) -> &vault_remote::Error {
        match self {
            Self::Sync { source, .. } | Self::Seed { source, .. } => source,
        }
    }
}
