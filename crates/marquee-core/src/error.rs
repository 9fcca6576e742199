use marquee_models::ContentKind;
use marquee_sources::SourceError;
use thiserror::Error;

/// The provider record cannot become a catalog row
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MappingError {
    #[error("content {imdb_id} is a '{actual}', not a {expected}")]
    KindMismatch {
        imdb_id: String,
        expected: ContentKind,
        actual: String,
    },

    #[error("provider record is missing required field '{0}'")]
    MissingField(&'static str),
}

/// Persistence collaborator failures
#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique constraint (external id or slug) rejected the row
    #[error("{kind} with {field} '{value}' already exists")]
    Conflict {
        kind: ContentKind,
        field: &'static str,
        value: String,
    },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("store error: {0}")]
    Backend(String),
}

/// Why a single import failed.
///
/// Displays the bare underlying message so batch errors read "{id}: {message}".
#[derive(Debug, Error)]
pub enum ImportError {
    /// Provider unreachable or unreadable
    #[error("{0}")]
    Transport(#[source] SourceError),

    /// Provider answered with a failure (unknown id, rejected query)
    #[error("{0}")]
    Provider(#[source] SourceError),

    #[error("{0}")]
    Validation(#[from] MappingError),

    #[error("{0}")]
    Persistence(#[from] StoreError),
}

impl From<SourceError> for ImportError {
    fn from(e: SourceError) -> Self {
        if e.is_transport() {
            ImportError::Transport(e)
        } else {
            ImportError::Provider(e)
        }
    }
}

impl ImportError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ImportError::Provider(SourceError::NotFound(_)))
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, ImportError::Persistence(StoreError::Conflict { .. }))
    }

    /// Short class name used in logs and API payloads
    pub fn category(&self) -> &'static str {
        match self {
            ImportError::Transport(_) => "transport",
            ImportError::Provider(_) => "provider",
            ImportError::Validation(_) => "validation",
            ImportError::Persistence(_) => "persistence",
        }
    }
}
