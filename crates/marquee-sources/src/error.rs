use thiserror::Error;

/// Failures talking to a metadata provider.
///
/// `Transport`, `Status` and `Decode` mean the provider could not be reached
/// or understood; `Provider` and `NotFound` mean it answered and said no.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("request to metadata provider failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("metadata provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("could not decode metadata provider response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The provider rejected the request (bad query, bad key, too many results)
    #[error("{0}")]
    Provider(String),

    /// The provider has no title for the requested id
    #[error("{0}")]
    NotFound(String),
}

impl SourceError {
    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// True when the provider was never heard from properly
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            SourceError::Transport(_) | SourceError::Status { .. } | SourceError::Decode(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_errors_display_bare_message() {
        assert_eq!(SourceError::not_found("Incorrect IMDb ID.").to_string(), "Incorrect IMDb ID.");
        assert_eq!(SourceError::provider("Too many results.").to_string(), "Too many results.");
    }

    #[test]
    fn test_transport_classification() {
        let status = SourceError::Status { status: 503, body: String::new() };
        assert!(status.is_transport());
        assert!(!SourceError::not_found("x").is_transport());
        assert!(!SourceError::provider("x").is_transport());

        let decode = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(SourceError::from(decode).is_transport());
    }
}
