//! Error types for the catalog cascade.

use crate::types::EntityKind;

/// Catalog cascade errors.
///
/// Only failures of the gateway (and of parsing data at the boundary) are
/// errors. Subject/class consistency problems are reported through
/// [`crate::validate::Consistency`] and never become a `CascadeError`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CascadeError {
    /// The gateway reported a failed fetch (`ok: false`).
    #[error("failed to fetch {entity}: {message}")]
    Transport { entity: EntityKind, message: String },

    /// Network error talking to the catalog API.
    #[error("network error: {message}")]
    Network { message: String },

    /// The catalog API answered with something we could not decode.
    #[error("invalid response: {message}")]
    InvalidResponse { message: String },

    /// Identifier could not be parsed into an [`crate::ids::EntityId`].
    #[error("invalid identifier {raw:?}: {reason}")]
    InvalidIdentifier { raw: String, reason: String },

    /// Configuration error.
    #[error("configuration error: {message}")]
    Config { message: String },
}

impl CascadeError {
    /// Build a transport error for one entity type.
    pub fn transport(entity: EntityKind, message: impl Into<String>) -> Self {
        Self::Transport {
            entity,
            message: message.into(),
        }
    }

    /// Message suitable for the resolver-level error slot.
    ///
    /// Transport errors already carry the entity; their bare message is used.
    pub fn user_message(&self) -> String {
        match self {
            Self::Transport { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    /// Whether the error came from the fetch path (and may succeed on a manual retry).
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            Self::Transport { .. } | Self::Network { .. } | Self::InvalidResponse { .. }
        )
    }
}

impl From<reqwest::Error> for CascadeError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network {
            message: err.to_string(),
        }
    }
}

/// Result type for catalog cascade operations.
pub type CascadeResult<T> = Result<T, CascadeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_display_names_entity() {
        let err = CascadeError::transport(EntityKind::Class, "HTTP 500");
        assert_eq!(err.to_string(), "failed to fetch class: HTTP 500");
        assert_eq!(err.user_message(), "HTTP 500");
    }

    #[test]
    fn test_fetch_failure_classification() {
        assert!(CascadeError::Network {
            message: "timeout".into()
        }
        .is_fetch_failure());
        assert!(!CascadeError::Config {
            message: "bad url".into()
        }
        .is_fetch_failure());
    }
}
