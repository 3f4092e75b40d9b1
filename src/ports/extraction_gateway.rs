//! Extraction gateway port.
//!
//! Abstracts the external service that turns raw uploaded document bytes
//! into structured fields (OCR plus model-driven extraction, in practice).
//! Only the call contract is consumed here; concrete providers live behind
//! adapters.
//!
//! Retries are the caller's job, not the gateway's, so retry policy stays
//! configurable per deployment.

use async_trait::async_trait;

use crate::domain::foundation::RawFieldMap;
use crate::domain::workflow::DocumentHint;

/// Port for document field extraction.
#[async_trait]
pub trait ExtractionGateway: Send + Sync {
    /// Extracts structured fields from one uploaded document.
    ///
    /// `hint` tells the provider what kind of document to expect, which
    /// drives its extraction prompt or template.
    async fn extract(
        &self,
        raw: &[u8],
        filename: &str,
        hint: DocumentHint,
    ) -> Result<RawFieldMap, ExtractionError>;
}

/// Extraction gateway failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractionError {
    /// Provider is down or overloaded.
    #[error("extraction service unavailable: {message}")]
    Unavailable { message: String },

    /// Rate limited by the provider.
    #[error("extraction rate limited: retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u32 },

    /// Request timed out.
    #[error("extraction timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u32 },

    /// Network error during the request.
    #[error("extraction network error: {0}")]
    Network(String),

    /// The document could not be read at all (corrupt file, empty scan).
    #[error("document could not be read: {reason}")]
    Unreadable { reason: String },

    /// The provider answered but its response could not be parsed.
    #[error("extraction response could not be parsed: {0}")]
    Parse(String),

    /// Credentials rejected by the provider.
    #[error("extraction authentication failed")]
    AuthenticationFailed,
}

impl ExtractionError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn unreadable(reason: impl Into<String>) -> Self {
        Self::Unreadable {
            reason: reason.into(),
        }
    }

    /// True when a retry of the same call may succeed.
    ///
    /// Unreadable documents and parse failures are deterministic; retrying
    /// them wastes the retry budget.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ExtractionError::Unavailable { .. }
                | ExtractionError::RateLimited { .. }
                | ExtractionError::Timeout { .. }
                | ExtractionError::Network(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_classification() {
        assert!(ExtractionError::unavailable("down").is_retryable());
        assert!(ExtractionError::RateLimited { retry_after_secs: 5 }.is_retryable());
        assert!(ExtractionError::Timeout { timeout_secs: 30 }.is_retryable());
        assert!(ExtractionError::Network("reset".into()).is_retryable());

        assert!(!ExtractionError::unreadable("blank page").is_retryable());
        assert!(!ExtractionError::Parse("not json".into()).is_retryable());
        assert!(!ExtractionError::AuthenticationFailed.is_retryable());
    }

    #[test]
    fn gateway_is_object_safe() {
        fn _accepts_dyn(_gateway: &dyn ExtractionGateway) {}
    }
}
