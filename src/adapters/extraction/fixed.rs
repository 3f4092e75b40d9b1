//! Canned extraction gateway.
//!
//! Returns pre-configured field maps per document hint, optionally failing
//! a set number of times first. Used by tests and local demos instead of a
//! real OCR/AI provider.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;

use crate::domain::foundation::RawFieldMap;
use crate::domain::workflow::DocumentHint;
use crate::ports::{ExtractionError, ExtractionGateway};

#[derive(Debug, Default)]
pub struct FixedExtractionGateway {
    by_hint: HashMap<String, RawFieldMap>,
    fallback: RawFieldMap,
    /// Fail this many calls before succeeding.
    failures_before_success: u32,
    calls: AtomicU32,
}

fn hint_key(hint: DocumentHint) -> String {
    match hint {
        DocumentHint::IdentityDocument => "identity".to_string(),
        DocumentHint::CompanyRegistry => "company".to_string(),
        DocumentHint::Certificate(kind) => kind.slug().to_string(),
    }
}

impl FixedExtractionGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the field map returned for a hint.
    pub fn with_fields(mut self, hint: DocumentHint, fields: RawFieldMap) -> Self {
        self.by_hint.insert(hint_key(hint), fields);
        self
    }

    /// Sets the field map returned when no hint-specific map is registered.
    pub fn with_fallback(mut self, fields: RawFieldMap) -> Self {
        self.fallback = fields;
        self
    }

    /// Makes the first `n` calls fail with a retryable error.
    pub fn failing_first(mut self, n: u32) -> Self {
        self.failures_before_success = n;
        self
    }

    /// Total number of extract calls made.
    pub fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ExtractionGateway for FixedExtractionGateway {
    async fn extract(
        &self,
        _raw: &[u8],
        _filename: &str,
        hint: DocumentHint,
    ) -> Result<RawFieldMap, ExtractionError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.failures_before_success {
            return Err(ExtractionError::unavailable("scripted failure"));
        }
        Ok(self
            .by_hint
            .get(&hint_key(hint))
            .cloned()
            .unwrap_or_else(|| self.fallback.clone()))
    }
}
