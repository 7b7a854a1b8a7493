use async_trait::async_trait;

use crate::error::{ProviderError, Result};
use crate::types::{DnsRecord, NewRecord, RecordFilter, Zone};

/// Raw API error (internal)
#[derive(Debug, Clone)]
pub(crate) struct RawApiError {
    /// Error code (HTTP status for Core Networks)
    pub code: Option<String>,
    /// Original error message
    pub message: String,
}

impl RawApiError {
    pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
        }
    }
}

/// Extra information used while mapping a raw error (internal)
#[derive(Debug, Clone, Default)]
pub(crate) struct ErrorContext {
    /// Zone the request targeted (for `DomainNotFound`)
    pub zone: Option<String>,
    /// Request parameter the error is about (for `InvalidParameter`)
    pub param: Option<String>,
}

impl ErrorContext {
    pub fn zone(zone: &str) -> Self {
        Self {
            zone: Some(zone.to_string()),
            param: None,
        }
    }

    #[must_use]
    pub fn with_param(mut self, param: &str) -> Self {
        self.param = Some(param.to_string());
        self
    }
}

/// Provider error mapping (internal)
///
/// Each provider maps its raw API errors onto [`ProviderError`].
pub(crate) trait ProviderErrorMapper {
    /// Provider identifier
    fn provider_name(&self) -> &'static str;

    /// Map a raw API error onto the unified error type
    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError;

    /// Shortcut: unknown error (fallback)
    fn unknown_error(&self, raw: RawApiError) -> ProviderError {
        ProviderError::Unknown {
            provider: self.provider_name().to_string(),
            raw_code: raw.code,
            raw_message: raw.message,
        }
    }
}

/// Authenticated client for a DNS provider.
///
/// Every method is one network round trip; nothing is cached or retried.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Provider identifier
    fn id(&self) -> &'static str;

    /// Look up a zone by its exact name.
    ///
    /// A zone the provider does not host is reported as an error
    /// ([`ProviderError::DomainNotFound`]) or an empty list; callers treat both as a miss.
    async fn zone(&self, name: &str) -> Result<Vec<Zone>>;

    /// List the records of `zone` matching `filter`. An empty list is not an error.
    async fn records(&self, zone: &str, filter: &RecordFilter) -> Result<Vec<DnsRecord>>;

    /// Create a record in `zone`.
    async fn add_record(&self, zone: &str, record: &NewRecord) -> Result<()>;

    /// Delete the records of `zone` matching `filter`.
    ///
    /// An empty filter is rejected with [`ProviderError::InvalidParameter`].
    async fn delete_record(&self, zone: &str, filter: &RecordFilter) -> Result<()>;
}
