//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

// Re-export library error type
pub use dns_challenge_provider::ProviderError;

/// Provider call that failed, for error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderOperation {
    ListRecords,
    AddRecord,
    DeleteRecord,
}

impl std::fmt::Display for ProviderOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ListRecords => write!(f, "look up"),
            Self::AddRecord => write!(f, "add"),
            Self::DeleteRecord => write!(f, "delete"),
        }
    }
}

/// Coarse error classes, for callers that only need to branch on the failure type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    /// The provider rejected the credentials.
    Authentication,
    /// Transport, HTTP or provider-side failure.
    Provider,
    /// CNAME or zone resolution failed.
    Resolution,
    /// A zone was found but may not be used.
    Policy,
    /// The record to delete could not be identified.
    NotFound,
    /// Local input (credentials, settings) is unusable.
    Configuration,
}

/// Challenge layer error type
///
/// Every failure is terminal for the challenge it belongs to.
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum ChallengeError {
    /// Credential input missing, blank or unreadable
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Login rejected by the provider
    #[error("Login failed for {identity}: {source}")]
    Authentication {
        identity: String,
        source: ProviderError,
    },

    /// Session could not be established for another reason (network, timeout, ...)
    #[error("Could not connect to the DNS provider for {identity}: {source}")]
    Connect {
        identity: String,
        source: ProviderError,
    },

    /// Provider call failed while handling a record
    #[error("Failed to {operation} TXT record {record} in zone {zone} for {domain}: {source}")]
    Provider {
        operation: ProviderOperation,
        record: String,
        zone: String,
        domain: String,
        source: ProviderError,
    },

    /// Public DNS query failed (timeout, server failure, malformed answer)
    #[error("CNAME lookup failed for {name}{}: {detail}", for_domain(.domain.as_deref()))]
    CnameLookup {
        name: String,
        domain: Option<String>,
        detail: String,
    },

    /// CNAME chain revisits a name or exceeds the hop limit
    #[error("CNAME chain starting at {name}{} does not terminate after {hops} hops", for_domain(.domain.as_deref()))]
    CnameLoop {
        name: String,
        domain: Option<String>,
        hops: usize,
    },

    /// No zone hosted by the provider covers the record
    #[error("Unable to determine zone for {record}{} using names: {}", for_domain(.domain.as_deref()), .guesses.join(", "))]
    NoZone {
        record: String,
        domain: Option<String>,
        guesses: Vec<String>,
    },

    /// Cleanup for a name that was never performed in this context
    #[error("No resolved record name for {validation_name} (domain {domain}); was the challenge performed?")]
    UnknownValidationName {
        validation_name: String,
        domain: String,
    },

    #[error("Zone {zone} for {record}{} is not active", for_domain(.domain.as_deref()))]
    ZoneInactive {
        record: String,
        zone: String,
        domain: Option<String>,
    },

    #[error("Zone {zone} for {record}{} is not a master zone (type {kind})", for_domain(.domain.as_deref()))]
    ZoneNotPrimary {
        record: String,
        zone: String,
        kind: String,
        domain: Option<String>,
    },

    /// Zero or several records matched at cleanup
    #[error("Record {record} not found in zone {zone} for {domain} ({matches} matching records)")]
    RecordNotFound {
        record: String,
        zone: String,
        domain: String,
        matches: usize,
    },
}

fn for_domain(domain: Option<&str>) -> String {
    domain.map(|d| format!(" (domain {d})")).unwrap_or_default()
}

impl ChallengeError {
    /// Error class of this failure.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration(_) => ErrorKind::Configuration,
            Self::Authentication { .. } => ErrorKind::Authentication,
            Self::Connect { .. } | Self::Provider { .. } => ErrorKind::Provider,
            Self::CnameLookup { .. }
            | Self::CnameLoop { .. }
            | Self::NoZone { .. }
            | Self::UnknownValidationName { .. } => ErrorKind::Resolution,
            Self::ZoneInactive { .. } | Self::ZoneNotPrimary { .. } => ErrorKind::Policy,
            Self::RecordNotFound { .. } => ErrorKind::NotFound,
        }
    }

    /// Whether it is expected behavior (bad input, missing resource, ...), for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    /// **Please update this method when new variants are added.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::Configuration(_)
            | Self::Authentication { .. }
            | Self::NoZone { .. }
            | Self::UnknownValidationName { .. }
            | Self::ZoneInactive { .. }
            | Self::ZoneNotPrimary { .. }
            | Self::RecordNotFound { .. } => true,
            Self::Provider { source, .. } | Self::Connect { source, .. } => source.is_expected(),
            Self::CnameLookup { .. } | Self::CnameLoop { .. } => false,
        }
    }

    /// Attach the challenge domain to resolution and policy errors raised before it was known.
    #[must_use]
    pub fn in_domain(mut self, challenge_domain: &str) -> Self {
        match &mut self {
            Self::CnameLookup { domain, .. }
            | Self::CnameLoop { domain, .. }
            | Self::NoZone { domain, .. }
            | Self::ZoneInactive { domain, .. }
            | Self::ZoneNotPrimary { domain, .. } => {
                domain.get_or_insert_with(|| challenge_domain.to_string());
            }
            _ => {}
        }
        self
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, ChallengeError>;
