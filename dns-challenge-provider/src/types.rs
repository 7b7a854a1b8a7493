use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

// ============ Provider Types ============

/// Supported DNS providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    /// Core Networks DNS. Requires feature `corenetworks`.
    #[cfg(feature = "corenetworks")]
    #[serde(rename = "corenetworks")]
    CoreNetworks,
}

impl std::fmt::Display for ProviderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            #[cfg(feature = "corenetworks")]
            Self::CoreNetworks => write!(f, "corenetworks"),
        }
    }
}

// ============ Credentials ============

/// Credential validation error, reported per field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CredentialValidationError {
    /// A required credential field is missing entirely.
    MissingField {
        /// Which provider the error relates to.
        provider: ProviderType,
        /// Machine-readable field key.
        field: String,
        /// Human-readable field label.
        label: String,
    },
    /// A credential field is present but empty/whitespace-only.
    EmptyField {
        /// Which provider the error relates to.
        provider: ProviderType,
        /// Machine-readable field key.
        field: String,
        /// Human-readable field label.
        label: String,
    },
}

impl CredentialValidationError {
    /// Machine-readable key of the offending field.
    #[must_use]
    pub fn field(&self) -> &str {
        match self {
            Self::MissingField { field, .. } | Self::EmptyField { field, .. } => field,
        }
    }
}

impl std::fmt::Display for CredentialValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField { label, .. } => write!(f, "Missing required field: {label}"),
            Self::EmptyField { label, .. } => write!(f, "Field must not be empty: {label}"),
        }
    }
}

impl std::error::Error for CredentialValidationError {}

/// Type-safe credential container for the supported DNS providers.
///
/// Pass this to [`create_provider()`](crate::create_provider) to instantiate a provider.
/// The `Debug` output never includes secrets.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "provider", content = "credentials")]
pub enum ProviderCredentials {
    /// Core Networks API account. Requires feature `corenetworks`.
    #[cfg(feature = "corenetworks")]
    #[serde(rename = "corenetworks")]
    CoreNetworks {
        /// API account username.
        username: String,
        /// API account password.
        password: String,
    },
}

impl std::fmt::Debug for ProviderCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            #[cfg(feature = "corenetworks")]
            Self::CoreNetworks { username, .. } => f
                .debug_struct("CoreNetworks")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
        }
    }
}

impl ProviderCredentials {
    /// Construct credentials from a flat key-value map, validating required fields.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialValidationError`] if a required field is missing or blank.
    pub fn from_map(
        provider: ProviderType,
        map: &HashMap<String, String>,
    ) -> Result<Self, CredentialValidationError> {
        match provider {
            #[cfg(feature = "corenetworks")]
            ProviderType::CoreNetworks => Ok(Self::CoreNetworks {
                username: Self::get_required_field(provider, map, "username", "Username")?,
                password: Self::get_required_field(provider, map, "password", "Password")?,
            }),
        }
    }

    /// Obtain a required field from the map and verify that it is not blank.
    fn get_required_field(
        provider: ProviderType,
        map: &HashMap<String, String>,
        key: &str,
        label: &str,
    ) -> Result<String, CredentialValidationError> {
        match map.get(key) {
            None => Err(CredentialValidationError::MissingField {
                provider,
                field: key.to_string(),
                label: label.to_string(),
            }),
            Some(v) if v.trim().is_empty() => Err(CredentialValidationError::EmptyField {
                provider,
                field: key.to_string(),
                label: label.to_string(),
            }),
            Some(v) => Ok(v.clone()),
        }
    }

    /// The provider these credentials belong to.
    #[must_use]
    pub fn provider_type(&self) -> ProviderType {
        match self {
            #[cfg(feature = "corenetworks")]
            Self::CoreNetworks { .. } => ProviderType::CoreNetworks,
        }
    }
}

// ============ Provider Options ============

/// Default connect timeout for provider HTTP clients.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
/// Default request timeout for provider HTTP clients.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Transport settings applied when creating a provider.
#[derive(Debug, Clone)]
pub struct ProviderOptions {
    /// API endpoint override. `None` uses the provider's public endpoint.
    pub base_url: Option<String>,
    /// Publish staged changes right after each create/delete.
    pub auto_commit: bool,
    /// TCP connect timeout.
    pub connect_timeout: Duration,
    /// Whole-request timeout.
    pub request_timeout: Duration,
}

impl Default for ProviderOptions {
    fn default() -> Self {
        Self {
            base_url: None,
            auto_commit: true,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

// ============ Zone Types ============

/// Primary/secondary role of a zone at the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ZoneKind {
    /// Primary zone, records are editable.
    Master,
    /// Secondary zone, records are transferred from elsewhere.
    Slave,
    /// Any other value the provider reports.
    Other(String),
}

impl From<String> for ZoneKind {
    fn from(value: String) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "master" | "primary" => Self::Master,
            "slave" | "secondary" => Self::Slave,
            _ => Self::Other(value),
        }
    }
}

impl From<ZoneKind> for String {
    fn from(kind: ZoneKind) -> Self {
        kind.to_string()
    }
}

impl std::fmt::Display for ZoneKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Master => write!(f, "master"),
            Self::Slave => write!(f, "slave"),
            Self::Other(kind) => write!(f, "{kind}"),
        }
    }
}

/// A DNS zone as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    /// Zone apex, e.g. `example.com`.
    pub name: String,
    /// Whether the zone is enabled at the provider.
    pub active: bool,
    /// Primary/secondary role.
    pub kind: ZoneKind,
}

// ============ Record Types ============

/// DNS record types reported by providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DnsRecordType {
    A,
    Aaaa,
    Cname,
    Mx,
    Txt,
    Ns,
    Srv,
    Caa,
    Ptr,
    Soa,
}

/// A DNS record as reported by the provider.
///
/// `name` is relative to the zone (`@` for the apex).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecord {
    pub name: String,
    pub record_type: DnsRecordType,
    pub data: String,
    pub ttl: u32,
}

/// Match criteria for record queries and deletions.
///
/// `None` fields are not constrained.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordFilter {
    pub name: Option<String>,
    pub record_type: Option<DnsRecordType>,
    pub data: Option<String>,
}

impl RecordFilter {
    /// Exact match on a TXT record.
    pub fn txt(name: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            record_type: Some(DnsRecordType::Txt),
            data: Some(data.into()),
        }
    }

    /// True when no field is constrained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.record_type.is_none() && self.data.is_none()
    }
}

/// A record to create inside a zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRecord {
    /// Name relative to the zone.
    pub name: String,
    pub record_type: DnsRecordType,
    pub data: String,
    pub ttl: u32,
}

impl NewRecord {
    /// A TXT record, e.g. an ACME challenge token.
    pub fn txt(name: impl Into<String>, data: impl Into<String>, ttl: u32) -> Self {
        Self {
            name: name.into(),
            record_type: DnsRecordType::Txt,
            data: data.into(),
            ttl,
        }
    }

    /// The filter that matches exactly this record.
    #[must_use]
    pub fn filter(&self) -> RecordFilter {
        RecordFilter {
            name: Some(self.name.clone()),
            record_type: Some(self.record_type),
            data: Some(self.data.clone()),
        }
    }
}
