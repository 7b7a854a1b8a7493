//! Shared helpers for provider implementations

use reqwest::Client;

use crate::error::{ProviderError, Result};
use crate::types::{DnsRecordType, ProviderOptions};

// ============ HTTP Client ============

/// Create an HTTP client with the timeouts from `options`.
pub fn create_http_client(options: &ProviderOptions, provider: &str) -> Result<Client> {
    Client::builder()
        .connect_timeout(options.connect_timeout)
        .timeout(options.request_timeout)
        .build()
        .map_err(|e| ProviderError::NetworkError {
            provider: provider.to_string(),
            detail: format!("Failed to create HTTP client: {e}"),
        })
}

// ============ Record type conversion ============

/// Parse a provider record type string into [`DnsRecordType`].
pub fn parse_record_type(record_type: &str, provider: &str) -> Result<DnsRecordType> {
    match record_type.to_uppercase().as_str() {
        "A" => Ok(DnsRecordType::A),
        "AAAA" => Ok(DnsRecordType::Aaaa),
        "CNAME" => Ok(DnsRecordType::Cname),
        "MX" => Ok(DnsRecordType::Mx),
        "TXT" => Ok(DnsRecordType::Txt),
        "NS" => Ok(DnsRecordType::Ns),
        "SRV" => Ok(DnsRecordType::Srv),
        "CAA" => Ok(DnsRecordType::Caa),
        "PTR" => Ok(DnsRecordType::Ptr),
        "SOA" => Ok(DnsRecordType::Soa),
        _ => Err(ProviderError::UnsupportedRecordType {
            provider: provider.to_string(),
            record_type: record_type.to_string(),
        }),
    }
}

/// Upper-case wire name of a [`DnsRecordType`].
pub fn record_type_to_string(record_type: DnsRecordType) -> &'static str {
    match record_type {
        DnsRecordType::A => "A",
        DnsRecordType::Aaaa => "AAAA",
        DnsRecordType::Cname => "CNAME",
        DnsRecordType::Mx => "MX",
        DnsRecordType::Txt => "TXT",
        DnsRecordType::Ns => "NS",
        DnsRecordType::Srv => "SRV",
        DnsRecordType::Caa => "CAA",
        DnsRecordType::Ptr => "PTR",
        DnsRecordType::Soa => "SOA",
    }
}

// ============ Domain names ============

/// Strip the trailing dot and lower-case the name.
pub fn normalize_domain_name(name: &str) -> String {
    name.trim().trim_end_matches('.').to_ascii_lowercase()
}

/// Convert a fully-qualified name into a name relative to `zone_name`.
///
/// `"www.example.com"` in `"example.com"` becomes `"www"`; the apex becomes `"@"`.
/// Names outside the zone are returned normalized but otherwise unchanged.
pub fn full_name_to_relative(full_name: &str, zone_name: &str) -> String {
    let full = normalize_domain_name(full_name);
    let zone = normalize_domain_name(zone_name);

    if full == zone {
        "@".to_string()
    } else if let Some(subdomain) = full.strip_suffix(&format!(".{zone}")) {
        subdomain.to_string()
    } else {
        full
    }
}
