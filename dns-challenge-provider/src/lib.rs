//! # dns-challenge-provider
//!
//! DNS provider client used to publish ACME DNS-01 challenge records.
//!
//! ## Supported Providers
//!
//! | Provider | Feature Flag | Auth Method |
//! |----------|-------------|-------------|
//! | [Core Networks](https://www.core-networks.de/) | `corenetworks` | Username/password session, Bearer token |
//!
//! ## Feature Flags
//!
//! - **`all-providers`** *(default)*: Enable all providers listed above.
//! - **`corenetworks`**: Enable only the Core Networks provider.
//! - **`native-tls`** *(default)*: Use the platform's native TLS implementation.
//! - **`rustls`**: Use rustls.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use dns_challenge_provider::{
//!     NewRecord, ProviderCredentials, ProviderOptions, RecordFilter, create_provider,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let credentials = ProviderCredentials::CoreNetworks {
//!         username: "user".to_string(),
//!         password: "secret".to_string(),
//!     };
//!     let provider = create_provider(credentials, &ProviderOptions::default()).await?;
//!
//!     let zones = provider.zone("example.com").await?;
//!     println!("{:?}", zones.first());
//!
//!     provider
//!         .add_record("example.com", &NewRecord::txt("_acme-challenge", "token", 300))
//!         .await?;
//!     provider
//!         .delete_record("example.com", &RecordFilter::txt("_acme-challenge", "token"))
//!         .await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All provider operations return [`Result<T, ProviderError>`](ProviderError):
//!
//! - [`ProviderError::InvalidCredentials`]: login rejected
//! - [`ProviderError::DomainNotFound`]: zone not hosted by the account
//! - [`ProviderError::RateLimited`]: API rate limit exceeded
//! - [`ProviderError::NetworkError`] / [`ProviderError::Timeout`]: transport failure
//!
//! Nothing is retried. See [`ProviderError`] for the full list.

mod error;
mod factory;
mod http_client;
mod providers;
mod traits;
mod types;
mod utils;

// Re-export error types
pub use error::{ProviderError, Result};

// Re-export factory functions
pub use factory::create_provider;

// Re-export core trait only (internal traits are not exported)
pub use traits::DnsProvider;

// Re-export types
pub use types::{
    CredentialValidationError, DEFAULT_CONNECT_TIMEOUT, DEFAULT_REQUEST_TIMEOUT, DnsRecord,
    DnsRecordType, NewRecord, ProviderCredentials, ProviderOptions, ProviderType, RecordFilter,
    Zone, ZoneKind,
};

// Name helpers shared with the challenge core
pub use providers::common::{full_name_to_relative, normalize_domain_name};

// Re-export concrete providers (behind feature flags)
#[cfg(feature = "corenetworks")]
pub use providers::CoreNetworksProvider;
