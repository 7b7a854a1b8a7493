//! DNS Challenge Core Library
//!
//! Coordinates ACME DNS-01 challenges against a DNS provider:
//! - CNAME following (`CnameResolver`) to find where the TXT record really belongs
//! - Zone discovery (`ZoneResolver`) by walking base-domain guesses
//! - Record lifecycle (`ChallengeService::perform` / `cleanup`)
//!
//! Caches and outbound capabilities are injected through a shared [`ChallengeContext`], so the
//! same core serves a one-shot hook process and a long-running orchestrator.

pub mod config;
pub mod error;
#[cfg(feature = "hickory")]
pub mod resolver;
pub mod services;
pub mod traits;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use config::{ChallengeSettings, CredentialSource};
pub use error::{ChallengeError, CoreResult, ErrorKind};
#[cfg(feature = "hickory")]
pub use resolver::HickoryCnameLookup;
pub use services::{ChallengeContext, ChallengeService};
pub use traits::{CnameLookup, NameCache, PassThroughLookup, ProviderConnector, ProviderRegistry};
