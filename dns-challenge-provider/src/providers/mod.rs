//! DNS Provider implementations

/// Shared utilities used by provider implementations.
pub mod common;

#[cfg(feature = "corenetworks")]
mod corenetworks;

#[cfg(feature = "corenetworks")]
pub use corenetworks::CoreNetworksProvider;
