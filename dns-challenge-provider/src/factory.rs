//! Provider factory functions.

use std::sync::Arc;

use crate::error::Result;
use crate::traits::DnsProvider;
use crate::types::{ProviderCredentials, ProviderOptions};

#[cfg(feature = "corenetworks")]
use crate::providers::CoreNetworksProvider;

/// Creates an authenticated [`DnsProvider`] from the given credentials.
///
/// The concrete provider type is determined by the [`ProviderCredentials`] variant. The
/// session handshake happens here, so a rejected credential pair fails construction with
/// [`ProviderError::InvalidCredentials`](crate::ProviderError::InvalidCredentials).
///
/// # Examples
///
/// ```rust,no_run
/// use dns_challenge_provider::{ProviderCredentials, ProviderOptions, create_provider};
///
/// # async fn example() -> dns_challenge_provider::Result<()> {
/// let provider = create_provider(
///     ProviderCredentials::CoreNetworks {
///         username: "user".to_string(),
///         password: "secret".to_string(),
///     },
///     &ProviderOptions::default(),
/// )
/// .await?;
/// # Ok(())
/// # }
/// ```
pub async fn create_provider(
    credentials: ProviderCredentials,
    options: &ProviderOptions,
) -> Result<Arc<dyn DnsProvider>> {
    match credentials {
        #[cfg(feature = "corenetworks")]
        ProviderCredentials::CoreNetworks { username, password } => Ok(Arc::new(
            CoreNetworksProvider::connect(username, password, options).await?,
        )),
    }
}
