//! Provider construction Trait

use std::sync::Arc;

use async_trait::async_trait;
use dns_challenge_provider::{
    DnsProvider, ProviderCredentials, ProviderOptions, Result as ProviderResult, create_provider,
};

/// Builds authenticated provider clients.
///
/// Construction performs the provider's session handshake, so a rejected credential pair
/// fails here.
#[async_trait]
pub trait ProviderConnector: Send + Sync {
    async fn connect(
        &self,
        credentials: ProviderCredentials,
    ) -> ProviderResult<Arc<dyn DnsProvider>>;
}

/// Connector talking to the real provider API over HTTPS.
#[derive(Debug, Clone, Default)]
pub struct HttpProviderConnector {
    options: ProviderOptions,
}

impl HttpProviderConnector {
    #[must_use]
    pub fn new(options: ProviderOptions) -> Self {
        Self { options }
    }
}

#[async_trait]
impl ProviderConnector for HttpProviderConnector {
    async fn connect(
        &self,
        credentials: ProviderCredentials,
    ) -> ProviderResult<Arc<dyn DnsProvider>> {
        create_provider(credentials, &self.options).await
    }
}
