//! Provider registry abstract Trait

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use dns_challenge_provider::{DnsProvider, ProviderCredentials, Result as ProviderResult};

use super::ProviderConnector;

/// Provider Registry Trait
///
/// Caches authenticated provider clients by credential identity. Clients are created on first
/// use and live as long as the registry.
#[async_trait]
pub trait ProviderRegistry: Send + Sync {
    /// Get Provider instance
    async fn get(&self, identity: &str) -> Option<Arc<dyn DnsProvider>>;

    /// Get the cached client for `identity`, connecting with `credentials` on a miss.
    ///
    /// A failed connection caches nothing.
    async fn get_or_connect(
        &self,
        identity: &str,
        credentials: ProviderCredentials,
        connector: &dyn ProviderConnector,
    ) -> ProviderResult<Arc<dyn DnsProvider>>;
}

/// In-memory Provider registry
///
/// Default implementation. A miss connects while holding the write lock, so concurrent first
/// uses of one identity log in once.
#[derive(Clone)]
pub struct InMemoryProviderRegistry {
    providers: Arc<RwLock<HashMap<String, Arc<dyn DnsProvider>>>>,
}

impl InMemoryProviderRegistry {
    /// Create a new memory registry
    #[must_use]
    pub fn new() -> Self {
        Self {
            providers: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProviderRegistry for InMemoryProviderRegistry {
    async fn get(&self, identity: &str) -> Option<Arc<dyn DnsProvider>> {
        self.providers.read().await.get(identity).cloned()
    }

    async fn get_or_connect(
        &self,
        identity: &str,
        credentials: ProviderCredentials,
        connector: &dyn ProviderConnector,
    ) -> ProviderResult<Arc<dyn DnsProvider>> {
        if let Some(provider) = self.get(identity).await {
            return Ok(provider);
        }

        let mut providers = self.providers.write().await;
        if let Some(provider) = providers.get(identity) {
            return Ok(Arc::clone(provider));
        }

        log::debug!("Connecting provider client for {identity}");
        let provider = connector.connect(credentials).await?;
        providers.insert(identity.to_string(), Arc::clone(&provider));
        Ok(provider)
    }
}
