//! Challenge services

mod challenge_service;
mod cname_resolver;
mod zone_resolver;

pub use challenge_service::ChallengeService;
pub use cname_resolver::CnameResolver;
pub use zone_resolver::{ZoneResolver, base_domain_guesses};

use std::sync::Arc;

use crate::config::ChallengeSettings;
use crate::traits::{
    CnameLookup, InMemoryNameCache, InMemoryProviderRegistry, NameCache, ProviderConnector,
    ProviderRegistry,
};

/// Service context - holds all dependencies
///
/// Shared by every challenge handled in one process: the provider-client cache and the
/// resolved-name cache live here.
pub struct ChallengeContext {
    /// Cached provider clients by credential identity
    pub provider_registry: Arc<dyn ProviderRegistry>,
    /// Builds provider clients on a registry miss
    pub connector: Arc<dyn ProviderConnector>,
    /// Validation name -> CNAME-resolved name
    pub name_cache: Arc<dyn NameCache>,
    /// Public DNS CNAME queries
    pub cname_lookup: Arc<dyn CnameLookup>,
    pub settings: ChallengeSettings,
}

impl ChallengeContext {
    /// Create a service context
    #[must_use]
    pub fn new(
        provider_registry: Arc<dyn ProviderRegistry>,
        connector: Arc<dyn ProviderConnector>,
        name_cache: Arc<dyn NameCache>,
        cname_lookup: Arc<dyn CnameLookup>,
        settings: ChallengeSettings,
    ) -> Self {
        Self {
            provider_registry,
            connector,
            name_cache,
            cname_lookup,
            settings,
        }
    }

    /// Context with empty in-memory caches.
    #[must_use]
    pub fn in_memory(
        connector: Arc<dyn ProviderConnector>,
        cname_lookup: Arc<dyn CnameLookup>,
        settings: ChallengeSettings,
    ) -> Self {
        Self::new(
            Arc::new(InMemoryProviderRegistry::new()),
            connector,
            Arc::new(InMemoryNameCache::new()),
            cname_lookup,
            settings,
        )
    }

    /// CNAME resolver bound to this context's lookup and hop limit.
    #[must_use]
    pub fn cname_resolver(&self) -> CnameResolver {
        CnameResolver::new(Arc::clone(&self.cname_lookup), self.settings.max_cname_hops)
    }
}
