//! Injection seams of the challenge core

mod cname_lookup;
mod name_cache;
mod provider_connector;
mod provider_registry;

pub use cname_lookup::{CnameLookup, CnameLookupError, PassThroughLookup};
pub use name_cache::{InMemoryNameCache, NameCache};
pub use provider_connector::{HttpProviderConnector, ProviderConnector};
pub use provider_registry::{InMemoryProviderRegistry, ProviderRegistry};
