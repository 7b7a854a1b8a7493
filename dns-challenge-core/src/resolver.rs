//! hickory-resolver backed CNAME lookups.

use std::time::Duration;

use async_trait::async_trait;
use hickory_resolver::{
    TokioResolver,
    config::{ResolverConfig, ResolverOpts},
    name_server::TokioConnectionProvider,
    proto::rr::{Name, RecordType},
};

use crate::traits::{CnameLookup, CnameLookupError};

/// Default per-query timeout.
pub const DEFAULT_DNS_TIMEOUT: Duration = Duration::from_secs(10);

/// CNAME lookups through the host's DNS configuration.
pub struct HickoryCnameLookup {
    resolver: TokioResolver,
    timeout: Duration,
}

impl HickoryCnameLookup {
    /// Resolver using the system configuration (e.g. `/etc/resolv.conf`).
    ///
    /// Falls back to Hickory's default upstream set when the system configuration cannot be
    /// loaded. `timeout` bounds each query and the whole lookup.
    #[must_use]
    pub fn from_system_conf(timeout: Duration) -> Self {
        Self {
            resolver: build_system_resolver(timeout),
            timeout,
        }
    }
}

/// Build a resolver using the host system DNS configuration (with fallback).
fn build_system_resolver(timeout: Duration) -> TokioResolver {
    #[cfg(any(unix, target_os = "windows"))]
    {
        match TokioResolver::builder_tokio() {
            Ok(mut builder) => {
                apply_options(builder.options_mut(), timeout);
                return builder.build();
            }
            Err(e) => {
                log::warn!(
                    "Failed to load system DNS configuration, falling back to defaults: {e}"
                );
            }
        }
    }

    let provider = TokioConnectionProvider::default();
    let mut opts = ResolverOpts::default();
    apply_options(&mut opts, timeout);
    TokioResolver::builder_with_config(ResolverConfig::default(), provider)
        .with_options(opts)
        .build()
}

/// Absolute query name, so the resolver never appends search domains.
fn query_name(name: &str) -> Result<Name, CnameLookupError> {
    let mut query = Name::from_ascii(name.trim_end_matches('.'))
        .map_err(|e| CnameLookupError(format!("invalid name {name}: {e}")))?;
    query.set_fqdn(true);
    Ok(query)
}

fn apply_options(opts: &mut ResolverOpts, timeout: Duration) {
    opts.timeout = timeout;
    // Each hop must see the live answer, not a cached one
    opts.cache_size = 0;
}

#[async_trait]
impl CnameLookup for HickoryCnameLookup {
    async fn cname(&self, name: &str) -> Result<Option<String>, CnameLookupError> {
        let query = query_name(name)?;
        let lookup = tokio::time::timeout(
            self.timeout,
            self.resolver.lookup(query, RecordType::CNAME),
        )
        .await
        .map_err(|_| {
            CnameLookupError(format!("timed out after {}s", self.timeout.as_secs()))
        })?;

        match lookup {
            Ok(response) => Ok(response
                .record_iter()
                .find_map(|record| record.data().as_cname())
                .map(|cname| cname.0.to_string().trim_end_matches('.').to_string())),
            Err(e) if e.is_no_records_found() || e.is_nx_domain() => Ok(None),
            Err(e) => Err(CnameLookupError(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_disable_cache_and_set_timeout() {
        let mut opts = ResolverOpts::default();
        apply_options(&mut opts, Duration::from_secs(3));
        assert_eq!(opts.timeout, Duration::from_secs(3));
        assert_eq!(opts.cache_size, 0);
    }

    #[test]
    fn query_name_is_fully_qualified() {
        let query = query_name("_acme-challenge.example.com").unwrap();
        assert!(query.is_fqdn());
        assert_eq!(query.to_string(), "_acme-challenge.example.com.");
    }

    #[test]
    fn query_name_accepts_trailing_dot() {
        let query = query_name("example.com.").unwrap();
        assert!(query.is_fqdn());
        assert_eq!(query.num_labels(), 2);
    }

    #[tokio::test]
    async fn builds_from_system_conf() {
        // Should not panic -- falls back to defaults without a system configuration
        let _lookup = HickoryCnameLookup::from_system_conf(DEFAULT_DNS_TIMEOUT);
    }

    #[tokio::test]
    #[ignore = "requires network access"]
    async fn name_without_cname_resolves_to_none() {
        let lookup = HickoryCnameLookup::from_system_conf(DEFAULT_DNS_TIMEOUT);
        let answer = lookup.cname("example.com").await.unwrap();
        assert_eq!(answer, None);
    }
}
