//! CNAME chain following

use std::collections::HashSet;
use std::sync::Arc;

use dns_challenge_provider::normalize_domain_name;

use crate::error::{ChallengeError, CoreResult};
use crate::traits::CnameLookup;

/// Follows CNAMEs from a validation name to the name that receives the TXT record.
pub struct CnameResolver {
    lookup: Arc<dyn CnameLookup>,
    max_hops: usize,
}

impl CnameResolver {
    pub fn new(lookup: Arc<dyn CnameLookup>, max_hops: usize) -> Self {
        Self { lookup, max_hops }
    }

    /// Resolve `name` to the end of its CNAME chain.
    ///
    /// A name without CNAME resolves to itself (normalized). Lookup failures, cycles and
    /// chains longer than the hop limit are errors.
    pub async fn resolve(&self, name: &str) -> CoreResult<String> {
        let start = normalize_domain_name(name);
        let mut current = start.clone();
        let mut seen = HashSet::from([current.clone()]);

        loop {
            let target = self.lookup.cname(&current).await.map_err(|e| {
                ChallengeError::CnameLookup {
                    name: current.clone(),
                    domain: None,
                    detail: e.to_string(),
                }
            })?;

            let Some(target) = target else {
                return Ok(current);
            };
            let target = normalize_domain_name(&target);
            log::debug!("{current} is a CNAME for {target}");

            let hops = seen.len();
            if hops > self.max_hops || !seen.insert(target.clone()) {
                return Err(ChallengeError::CnameLoop {
                    name: start,
                    domain: None,
                    hops,
                });
            }
            current = target;
        }
    }
}
