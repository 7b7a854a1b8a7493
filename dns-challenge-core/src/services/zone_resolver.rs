//! Zone discovery

use std::sync::Arc;

use dns_challenge_provider::{DnsProvider, Zone, ZoneKind, normalize_domain_name};

use crate::error::{ChallengeError, CoreResult};

/// Candidate zone names for a record name, most specific first.
///
/// Leading labels are stripped one at a time; the record name itself is not a candidate.
/// `_acme-challenge.foo.example.com` yields `foo.example.com`, `example.com`, `com`.
pub fn base_domain_guesses(record_name: &str) -> Vec<String> {
    let name = normalize_domain_name(record_name);
    let labels: Vec<&str> = name.split('.').filter(|l| !l.is_empty()).collect();
    (1..labels.len()).map(|i| labels[i..].join(".")).collect()
}

/// Finds the provider zone that is authoritative for a record name.
pub struct ZoneResolver {
    provider: Arc<dyn DnsProvider>,
}

impl ZoneResolver {
    pub fn new(provider: Arc<dyn DnsProvider>) -> Self {
        Self { provider }
    }

    /// First guess the provider knows as a zone.
    ///
    /// Lookup failures and empty answers move on to the next guess. The first zone found must
    /// be active and master; otherwise the search stops with a policy error.
    pub async fn find_zone(&self, record_name: &str) -> CoreResult<Zone> {
        let guesses = base_domain_guesses(record_name);

        for guess in &guesses {
            log::debug!("Testing {guess} for record {record_name}...");
            let zones = match self.provider.zone(guess).await {
                Ok(zones) => zones,
                Err(e) => {
                    log::debug!("No zone {guess}: {e}");
                    continue;
                }
            };
            let Some(zone) = zones.into_iter().next() else {
                log::debug!("No zone {guess}: empty answer");
                continue;
            };

            log::debug!("Found zone '{guess}': {zone:?}");
            if !zone.active {
                return Err(ChallengeError::ZoneInactive {
                    record: normalize_domain_name(record_name),
                    zone: guess.clone(),
                    domain: None,
                });
            }
            if zone.kind != ZoneKind::Master {
                return Err(ChallengeError::ZoneNotPrimary {
                    record: normalize_domain_name(record_name),
                    zone: guess.clone(),
                    kind: zone.kind.to_string(),
                    domain: None,
                });
            }

            return Ok(Zone {
                name: guess.clone(),
                ..zone
            });
        }

        Err(ChallengeError::NoZone {
            record: normalize_domain_name(record_name),
            domain: None,
            guesses,
        })
    }
}
