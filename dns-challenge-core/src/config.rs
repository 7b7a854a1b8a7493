//! Challenge settings and credential input

use std::collections::HashMap;

use dns_challenge_provider::{ProviderCredentials, ProviderType};

use crate::error::{ChallengeError, CoreResult};

/// TTL of challenge TXT records, in seconds.
pub const DEFAULT_TTL: u32 = 300;
/// Longest CNAME chain followed before giving up.
pub const DEFAULT_MAX_CNAME_HOPS: usize = 32;

/// Tunables shared by every challenge of a context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChallengeSettings {
    /// TTL applied to created TXT records.
    pub ttl: u32,
    /// Upper bound on followed CNAMEs per name.
    pub max_cname_hops: usize,
}

impl Default for ChallengeSettings {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_TTL,
            max_cname_hops: DEFAULT_MAX_CNAME_HOPS,
        }
    }
}

/// Raw credential input: an identity (cache key) and its key-value fields.
///
/// Fields are `username` and `password`.
#[derive(Clone)]
pub struct CredentialSource {
    /// Key under which the authenticated client is cached, e.g. the credentials file path.
    pub identity: String,
    /// Credential fields as read from the source.
    pub values: HashMap<String, String>,
}

impl std::fmt::Debug for CredentialSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut keys: Vec<&String> = self.values.keys().collect();
        keys.sort();
        f.debug_struct("CredentialSource")
            .field("identity", &self.identity)
            .field("keys", &keys)
            .finish()
    }
}

impl CredentialSource {
    pub fn new(identity: impl Into<String>, values: HashMap<String, String>) -> Self {
        Self {
            identity: identity.into(),
            values,
        }
    }

    /// Validate the fields into provider credentials.
    ///
    /// # Errors
    ///
    /// [`ChallengeError::Configuration`] naming the missing or blank field.
    pub fn credentials(&self) -> CoreResult<ProviderCredentials> {
        ProviderCredentials::from_map(ProviderType::CoreNetworks, &self.values).map_err(|e| {
            ChallengeError::Configuration(format!("{} ({})", e, self.identity))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(pairs: &[(&str, &str)]) -> CredentialSource {
        CredentialSource::new(
            "/etc/letsencrypt/corenetworks.toml",
            pairs
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        )
    }

    #[test]
    fn defaults() {
        let settings = ChallengeSettings::default();
        assert_eq!(settings.ttl, 300);
        assert_eq!(settings.max_cname_hops, 32);
    }

    #[test]
    fn complete_source_yields_credentials() {
        let creds = source(&[("username", "user"), ("password", "pass")])
            .credentials()
            .unwrap();
        assert_eq!(creds.provider_type(), ProviderType::CoreNetworks);
    }

    #[test]
    fn missing_password_is_configuration_error() {
        let err = source(&[("username", "user")]).credentials().unwrap_err();
        assert!(matches!(err, ChallengeError::Configuration(ref msg) if msg.contains("Password")));
    }

    #[test]
    fn debug_hides_values() {
        let debug = format!("{:?}", source(&[("username", "user"), ("password", "hunter2")]));
        assert!(debug.contains("password"));
        assert!(!debug.contains("hunter2"));
    }
}
