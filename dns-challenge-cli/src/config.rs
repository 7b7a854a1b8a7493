//! CLI configuration with environment variable priority
//!
//! Configuration is resolved in this order (first found wins):
//! 1. Environment variables (`DNS_CHALLENGE_*`)
//! 2. Config file (`dns-challenge.toml`)
//! 3. Default values

use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;
use dns_challenge_core::{ChallengeError, ChallengeSettings, CoreResult, CredentialSource};
use serde::Deserialize;

/// Environment variable prefix
const ENV_PREFIX: &str = "DNS_CHALLENGE";

pub const DEFAULT_CONFIG_PATH: &str = "dns-challenge.toml";
const DEFAULT_CREDENTIALS_PATH: &str = "/etc/letsencrypt/corenetworks.toml";
const DEFAULT_PROPAGATION_SECONDS: u64 = 60;
const DEFAULT_DNS_TIMEOUT_SECONDS: u64 = 10;

/// CLI configuration (parsed from TOML, can be overridden by env)
#[derive(Debug, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Path of the Core Networks credentials file
    pub credentials: Option<PathBuf>,

    /// TTL of challenge TXT records
    pub ttl: Option<u32>,

    /// Wait after `auth` before certbot asks the CA to validate
    pub propagation_seconds: Option<u64>,

    /// Longest CNAME chain followed
    pub max_cname_hops: Option<usize>,

    /// Timeout of each public DNS query
    pub dns_timeout_seconds: Option<u64>,

    /// Core Networks API endpoint
    pub api_base_url: Option<String>,

    /// Where `auth` leaves resolved names for `cleanup`
    pub state_file: Option<PathBuf>,
}

/// Resolved configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub credentials: PathBuf,
    pub settings: ChallengeSettings,
    pub propagation: Duration,
    pub dns_timeout: Duration,
    /// `None` uses the provider's public endpoint
    pub api_base_url: Option<String>,
    pub state_file: PathBuf,
}

/// Get environment variable with prefix
fn get_env(name: &str) -> Option<String> {
    env::var(format!("{ENV_PREFIX}_{name}")).ok()
}

/// Parse an optional override, naming the variable on failure.
fn parse_env<T>(env: &impl Fn(&str) -> Option<String>, name: &str) -> anyhow::Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    env(name)
        .map(|value| {
            value
                .trim()
                .parse()
                .with_context(|| format!("Invalid {ENV_PREFIX}_{name}: {value:?}"))
        })
        .transpose()
}

fn default_state_file() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(env::temp_dir)
        .join("dns-challenge")
        .join("names.json")
}

impl FileConfig {
    /// Load configuration from a TOML file. A missing file yields the defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Resolve configuration from environment variables first, then config file
    pub fn resolve(self) -> anyhow::Result<Config> {
        self.resolve_with(get_env)
    }

    /// Resolve against an arbitrary variable source (names without prefix).
    fn resolve_with(self, env: impl Fn(&str) -> Option<String>) -> anyhow::Result<Config> {
        let defaults = ChallengeSettings::default();

        let credentials = env("CREDENTIALS")
            .map(PathBuf::from)
            .or(self.credentials)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CREDENTIALS_PATH));

        let ttl = parse_env(&env, "TTL")?
            .or(self.ttl)
            .unwrap_or(defaults.ttl);

        let max_cname_hops = parse_env(&env, "MAX_CNAME_HOPS")?
            .or(self.max_cname_hops)
            .unwrap_or(defaults.max_cname_hops);

        let propagation_seconds = parse_env(&env, "PROPAGATION_SECONDS")?
            .or(self.propagation_seconds)
            .unwrap_or(DEFAULT_PROPAGATION_SECONDS);

        let dns_timeout_seconds = parse_env(&env, "DNS_TIMEOUT_SECONDS")?
            .or(self.dns_timeout_seconds)
            .unwrap_or(DEFAULT_DNS_TIMEOUT_SECONDS);
        if dns_timeout_seconds == 0 {
            anyhow::bail!("dns_timeout_seconds must be greater than zero");
        }

        let api_base_url = env("API_BASE_URL")
            .or(self.api_base_url)
            .filter(|url| !url.trim().is_empty());

        let state_file = env("STATE_FILE")
            .map(PathBuf::from)
            .or(self.state_file)
            .unwrap_or_else(default_state_file);

        Ok(Config {
            credentials,
            settings: ChallengeSettings {
                ttl,
                max_cname_hops,
            },
            propagation: Duration::from_secs(propagation_seconds),
            dns_timeout: Duration::from_secs(dns_timeout_seconds),
            api_base_url,
            state_file,
        })
    }
}

/// Credentials file contents. The certbot plugin key names are accepted too.
#[derive(Debug, Deserialize)]
struct CredentialsFile {
    #[serde(alias = "dns_corenetworks_username")]
    username: Option<String>,
    #[serde(alias = "dns_corenetworks_password")]
    password: Option<String>,
}

/// Read the credentials file. Its path is the credential identity.
///
/// Field validation happens when the challenge service is built.
pub fn load_credentials(path: &Path) -> CoreResult<CredentialSource> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        ChallengeError::Configuration(format!(
            "Failed to read credentials file {}: {e}",
            path.display()
        ))
    })?;
    let file: CredentialsFile = toml::from_str(&content).map_err(|e| {
        ChallengeError::Configuration(format!(
            "Failed to parse credentials file {}: {e}",
            path.display()
        ))
    })?;

    let values: HashMap<String, String> = [("username", file.username), ("password", file.password)]
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| (key.to_string(), v)))
        .collect();

    Ok(CredentialSource::new(path.display().to_string(), values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = FileConfig::load(&dir.path().join("absent.toml"))
            .unwrap()
            .resolve_with(env_from(&[]))
            .unwrap();

        assert_eq!(config.credentials, PathBuf::from(DEFAULT_CREDENTIALS_PATH));
        assert_eq!(config.settings, ChallengeSettings::default());
        assert_eq!(config.propagation, Duration::from_secs(60));
        assert_eq!(config.dns_timeout, Duration::from_secs(10));
        assert_eq!(config.api_base_url, None);
        assert!(config.state_file.ends_with("dns-challenge/names.json"));
    }

    #[test]
    fn file_values_are_used() {
        let file = write_temp(
            r#"
credentials = "/srv/creds.toml"
ttl = 120
propagation_seconds = 5
max_cname_hops = 4
api_base_url = "http://localhost:8080"
state_file = "/tmp/names.json"
"#,
        );
        let config = FileConfig::load(file.path())
            .unwrap()
            .resolve_with(env_from(&[]))
            .unwrap();

        assert_eq!(config.credentials, PathBuf::from("/srv/creds.toml"));
        assert_eq!(config.settings.ttl, 120);
        assert_eq!(config.settings.max_cname_hops, 4);
        assert_eq!(config.propagation, Duration::from_secs(5));
        assert_eq!(config.api_base_url.as_deref(), Some("http://localhost:8080"));
        assert_eq!(config.state_file, PathBuf::from("/tmp/names.json"));
    }

    #[test]
    fn env_overrides_file() {
        let file = write_temp("ttl = 120\ncredentials = \"/srv/creds.toml\"\n");
        let config = FileConfig::load(file.path())
            .unwrap()
            .resolve_with(env_from(&[
                ("TTL", "60"),
                ("CREDENTIALS", "/root/cn.toml"),
                ("PROPAGATION_SECONDS", " 0 "),
            ]))
            .unwrap();

        assert_eq!(config.settings.ttl, 60);
        assert_eq!(config.credentials, PathBuf::from("/root/cn.toml"));
        assert_eq!(config.propagation, Duration::ZERO);
    }

    #[test]
    fn invalid_env_number_is_rejected() {
        let err = FileConfig::default()
            .resolve_with(env_from(&[("TTL", "five minutes")]))
            .unwrap_err();
        assert!(err.to_string().contains("DNS_CHALLENGE_TTL"));
    }

    #[test]
    fn zero_dns_timeout_is_rejected() {
        let err = FileConfig::default()
            .resolve_with(env_from(&[("DNS_TIMEOUT_SECONDS", "0")]))
            .unwrap_err();
        assert!(err.to_string().contains("dns_timeout_seconds"));
    }

    #[test]
    fn unknown_key_fails_to_load() {
        let file = write_temp("tll = 120\n");
        assert!(FileConfig::load(file.path()).is_err());
    }

    #[test]
    fn credentials_with_plain_keys() {
        let file = write_temp("username = \"user\"\npassword = \"secret\"\n");
        let source = load_credentials(file.path()).unwrap();

        assert_eq!(source.identity, file.path().display().to_string());
        assert_eq!(source.values.get("username").map(String::as_str), Some("user"));
        assert!(source.credentials().is_ok());
    }

    #[test]
    fn credentials_with_certbot_keys() {
        let file = write_temp(
            "dns_corenetworks_username = \"user\"\ndns_corenetworks_password = \"secret\"\n",
        );
        let source = load_credentials(file.path()).unwrap();
        assert_eq!(source.values.get("password").map(String::as_str), Some("secret"));
    }

    #[test]
    fn credentials_missing_password_fails_validation() {
        let file = write_temp("username = \"user\"\n");
        let source = load_credentials(file.path()).unwrap();
        assert!(matches!(
            source.credentials(),
            Err(ChallengeError::Configuration(_))
        ));
    }

    #[test]
    fn missing_credentials_file_is_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_credentials(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, ChallengeError::Configuration(ref msg) if msg.contains("nope.toml")));
    }

    #[test]
    fn malformed_credentials_file_is_configuration_error() {
        let file = write_temp("username = user\n");
        assert!(matches!(
            load_credentials(file.path()),
            Err(ChallengeError::Configuration(_))
        ));
    }
}
