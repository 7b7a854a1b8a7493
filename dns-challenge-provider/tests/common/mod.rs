//! Shared helpers for live API tests

#![allow(dead_code)]

use std::env;
use std::sync::Arc;

use dns_challenge_provider::{
    DnsProvider, ProviderCredentials, ProviderOptions, RecordFilter, create_provider,
};

/// Skip the test when a required environment variable is missing.
#[macro_export]
macro_rules! skip_if_no_credentials {
    ($($var:expr),+) => {
        $(
            if std::env::var($var).is_err() {
                eprintln!("Skipping test: environment variable {} is not set", $var);
                return;
            }
        )+
    };
}

/// Assert that a `Result` is `Ok` and unwrap it (fails the test otherwise).
#[macro_export]
macro_rules! require_ok {
    ($expr:expr $(,)?) => {{
        let res = $expr;
        assert!(res.is_ok(), "expected Ok(..), got {res:?}");
        let Ok(val) = res else {
            return;
        };
        val
    }};
}

/// Unique record name so parallel runs do not collide.
pub fn generate_test_record_name() -> String {
    let uuid = uuid::Uuid::new_v4();
    format!("_test-{}", &uuid.to_string()[..8])
}

/// Provider and zone under test
pub struct TestContext {
    pub provider: Arc<dyn DnsProvider>,
    pub zone: String,
}

impl TestContext {
    /// Log in with `CORENETWORKS_USERNAME` / `CORENETWORKS_PASSWORD` against `TEST_DOMAIN`.
    pub async fn corenetworks() -> Option<Self> {
        let username = env::var("CORENETWORKS_USERNAME").ok()?;
        let password = env::var("CORENETWORKS_PASSWORD").ok()?;
        let zone = env::var("TEST_DOMAIN").ok()?;

        let options = ProviderOptions {
            base_url: env::var("CORENETWORKS_API_BASE_URL").ok(),
            ..ProviderOptions::default()
        };
        let provider = create_provider(
            ProviderCredentials::CoreNetworks { username, password },
            &options,
        )
        .await
        .ok()?;

        Some(Self { provider, zone })
    }

    /// Remove a test record, ignoring failures.
    pub async fn cleanup_record(&self, name: &str, data: &str) {
        let _ = self
            .provider
            .delete_record(&self.zone, &RecordFilter::txt(name, data))
            .await;
    }
}
