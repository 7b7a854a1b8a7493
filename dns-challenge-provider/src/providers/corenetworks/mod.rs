//! Core Networks DNS Provider

mod error;
mod http;
mod provider;
mod types;

use std::time::Instant;

use reqwest::Client;
use tokio::sync::RwLock;

use crate::error::Result;
use crate::providers::common::create_http_client;
use crate::types::ProviderOptions;

pub(crate) use types::{
    CommitBody, CoreNetworksRecord, CoreNetworksZone, LoginBody, RecordBody, TokenResponse,
};

pub(crate) const CN_API_BASE: &str = "https://beta.api.core-networks.de";
pub(crate) const PROVIDER_NAME: &str = "corenetworks";
/// Refresh the session this long before the reported expiry.
pub(crate) const TOKEN_REFRESH_MARGIN_SECS: u64 = 60;

/// Bearer token with its local expiry.
#[derive(Debug, Clone)]
pub(crate) struct Session {
    pub token: String,
    pub expires_at: Instant,
}

/// Core Networks DNS Provider
///
/// Holds one authenticated session; record changes are committed after every create/delete
/// unless `auto_commit` is off.
pub struct CoreNetworksProvider {
    pub(crate) client: Client,
    pub(crate) base_url: String,
    pub(crate) username: String,
    pub(crate) password: String,
    pub(crate) auto_commit: bool,
    pub(crate) session: RwLock<Option<Session>>,
}

impl CoreNetworksProvider {
    /// Create an unauthenticated provider. The first request logs in.
    pub fn new(username: String, password: String, options: &ProviderOptions) -> Result<Self> {
        let base_url = options
            .base_url
            .as_deref()
            .unwrap_or(CN_API_BASE)
            .trim_end_matches('/')
            .to_string();
        Ok(Self {
            client: create_http_client(options, PROVIDER_NAME)?,
            base_url,
            username,
            password,
            auto_commit: options.auto_commit,
            session: RwLock::new(None),
        })
    }

    /// Create a provider and establish its session right away.
    ///
    /// # Errors
    ///
    /// [`ProviderError::InvalidCredentials`](crate::ProviderError::InvalidCredentials) when the
    /// API rejects the username/password pair.
    pub async fn connect(
        username: String,
        password: String,
        options: &ProviderOptions,
    ) -> Result<Self> {
        let provider = Self::new(username, password, options)?;
        provider.token().await?;
        Ok(provider)
    }
}
