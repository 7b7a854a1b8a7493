//! Core Networks HTTP request methods

use std::time::{Duration, Instant};

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{ProviderError, Result};
use crate::http_client::HttpUtils;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};
use crate::utils::log_sanitizer::mask_secret;

use super::types::CoreNetworksErrorBody;
use super::{
    CommitBody, CoreNetworksProvider, LoginBody, Session, TOKEN_REFRESH_MARGIN_SECS,
    TokenResponse,
};

impl CoreNetworksProvider {
    /// Current bearer token, logging in again when the session is missing or about to expire.
    pub(crate) async fn token(&self) -> Result<String> {
        {
            let session = self.session.read().await;
            if let Some(session) = session.as_ref()
                && session.expires_at > Instant::now()
            {
                return Ok(session.token.clone());
            }
        }

        let mut session = self.session.write().await;
        // Another task may have refreshed while we waited for the lock
        if let Some(current) = session.as_ref()
            && current.expires_at > Instant::now()
        {
            return Ok(current.token.clone());
        }

        let fresh = self.login().await?;
        let token = fresh.token.clone();
        *session = Some(fresh);
        Ok(token)
    }

    /// `POST /auth/token`
    async fn login(&self) -> Result<Session> {
        let url = format!("{}/auth/token", self.base_url);
        let request = self.client.post(&url).json(&LoginBody {
            login: &self.username,
            password: &self.password,
        });

        let (status, response_text) =
            HttpUtils::execute_request(request, self.provider_name(), "POST", "/auth/token")
                .await?;

        if !HttpUtils::is_success(status) {
            let message = Self::error_message(status, &response_text);
            return Err(match status {
                400 | 401 | 403 => ProviderError::InvalidCredentials {
                    provider: self.provider_name().to_string(),
                    raw_message: Some(message),
                },
                _ => self.map_error(
                    RawApiError::with_code(status.to_string(), message),
                    ErrorContext::default(),
                ),
            });
        }

        let token: TokenResponse = HttpUtils::parse_json(&response_text, self.provider_name())?;
        log::debug!(
            "[{}] Session established for {} (token {}, expires in {}s)",
            self.provider_name(),
            self.username,
            mask_secret(&token.token),
            token.expires
        );

        let lifetime = token.expires.saturating_sub(TOKEN_REFRESH_MARGIN_SECS);
        Ok(Session {
            token: token.token,
            expires_at: Instant::now() + Duration::from_secs(lifetime),
        })
    }

    /// Perform an authorized request and return the raw body of a 2xx response.
    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        ctx: ErrorContext,
    ) -> Result<String> {
        let token = self.token().await?;
        let url = format!("{}{path}", self.base_url);

        let mut request = self
            .client
            .request(method.clone(), &url)
            .bearer_auth(token);
        if let Some(body) = body {
            request = request.json(body);
        }

        let (status, response_text) =
            HttpUtils::execute_request(request, self.provider_name(), method.as_str(), path)
                .await?;

        if !HttpUtils::is_success(status) {
            let message = Self::error_message(status, &response_text);
            log::debug!("[{}] API error: HTTP {status} {message}", self.provider_name());
            return Err(self.map_error(RawApiError::with_code(status.to_string(), message), ctx));
        }

        Ok(response_text)
    }

    /// Authorized GET, decoding a JSON response.
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        ctx: ErrorContext,
    ) -> Result<T> {
        let response_text = self.send::<()>(Method::GET, path, None, ctx).await?;
        HttpUtils::parse_json(&response_text, self.provider_name())
    }

    /// Authorized POST. Write endpoints answer with an empty body, so nothing is decoded.
    pub(crate) async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        ctx: ErrorContext,
    ) -> Result<()> {
        self.send(Method::POST, path, Some(body), ctx).await?;
        Ok(())
    }

    /// Publish staged changes of a zone when auto-commit is on.
    pub(crate) async fn commit_if_enabled(&self, zone: &str, zone_path: &str) -> Result<()> {
        if !self.auto_commit {
            return Ok(());
        }
        self.post(
            &format!("{zone_path}/records/commit"),
            &CommitBody { force: false },
            ErrorContext::zone(zone),
        )
        .await
    }

    /// Best-effort human readable message from an error response.
    pub(crate) fn error_message(status: u16, response_text: &str) -> String {
        serde_json::from_str::<CoreNetworksErrorBody>(response_text)
            .ok()
            .and_then(|body| body.msg)
            .filter(|msg| !msg.trim().is_empty())
            .unwrap_or_else(|| {
                if response_text.trim().is_empty() {
                    format!("HTTP {status}")
                } else {
                    crate::utils::log_sanitizer::truncate_for_log(response_text.trim())
                }
            })
    }
}
